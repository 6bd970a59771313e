//! The rule-enumeration visitor (spec §4.2): one pass over a function body
//! that assigns every node a fresh result ivar and emits the rules that
//! constrain it, rather than unifying eagerly. Grounded on `hir_ty`'s
//! `infer/expr.rs`, whose `infer_expr_inner` match over every `Expr` kind is
//! the style this follows -- generalized here to *queue* a rule per kind
//! instead of resolving it inline.

use crate::context::Context;
use crate::hir::{Arm, ExprId, ExprKind, FunctionBody, Literal, PatId, Stmt};
use crate::rules::NodeRevisitKind;
use crate::ty::{InferClass, Mutability, PrimitiveKind, Type, TypeKind};

pub struct Enumerator<'a, 'c> {
    pub cx: &'a mut Context<'c>,
    pub body: &'a mut FunctionBody,
}

impl<'a, 'c> Enumerator<'a, 'c> {
    pub fn new(cx: &'a mut Context<'c>, body: &'a mut FunctionBody) -> Enumerator<'a, 'c> {
        Enumerator { cx, body }
    }

    fn span(&self, expr: ExprId) -> crate::hir::Span {
        self.body.exprs[expr].span
    }

    fn set_ty(&mut self, expr: ExprId, ty: Type) {
        self.body.exprs[expr].res_ty = Some(ty);
    }

    fn ty_of(&self, expr: ExprId) -> Type {
        self.body.exprs[expr]
            .res_ty
            .clone()
            .expect("enumerate visits children before their parent")
    }

    /// Visits `expr`'s children first (post-order, matching `hir_ty`'s
    /// recursive-descent `infer_expr_inner`), then assigns and constrains
    /// `expr` itself.
    pub fn visit(&mut self, expr: ExprId) {
        let kind = self.body.exprs[expr].kind.clone();
        let span = self.span(expr);

        let result = match kind {
            ExprKind::Literal(lit) => self.literal_ty(&lit),

            ExprKind::Block { ref stmts, tail } => {
                for stmt in stmts {
                    match stmt {
                        Stmt::Expr(e) => self.visit(*e),
                        Stmt::Let { pat, declared_ty, init } => {
                            if let Some(init) = init {
                                self.visit(*init);
                            }
                            let expected = declared_ty
                                .clone()
                                .unwrap_or_else(|| self.cx.new_ivar(InferClass::None));
                            if let Some(init) = init {
                                let init_ty = self.ty_of(*init);
                                self.cx.equate_types_coerce(span, &expected, &init_ty, *init);
                            }
                            self.visit_pat(*pat, &expected);
                        }
                    }
                }
                match tail {
                    Some(t) => {
                        self.visit(t);
                        self.ty_of(t)
                    }
                    None => Type::unit(),
                }
            }

            ExprKind::Let { pat, declared_ty, init } => {
                self.visit(init);
                let expected = declared_ty.unwrap_or_else(|| self.cx.new_ivar(InferClass::None));
                let init_ty = self.ty_of(init);
                self.cx.equate_types_coerce(span, &expected, &init_ty, init);
                self.visit_pat(pat, &expected);
                Type::bool_()
            }

            ExprKind::If { cond, then_branch, else_branch } => {
                self.visit(cond);
                let cond_ty = self.ty_of(cond);
                if let Err(e) = self.cx.equate_types(span, &cond_ty, &Type::bool_()) {
                    self.cx.push_error(e);
                }
                self.visit(then_branch);
                let result = self.cx.new_ivar(InferClass::None);
                let then_ty = self.ty_of(then_branch);
                self.cx.equate_types_coerce(span, &result, &then_ty, then_branch);
                match else_branch {
                    Some(else_branch) => {
                        self.visit(else_branch);
                        let else_ty = self.ty_of(else_branch);
                        self.cx.equate_types_coerce(span, &result, &else_ty, else_branch);
                    }
                    None => {
                        if let Err(e) = self.cx.equate_types(span, &result, &Type::unit()) {
                            self.cx.push_error(e);
                        }
                    }
                }
                result
            }

            ExprKind::Match { scrutinee, arms } => {
                self.visit(scrutinee);
                let scrut_ty = self.ty_of(scrutinee);
                let result = self.cx.new_ivar(InferClass::None);
                for Arm { pat, guard, body } in arms {
                    self.visit_pat_against(pat, &scrut_ty, Some(scrutinee));
                    if let Some(guard) = guard {
                        self.visit(guard);
                        let guard_ty = self.ty_of(guard);
                        if let Err(e) = self.cx.equate_types(span, &guard_ty, &Type::bool_()) {
                            self.cx.push_error(e);
                        }
                    }
                    self.visit(body);
                    let body_ty = self.ty_of(body);
                    self.cx.equate_types_coerce(span, &result, &body_ty, body);
                }
                result
            }

            ExprKind::Loop { body, .. } => {
                self.visit(body);
                self.cx.new_ivar(InferClass::None)
            }

            ExprKind::Break { value, .. } => {
                if let Some(value) = value {
                    self.visit(value);
                }
                Type::diverge()
            }
            ExprKind::Continue { .. } => Type::diverge(),
            ExprKind::Return { value } | ExprKind::Yield { value } => {
                if let Some(value) = value {
                    self.visit(value);
                }
                Type::diverge()
            }

            ExprKind::BinOp { op, lhs, rhs } => {
                self.visit(lhs);
                self.visit(rhs);
                let lhs_ty = self.ty_of(lhs);
                let rhs_ty = self.ty_of(rhs);
                if op.is_comparison() || op.is_logical() {
                    if op.is_logical() {
                        if let Err(e) = self.cx.equate_types(span, &lhs_ty, &Type::bool_()) {
                            self.cx.push_error(e);
                        }
                        if let Err(e) = self.cx.equate_types(span, &rhs_ty, &Type::bool_()) {
                            self.cx.push_error(e);
                        }
                    } else if let Err(e) = self.cx.equate_types(span, &lhs_ty, &rhs_ty) {
                        self.cx.push_error(e);
                    }
                    Type::bool_()
                } else if let Some(lang_item) = op.lang_item() {
                    let result = self.cx.new_ivar(InferClass::None);
                    if let Some(path) = self.cx.crate_info.lang_item_path(lang_item) {
                        let trait_params = crate::ty::PathParams { types: vec![rhs_ty.clone()], consts: Vec::new() };
                        self.cx.equate_types_assoc(span, &result, path, trait_params, &lhs_ty, None, true);
                    } else if let Err(e) = self.cx.equate_types(span, &lhs_ty, &rhs_ty) {
                        self.cx.push_error(e);
                    }
                    result
                } else {
                    lhs_ty
                }
            }

            ExprKind::UniOp { op, value } => {
                self.visit(value);
                let value_ty = self.ty_of(value);
                let result = self.cx.new_ivar(InferClass::None);
                if let Some(path) = self.cx.crate_info.lang_item_path(op.lang_item()) {
                    self.cx.equate_types_assoc(span, &result, path, Default::default(), &value_ty, None, true);
                } else if let Err(e) = self.cx.equate_types(span, &result, &value_ty) {
                    self.cx.push_error(e);
                }
                result
            }

            ExprKind::Borrow { mutability, value } => {
                self.visit(value);
                let inner = self.ty_of(value);
                Type::borrow_of(mutability, inner)
            }
            ExprKind::RawBorrow { mutability, value } => {
                self.visit(value);
                let inner = self.ty_of(value);
                Type::pointer_of(mutability, inner)
            }

            ExprKind::Cast { value, target_ty } => {
                self.visit(value);
                self.cx.add_revisit(expr, NodeRevisitKind::Cast { value, target_ty: target_ty.clone() });
                target_ty
            }

            ExprKind::Index { value, index } => {
                self.visit(value);
                self.visit(index);
                let result = self.cx.new_ivar(InferClass::None);
                self.cx.add_revisit(expr, NodeRevisitKind::Index { value, index, result: result.clone() });
                result
            }

            ExprKind::Deref { value } => {
                self.visit(value);
                let value_ty = self.ty_of(value);
                let (inner, depth) = value_ty.strip_references();
                if depth > 0 {
                    inner.clone()
                } else {
                    let result = self.cx.new_ivar(InferClass::None);
                    self.cx.add_revisit(expr, NodeRevisitKind::Deref { value, result: result.clone() });
                    result
                }
            }

            ExprKind::Emplace { place, value } => {
                self.visit(place);
                self.visit(value);
                self.ty_of(place)
            }

            ExprKind::CallValue { callee, args } => {
                self.visit(callee);
                for a in &args {
                    self.visit(*a);
                }
                let result = self.cx.new_ivar(InferClass::None);
                self.cx.add_revisit(
                    expr,
                    NodeRevisitKind::CallValue { callee, args: args.clone(), result: result.clone() },
                );
                result
            }

            ExprKind::CallMethod { receiver, method, args, .. } => {
                self.visit(receiver);
                for a in &args {
                    self.visit(*a);
                }
                let result = self.cx.new_ivar(InferClass::None);
                self.cx.add_revisit(
                    expr,
                    NodeRevisitKind::CallMethod {
                        receiver,
                        method: method.clone(),
                        args: args.clone(),
                        result: result.clone(),
                    },
                );
                result
            }

            ExprKind::CallPath { args, .. } => {
                for a in &args {
                    self.visit(*a);
                }
                self.cx.new_ivar(InferClass::None)
            }

            ExprKind::Field { value, name } => {
                self.visit(value);
                let result = self.cx.new_ivar(InferClass::None);
                self.cx.add_revisit(expr, NodeRevisitKind::Field { value, name, result: result.clone() });
                result
            }

            ExprKind::Closure { params, declared_ret, body } => {
                for (pat, declared) in &params {
                    let ty = declared.clone().unwrap_or_else(|| self.cx.new_ivar(InferClass::None));
                    self.visit_pat(*pat, &ty);
                }
                self.visit(body);
                let ret = declared_ret.unwrap_or_else(|| self.ty_of(body));
                let arg_tys = params
                    .iter()
                    .map(|(p, _)| self.body.pats[*p].ty.clone().expect("pattern visited"))
                    .collect();
                Type::new(TypeKind::Closure { node_id: expr, args: arg_tys, ret })
            }

            ExprKind::Tuple(items) => {
                for i in &items {
                    self.visit(*i);
                }
                Type::new(TypeKind::Tuple(items.iter().map(|i| self.ty_of(*i)).collect()))
            }

            ExprKind::ArrayList(items) => {
                let elem = self.cx.new_ivar(InferClass::None);
                for i in &items {
                    self.visit(*i);
                    let item_ty = self.ty_of(*i);
                    self.cx.equate_types_coerce(span, &elem, &item_ty, *i);
                }
                Type::new(TypeKind::Array {
                    inner: elem,
                    size: crate::ty::ConstGeneric::Evaluated((items.len() as u64).to_le_bytes().to_vec()),
                })
            }

            ExprKind::ArraySized { value, count } => {
                self.visit(value);
                let elem = self.ty_of(value);
                Type::new(TypeKind::Array { inner: elem, size: count })
            }

            ExprKind::StructLiteral { fields, spread, .. } => {
                for f in &fields {
                    self.visit(f.value);
                }
                if let Some(spread) = spread {
                    self.visit(spread);
                }
                self.cx.new_ivar(InferClass::None)
            }

            ExprKind::TupleVariant { fields, .. } => {
                for f in &fields {
                    self.visit(*f);
                }
                self.cx.new_ivar(InferClass::None)
            }

            ExprKind::UnitVariant { .. } | ExprKind::PathExpr { .. } => self.cx.new_ivar(InferClass::None),

            ExprKind::ImplicitDeref { value }
            | ExprKind::ImplicitBorrow { value, .. } => {
                self.visit(value);
                self.ty_of(value)
            }
            ExprKind::ImplicitCast { value, target_ty } | ExprKind::ImplicitUnsize { value, target_ty } => {
                self.visit(value);
                target_ty
            }
        };

        self.set_ty(expr, result);
    }

    fn literal_ty(&mut self, lit: &Literal) -> Type {
        match lit {
            Literal::Bool(_) => Type::bool_(),
            Literal::Int(_, Some(p)) => Type::new(TypeKind::Primitive(*p)),
            Literal::Int(_, None) => self.cx.new_ivar(InferClass::Integer),
            Literal::Float(Some(p)) => Type::new(TypeKind::Primitive(*p)),
            Literal::Float(None) => self.cx.new_ivar(InferClass::Float),
            Literal::Str(_) => Type::borrow_of(Mutability::Shared, Type::str_()),
            Literal::ByteStr(bytes) => Type::borrow_of(
                Mutability::Shared,
                Type::new(TypeKind::Array {
                    inner: Type::new(TypeKind::Primitive(PrimitiveKind::U8)),
                    size: crate::ty::ConstGeneric::Evaluated((bytes.len() as u64).to_le_bytes().to_vec()),
                }),
            ),
            Literal::Char(_) => Type::new(TypeKind::Primitive(PrimitiveKind::Char)),
        }
    }

    fn visit_pat(&mut self, pat: PatId, expected: &Type) {
        self.visit_pat_against(pat, expected, None);
    }

    fn visit_pat_against(&mut self, pat: PatId, expected: &Type, scrutinee: Option<ExprId>) {
        let span = self.body.pats[pat].span;
        let mut taken = self.body.pats[pat].clone();
        if let Err(e) = self.cx.handle_pattern(span, &mut taken, expected, scrutinee) {
            self.cx.push_error(e);
        }
        self.body.pats[pat] = taken;
    }
}
