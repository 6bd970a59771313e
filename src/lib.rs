//! A constraint-solving type inference core for a Rust-like HIR.
//!
//! The crate owns no parser, name resolver, or trait-impl database; callers
//! supply a [`collab::CrateInfo`] implementation and a [`hir::FunctionBody`]
//! and get back either a fully resolved body or a [`error::TypeckError`].
//! Grounded on `hir_ty::infer_query` for the overall shape (build a
//! context, run inference, write results back) and on mrustc's
//! constraint-solving `Context` for the solver itself.

pub mod adv_revisit;
pub mod apply;
pub mod assoc;
pub mod coerce;
pub mod collab;
pub mod context;
pub mod driver;
pub mod enumerate;
pub mod error;
pub mod hir;
pub mod ivar;
pub mod possibility;
pub mod profile;
pub mod rules;
pub mod symbol;
pub mod ty;

use log::trace;

pub use collab::{CrateInfo, ModuleState};
pub use context::Context;
pub use error::{TypeckError, TypeckResult};
pub use hir::{FunctionBody, Pattern};
pub use ty::Type;

/// Typechecks one function body in place: enumerates rules over its
/// expressions, drains them to a fixed point, escalates through the
/// fallback ladder if needed, then writes every node's resolved type back
/// into its `res_ty`/pattern `ty` slot.
///
/// `args` are the function's parameter patterns paired with their declared
/// types; `return_type` is checked against the body's tail expression (or
/// its `return`/divergent exits).
pub fn typecheck(
    crate_info: &dyn CrateInfo,
    module_state: &ModuleState,
    args: &mut [(Pattern, Type)],
    return_type: &Type,
    body: &mut FunctionBody,
) -> TypeckResult<()> {
    let _timing = profile::span("typecheck");
    trace!("typecheck: {} arg(s)", args.len());

    let mut cx = Context::new(crate_info, module_state);

    for (pat, declared_ty) in args.iter_mut() {
        let span = pat.span;
        cx.handle_pattern(span, pat, declared_ty, None)?;
    }

    driver::run(&mut cx, body)?;

    let root_ty = body.exprs[body.root].res_ty.clone().expect("enumeration assigns every node a type");
    let root_span = body.exprs[body.root].span;
    cx.equate_types(root_span, return_type, &root_ty)?;

    if cx.has_errors() {
        return Err(cx.take_errors().into_iter().next().unwrap());
    }

    apply::writeback(&mut cx, body)?;

    Ok(())
}

/// Accessor mirroring `hir_ty`'s `Index<ExprId>`/`Index<PatId>` impls,
/// usable once [`typecheck`] has returned `Ok`.
pub fn type_of(body: &FunctionBody, expr: hir::ExprId) -> &Type {
    body.exprs[expr].res_ty.as_ref().expect("typecheck succeeded")
}

pub fn type_of_pat(body: &FunctionBody, pat: hir::PatId) -> &Type {
    body.pats[pat].ty.as_ref().expect("typecheck succeeded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{AutorefKind, Compare, DerefStep, ImplCandidate, MethodCandidate};
    use crate::hir::{Arm, BinOp, BindingMode, ExprKind, ExprNode, Literal, Pattern, PatternKind, Span};
    use crate::ty::{ConstGeneric, ItemId, ItemPath, Mutability, PathBinding, PathParams, PrimitiveKind, TypeKind};
    use la_arena::Arena;

    struct EmptyCrateInfo;

    impl CrateInfo for EmptyCrateInfo {
        fn find_trait_impls(
            &self,
            _trait_path: &ItemPath,
            _trait_params: &PathParams,
            _self_ty: &Type,
            _assoc_name: Option<&str>,
        ) -> Vec<ImplCandidate> {
            Vec::new()
        }

        fn autoderef(&self, _ty: &Type) -> Option<DerefStep> {
            None
        }

        fn autoderef_find_method(
            &self,
            _traits_in_scope: &[ItemId],
            _ty: &Type,
            _method_name: &str,
        ) -> Vec<MethodCandidate> {
            Vec::new()
        }

        fn find_field(&self, _ty: &Type, _name: &str) -> Option<Type> {
            None
        }

        fn type_is_sized(&self, _ty: &Type) -> Compare {
            Compare::Yes
        }

        fn lang_item_path(&self, _name: &str) -> Option<ItemPath> {
            None
        }
    }

    fn span() -> Span {
        Span { file: 0, start: 0, end: 0 }
    }

    #[test]
    fn literal_body_infers_bool() {
        let mut exprs = Arena::new();
        let root = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Bool(true)), span()));
        let mut body = FunctionBody::new(exprs, Arena::new(), root);

        let crate_info = EmptyCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        assert_eq!(type_of(&body, root).kind(), &TypeKind::Primitive(PrimitiveKind::Bool));
    }

    #[test]
    fn tuple_body_resolves_field_types() {
        let mut exprs = Arena::new();
        let a = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(1, Some(PrimitiveKind::I32))), span()));
        let b = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Bool(false)), span()));
        let root = exprs.alloc(ExprNode::new(ExprKind::Tuple(vec![a, b]), span()));
        let mut body = FunctionBody::new(exprs, Arena::new(), root);

        let crate_info = EmptyCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        match type_of(&body, root).kind() {
            TypeKind::Tuple(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0], Type::new(TypeKind::Primitive(PrimitiveKind::I32)));
                assert_eq!(fields[1], Type::bool_());
            }
            other => panic!("expected a tuple type, got {:?}", other),
        }
    }

    #[test]
    fn unresolved_integer_literal_defaults_to_i32() {
        let mut exprs = Arena::new();
        let root = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(5, None)), span()));
        let mut body = FunctionBody::new(exprs, Arena::new(), root);

        let crate_info = EmptyCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        assert_eq!(type_of(&body, root), &Type::new(TypeKind::Primitive(PrimitiveKind::I32)));
    }

    /// A `CrateInfo` that only resolves the `add` lang item, so `1 + 2`
    /// routes through `assoc::resolve_builtin_operator` instead of falling
    /// back to plain equality (spec §4.5 step 1).
    struct AddOperatorCrateInfo;

    impl CrateInfo for AddOperatorCrateInfo {
        fn find_trait_impls(
            &self,
            _trait_path: &ItemPath,
            _trait_params: &PathParams,
            _self_ty: &Type,
            _assoc_name: Option<&str>,
        ) -> Vec<ImplCandidate> {
            Vec::new()
        }

        fn autoderef(&self, _ty: &Type) -> Option<DerefStep> {
            None
        }

        fn autoderef_find_method(
            &self,
            _traits_in_scope: &[ItemId],
            _ty: &Type,
            _method_name: &str,
        ) -> Vec<MethodCandidate> {
            Vec::new()
        }

        fn find_field(&self, _ty: &Type, _name: &str) -> Option<Type> {
            None
        }

        fn type_is_sized(&self, _ty: &Type) -> Compare {
            Compare::Yes
        }

        fn lang_item_path(&self, name: &str) -> Option<ItemPath> {
            (name == "add").then(|| ItemPath { item: ItemId(0), name: "add".into(), params: PathParams::empty() })
        }
    }

    /// `let x: u32 = 1 + 2;` — neither literal carries a concrete type, so
    /// the only way either ivar gets pinned is by `process_associated`
    /// feeding the already-resolved `let` type backward into the operand
    /// (the fix for the deadlock where `self_ty` stalled forever).
    #[test]
    fn builtin_arithmetic_backpropagates_operand_type() {
        let mut exprs = Arena::new();
        let mut pats = Arena::new();

        let lhs = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(1, None)), span()));
        let rhs = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(2, None)), span()));
        let sum = exprs.alloc(ExprNode::new(ExprKind::BinOp { op: BinOp::Add, lhs, rhs }, span()));
        let pat_x = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "x".into(), mode: BindingMode::Move, slot: 0, sub: None },
            span(),
        ));
        let root = exprs.alloc(ExprNode::new(
            ExprKind::Let {
                pat: pat_x,
                declared_ty: Some(Type::new(TypeKind::Primitive(PrimitiveKind::U32))),
                init: sum,
            },
            span(),
        ));
        let mut body = FunctionBody::new(exprs, pats, root);

        let crate_info = AddOperatorCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        let u32_ty = Type::new(TypeKind::Primitive(PrimitiveKind::U32));
        assert_eq!(type_of(&body, sum), &u32_ty);
        assert_eq!(type_of_pat(&body, pat_x), &u32_ty);
    }

    /// A call argument typed `&[i32; 3]` passed to a parameter declared
    /// `&[i32]`: only reachable through `equate_types_coerce` (direct
    /// `equate_types` would reject `Array` against `Slice` outright), and
    /// exercises the coerce kernel's reborrow-unsize arena reseat.
    #[test]
    fn call_argument_array_to_slice_unsizing_rewrites_arena() {
        let mut exprs = Arena::new();
        let mut pats = Arena::new();

        let i32_ty = Type::new(TypeKind::Primitive(PrimitiveKind::I32));
        let slice_ref_ty = Type::borrow_of(Mutability::Shared, Type::new(TypeKind::Slice { inner: i32_ty.clone() }));

        let param_pat = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "s".into(), mode: BindingMode::Move, slot: 0, sub: None },
            span(),
        ));
        let closure_body = exprs.alloc(ExprNode::new(ExprKind::Tuple(Vec::new()), span()));
        let closure = exprs.alloc(ExprNode::new(
            ExprKind::Closure {
                params: vec![(param_pat, Some(slice_ref_ty.clone()))],
                declared_ret: Some(Type::unit()),
                body: closure_body,
            },
            span(),
        ));

        let elem = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(0, Some(PrimitiveKind::I32))), span()));
        let array_expr = exprs.alloc(ExprNode::new(
            ExprKind::ArraySized { value: elem, count: ConstGeneric::Evaluated(3u64.to_le_bytes().to_vec()) },
            span(),
        ));
        let borrow_expr =
            exprs.alloc(ExprNode::new(ExprKind::Borrow { mutability: Mutability::Shared, value: array_expr }, span()));

        let root = exprs.alloc(ExprNode::new(
            ExprKind::CallValue { callee: closure, args: vec![borrow_expr] },
            span(),
        ));
        let mut body = FunctionBody::new(exprs, pats, root);

        let crate_info = EmptyCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        assert_eq!(type_of(&body, borrow_expr), &slice_ref_ty);
        match &body.exprs[borrow_expr].kind {
            ExprKind::ImplicitUnsize { value, target_ty } => {
                assert_eq!(target_ty, &slice_ref_ty);
                let array_ref_ty = Type::borrow_of(
                    Mutability::Shared,
                    Type::new(TypeKind::Array { inner: i32_ty, size: ConstGeneric::Evaluated(3u64.to_le_bytes().to_vec()) }),
                );
                assert_eq!(body.exprs[*value].res_ty.as_ref().unwrap(), &array_ref_ty);
            }
            other => panic!("expected the argument to be rewritten into an implicit unsize wrapper, got {:?}", other),
        }
    }

    /// A `CrateInfo` exposing exactly one method, `magic`, on `i32` — used to
    /// confirm `process_call_method` checks the *receiver's* type, not the
    /// call's own unresolved result ivar (the bug comment 2 named).
    struct MagicMethodCrateInfo;

    impl CrateInfo for MagicMethodCrateInfo {
        fn find_trait_impls(
            &self,
            _trait_path: &ItemPath,
            _trait_params: &PathParams,
            _self_ty: &Type,
            _assoc_name: Option<&str>,
        ) -> Vec<ImplCandidate> {
            Vec::new()
        }

        fn autoderef(&self, _ty: &Type) -> Option<DerefStep> {
            None
        }

        fn autoderef_find_method(
            &self,
            _traits_in_scope: &[ItemId],
            ty: &Type,
            method_name: &str,
        ) -> Vec<MethodCandidate> {
            if method_name == "magic" && matches!(ty.kind(), TypeKind::Primitive(PrimitiveKind::I32)) {
                vec![MethodCandidate {
                    path: ItemPath { item: ItemId(0), name: "magic".into(), params: PathParams::empty() },
                    autoref: AutorefKind::None,
                    autoderef_count: 0,
                    from_trait: false,
                    trait_: None,
                }]
            } else {
                Vec::new()
            }
        }

        fn find_field(&self, _ty: &Type, _name: &str) -> Option<Type> {
            None
        }

        fn type_is_sized(&self, _ty: &Type) -> Compare {
            Compare::Yes
        }

        fn lang_item_path(&self, _name: &str) -> Option<ItemPath> {
            None
        }
    }

    /// `let x: u32 = 5i32.magic();` — the method call itself never binds its
    /// own result ivar (no return-type oracle exists for `MethodCandidate`);
    /// it only resolves once the surrounding `let`'s declared type feeds
    /// back in through the possibility tracker's single-survivor rule.
    #[test]
    fn call_method_resolves_then_backpropagates_result_type() {
        let mut exprs = Arena::new();
        let mut pats = Arena::new();

        let receiver = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(5, Some(PrimitiveKind::I32))), span()));
        let call = exprs.alloc(ExprNode::new(
            ExprKind::CallMethod { receiver, method: "magic".into(), generics: Default::default(), args: Vec::new() },
            span(),
        ));
        let pat_x = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "x".into(), mode: BindingMode::Move, slot: 0, sub: None },
            span(),
        ));
        let root = exprs.alloc(ExprNode::new(
            ExprKind::Let {
                pat: pat_x,
                declared_ty: Some(Type::new(TypeKind::Primitive(PrimitiveKind::U32))),
                init: call,
            },
            span(),
        ));
        let mut body = FunctionBody::new(exprs, pats, root);

        let crate_info = MagicMethodCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        let u32_ty = Type::new(TypeKind::Primitive(PrimitiveKind::U32));
        assert_eq!(type_of(&body, call), &u32_ty);
        assert_eq!(type_of_pat(&body, pat_x), &u32_ty);
    }

    /// A `CrateInfo` whose only `Deref` step turns a `BoxLike<i32>` into an
    /// `i32`, used to drive the coerce kernel's autoderef re-borrow walk.
    struct BoxLikeDerefCrateInfo {
        box_ty: Type,
    }

    impl CrateInfo for BoxLikeDerefCrateInfo {
        fn find_trait_impls(
            &self,
            _trait_path: &ItemPath,
            _trait_params: &PathParams,
            _self_ty: &Type,
            _assoc_name: Option<&str>,
        ) -> Vec<ImplCandidate> {
            Vec::new()
        }

        fn autoderef(&self, ty: &Type) -> Option<DerefStep> {
            if ty == &self.box_ty {
                Some(DerefStep { result: Type::new(TypeKind::Primitive(PrimitiveKind::I32)), via_trait: true })
            } else {
                None
            }
        }

        fn autoderef_find_method(
            &self,
            _traits_in_scope: &[ItemId],
            _ty: &Type,
            _method_name: &str,
        ) -> Vec<MethodCandidate> {
            Vec::new()
        }

        fn find_field(&self, _ty: &Type, _name: &str) -> Option<Type> {
            None
        }

        fn type_is_sized(&self, _ty: &Type) -> Compare {
            Compare::Yes
        }

        fn lang_item_path(&self, _name: &str) -> Option<ItemPath> {
            None
        }
    }

    /// `let y: &i32 = &box_val;` where `box_val: BoxLike<i32>` — the
    /// reborrow needs an autoderef hop through `BoxLike<i32> -> i32`, which
    /// `reborrow_unsize` resolves by rewriting the `Borrow`'s own child into
    /// an `ImplicitDeref` node rather than replacing the whole expression
    /// (spec §9's arena-reseat redesign).
    #[test]
    fn deref_coercion_rewrites_borrow_child_as_implicit_deref() {
        let mut exprs = Arena::new();
        let mut pats = Arena::new();

        let i32_ty = Type::new(TypeKind::Primitive(PrimitiveKind::I32));
        let box_ty = Type::new(TypeKind::Path(
            ItemPath { item: ItemId(1), name: "BoxLike".into(), params: PathParams { types: vec![i32_ty.clone()], consts: Vec::new() } },
            PathBinding::Struct(ItemId(1)),
        ));

        // `ImplicitCast` returns its `target_ty` unconditionally at
        // enumeration time (it is never itself re-checked by a revisit),
        // which makes it a convenient way to mint an expression with an
        // arbitrary concrete type for this test without a real `Box::new`.
        let marker = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(0, Some(PrimitiveKind::I32))), span()));
        let box_val = exprs.alloc(ExprNode::new(ExprKind::ImplicitCast { value: marker, target_ty: box_ty.clone() }, span()));
        let borrow_box = exprs.alloc(ExprNode::new(ExprKind::Borrow { mutability: Mutability::Shared, value: box_val }, span()));

        let pat_y = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "y".into(), mode: BindingMode::Move, slot: 0, sub: None },
            span(),
        ));
        let ref_i32_ty = Type::borrow_of(Mutability::Shared, i32_ty.clone());
        let root = exprs.alloc(ExprNode::new(
            ExprKind::Let { pat: pat_y, declared_ty: Some(ref_i32_ty.clone()), init: borrow_box },
            span(),
        ));
        let mut body = FunctionBody::new(exprs, pats, root);

        let crate_info = BoxLikeDerefCrateInfo { box_ty };
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        assert_eq!(type_of(&body, borrow_box), &ref_i32_ty);
        match &body.exprs[borrow_box].kind {
            ExprKind::Borrow { mutability: Mutability::Shared, value } => match &body.exprs[*value].kind {
                ExprKind::ImplicitDeref { value: inner } => {
                    assert_eq!(*inner, box_val);
                    assert_eq!(body.exprs[*value].res_ty.as_ref().unwrap(), &i32_ty);
                }
                other => panic!("expected the reborrow's child to become an implicit deref, got {:?}", other),
            },
            other => panic!("expected the source expression to stay a Borrow node, got {:?}", other),
        }
        assert_eq!(type_of_pat(&body, pat_y), &ref_i32_ty);
    }

    /// `let x: i64 = if cond { 1i64 } else { 2 };` — the untyped literal in
    /// the `else` arm only shares a coercion partner with the still-unbound
    /// `if`'s own result ivar, so direct unification and the early fallback
    /// rungs all stall; only `FinalOption` (the last rung of the ladder) has
    /// a genuinely concrete candidate (`i64`, from the typed `then` arm and
    /// the `let`'s own declared type) to settle on.
    #[test]
    fn if_else_branch_unification_defaults_untyped_literal() {
        let mut exprs = Arena::new();
        let mut pats = Arena::new();

        let cond = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Bool(true)), span()));
        let then_branch = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(1, Some(PrimitiveKind::I64))), span()));
        let else_branch = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(2, None)), span()));
        let if_expr = exprs.alloc(ExprNode::new(
            ExprKind::If { cond, then_branch, else_branch: Some(else_branch) },
            span(),
        ));
        let pat_x = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "x".into(), mode: BindingMode::Move, slot: 0, sub: None },
            span(),
        ));
        let root = exprs.alloc(ExprNode::new(
            ExprKind::Let {
                pat: pat_x,
                declared_ty: Some(Type::new(TypeKind::Primitive(PrimitiveKind::I64))),
                init: if_expr,
            },
            span(),
        ));
        let mut body = FunctionBody::new(exprs, pats, root);

        let crate_info = EmptyCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        let i64_ty = Type::new(TypeKind::Primitive(PrimitiveKind::I64));
        assert_eq!(type_of(&body, if_expr), &i64_ty);
        assert_eq!(type_of(&body, else_branch), &i64_ty);
        assert_eq!(type_of_pat(&body, pat_x), &i64_ty);
    }

    /// `match &arr { [a, b] => true }` where `arr: [i32; 2]` — exercises the
    /// `Slice` pattern arm `handle_pattern` now dispatches: match ergonomics
    /// records the scrutinee's single reference layer, and `slice_pat`
    /// checks the decoded array length (not its byte encoding) against the
    /// pattern's two fixed bindings.
    #[test]
    fn match_ergonomics_and_slice_pattern_validate_arity() {
        let mut exprs = Arena::new();
        let mut pats = Arena::new();

        let i32_ty = Type::new(TypeKind::Primitive(PrimitiveKind::I32));
        let elem = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Int(0, Some(PrimitiveKind::I32))), span()));
        let array_expr = exprs.alloc(ExprNode::new(
            ExprKind::ArraySized { value: elem, count: ConstGeneric::Evaluated(2u64.to_le_bytes().to_vec()) },
            span(),
        ));
        let scrutinee =
            exprs.alloc(ExprNode::new(ExprKind::Borrow { mutability: Mutability::Shared, value: array_expr }, span()));

        let pat_a = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "a".into(), mode: BindingMode::Move, slot: 0, sub: None },
            span(),
        ));
        let pat_b = pats.alloc(Pattern::new(
            PatternKind::Binding { name: "b".into(), mode: BindingMode::Move, slot: 1, sub: None },
            span(),
        ));
        let slice_pat = pats.alloc(Pattern::new(
            PatternKind::Slice { before: vec![pat_a, pat_b], middle: None, after: Vec::new() },
            span(),
        ));

        let body_expr = exprs.alloc(ExprNode::new(ExprKind::Literal(Literal::Bool(true)), span()));
        let root = exprs.alloc(ExprNode::new(
            ExprKind::Match { scrutinee, arms: vec![Arm { pat: slice_pat, guard: None, body: body_expr }] },
            span(),
        ));
        let mut body = FunctionBody::new(exprs, pats, root);

        let crate_info = EmptyCrateInfo;
        let module = ModuleState::default();
        let mut cx = Context::new(&crate_info, &module);
        driver::run(&mut cx, &mut body).unwrap();
        apply::writeback(&mut cx, &mut body).unwrap();

        assert_eq!(type_of(&body, root), &Type::bool_());
        let scrutinee_ty = Type::borrow_of(Mutability::Shared, Type::new(TypeKind::Array { inner: i32_ty, size: ConstGeneric::Evaluated(2u64.to_le_bytes().to_vec()) }));
        assert_eq!(type_of_pat(&body, slice_pat), &scrutinee_ty);
    }
}
