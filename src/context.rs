//! `Context`: the one big mutable struct the whole pass operates through,
//! grounded on mrustc's `Context` (`expr_cs.hpp`) for its method surface and
//! on `hir_ty::InferenceContext` (`infer.rs`) for the "single god object
//! threaded through every visitor" shape.

use crate::collab::{CrateInfo, ModuleState};
use crate::error::{TypeckError, TypeckResult};
use crate::hir::{ExprId, Span};
use crate::ivar::{IvarStore, TyVid};
use crate::possibility::{CoerceOp, PossibilityTracker};
use crate::rules::{AdvRevisit, AdvRevisitKind, AssociatedRule, CoercionRule, NodeRevisit, NodeRevisitKind};
use crate::ty::{InferClass, ItemPath, PathParams, Type, TypeKind};

/// One local variable/binding slot, addressed by the `slot` index a
/// `PatternKind::Binding` carries.
#[derive(Clone, Debug)]
pub struct LocalBinding {
    pub ty: Type,
}

pub struct Context<'c> {
    pub crate_info: &'c dyn CrateInfo,
    pub module: &'c ModuleState,

    pub ivars: IvarStore,
    pub possible: PossibilityTracker,

    bindings: Vec<LocalBinding>,

    coercions: Vec<CoercionRule>,
    associated: Vec<AssociatedRule>,
    revisits: Vec<NodeRevisit>,
    adv_revisits: Vec<AdvRevisit>,
    next_rule_id: usize,

    errors: Vec<TypeckError>,
}

impl<'c> Context<'c> {
    pub fn new(crate_info: &'c dyn CrateInfo, module: &'c ModuleState) -> Context<'c> {
        Context {
            crate_info,
            module,
            ivars: IvarStore::new(),
            possible: PossibilityTracker::new(),
            bindings: Vec::new(),
            coercions: Vec::new(),
            associated: Vec::new(),
            revisits: Vec::new(),
            adv_revisits: Vec::new(),
            next_rule_id: 0,
            errors: Vec::new(),
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_rule_id;
        self.next_rule_id += 1;
        id
    }

    pub fn new_ivar(&mut self, class: InferClass) -> Type {
        self.ivars.new_type_ivar(class)
    }

    pub fn add_var(&mut self, ty: Type) -> u32 {
        let slot = self.bindings.len() as u32;
        self.bindings.push(LocalBinding { ty });
        slot
    }

    pub fn get_var(&self, slot: u32) -> &Type {
        &self.bindings[slot as usize].ty
    }

    pub fn require_sized(&mut self, span: Span, ty: &Type) {
        let resolved = self.ivars.get_deep(ty);
        if let Some((vid, _)) = resolved.as_infer() {
            self.ivars.require_sized(vid);
            return;
        }
        if self.crate_info.type_is_sized(&resolved) == crate::collab::Compare::No {
            self.errors.push(TypeckError::UnsizedWhereSized { span, ty: resolved });
        }
    }

    pub fn add_trait_bound(&mut self, ty: &Type, trait_path: ItemPath, trait_params: PathParams) {
        let resolved = self.ivars.get_deep(ty);
        if let Some((vid, _)) = resolved.as_infer() {
            self.possible.possible_equate_ivar_bounds(vid, trait_path, trait_params);
        }
        // A fully-resolved `ty` is checked directly by the associated-rule
        // solver rather than recorded here; see `assoc::check_bound`.
    }

    pub fn get_ivar_possibilities(&self, ty: &Type) -> Option<&crate::possibility::IvarPossible> {
        let (vid, _) = ty.as_infer()?;
        self.possible.get(vid)
    }

    pub fn add_revisit(&mut self, expr: ExprId, kind: NodeRevisitKind) {
        let id = self.next_id();
        self.revisits.push(NodeRevisit { id, expr, kind });
    }

    pub fn add_revisit_adv(&mut self, span: Span, kind: AdvRevisitKind) {
        let id = self.next_id();
        self.adv_revisits.push(AdvRevisit { id, span, kind });
    }

    pub fn add_coercion(&mut self, dest: Type, src: Type, src_expr: ExprId) {
        let id = self.next_id();
        self.coercions.push(CoercionRule { id, dest, src, src_expr });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_associated(
        &mut self,
        span: Span,
        lhs: Type,
        self_ty: Type,
        trait_path: ItemPath,
        trait_params: PathParams,
        assoc_name: Option<crate::symbol::Symbol>,
        is_operator: bool,
    ) {
        let id = self.next_id();
        self.associated.push(AssociatedRule {
            id,
            span,
            lhs,
            trait_path,
            trait_params,
            assoc_name,
            self_ty,
            is_operator,
        });
    }

    pub fn push_error(&mut self, err: TypeckError) {
        self.errors.push(err);
    }

    pub fn take_errors(&mut self) -> Vec<TypeckError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn drain_coercions(&mut self) -> Vec<CoercionRule> {
        std::mem::take(&mut self.coercions)
    }

    pub fn requeue_coercions(&mut self, rules: Vec<CoercionRule>) {
        self.coercions.extend(rules);
    }

    pub fn drain_associated(&mut self) -> Vec<AssociatedRule> {
        std::mem::take(&mut self.associated)
    }

    pub fn requeue_associated(&mut self, rules: Vec<AssociatedRule>) {
        self.associated.extend(rules);
    }

    pub fn drain_revisits(&mut self) -> Vec<NodeRevisit> {
        std::mem::take(&mut self.revisits)
    }

    pub fn requeue_revisits(&mut self, rules: Vec<NodeRevisit>) {
        self.revisits.extend(rules);
    }

    pub fn drain_adv_revisits(&mut self) -> Vec<AdvRevisit> {
        std::mem::take(&mut self.adv_revisits)
    }

    pub fn requeue_adv_revisits(&mut self, rules: Vec<AdvRevisit>) {
        self.adv_revisits.extend(rules);
    }

    pub fn pending_rule_count(&self) -> usize {
        self.coercions.len() + self.associated.len() + self.revisits.len() + self.adv_revisits.len()
    }

    pub fn unresolved_ivars(&mut self) -> Vec<TyVid> {
        self.ivars.all_unresolved()
    }

    /// Direct structural equality between two types, recursing through
    /// ivars and binding unbound ones as needed. This is the base operation
    /// every other `equate_*`/coercion rule builds on (mrustc's
    /// `Context::equate_types`).
    pub fn equate_types(&mut self, span: Span, a: &Type, b: &Type) -> TypeckResult<()> {
        let a = self.ivars.get_deep(a);
        let b = self.ivars.get_deep(b);
        match (a.as_infer(), b.as_infer()) {
            (Some((va, _)), Some((vb, _))) => {
                if va != vb {
                    self.possible.possible_equate_ivar(va, vb);
                    self.ivars.unify_vars(va, vb);
                }
                Ok(())
            }
            (Some((va, _)), None) => self.bind_ivar(span, va, b),
            (None, Some((vb, _))) => self.bind_ivar(span, vb, a),
            (None, None) => self.equate_concrete(span, &a, &b),
        }
    }

    fn bind_ivar(&mut self, span: Span, vid: TyVid, ty: Type) -> TypeckResult<()> {
        self.possible.possible_equate_ivar_unknown(vid, ty.clone());
        if self.ivars.is_required_sized(vid) {
            if self.crate_info.type_is_sized(&ty) == crate::collab::Compare::No {
                return Err(TypeckError::UnsizedWhereSized { span, ty });
            }
        }
        self.ivars
            .set(vid, ty.clone())
            .map_err(|_| TypeckError::TypeMismatch { span, expected: ty.clone(), found: ty })
    }

    fn equate_concrete(&mut self, span: Span, a: &Type, b: &Type) -> TypeckResult<()> {
        match (a.kind(), b.kind()) {
            (TypeKind::Diverge, _) | (_, TypeKind::Diverge) => Ok(()),
            (TypeKind::Primitive(pa), TypeKind::Primitive(pb)) if pa == pb => Ok(()),
            (TypeKind::Tuple(fa), TypeKind::Tuple(fb)) if fa.len() == fb.len() => {
                for (x, y) in fa.iter().zip(fb.iter()) {
                    self.equate_types(span, x, y)?;
                }
                Ok(())
            }
            (TypeKind::Array { inner: ia, .. }, TypeKind::Array { inner: ib, .. }) => {
                self.equate_types(span, ia, ib)
            }
            (TypeKind::Slice { inner: ia }, TypeKind::Slice { inner: ib }) => self.equate_types(span, ia, ib),
            (TypeKind::Borrow { mutability: ma, inner: ia }, TypeKind::Borrow { mutability: mb, inner: ib })
                if ma == mb =>
            {
                self.equate_types(span, ia, ib)
            }
            (TypeKind::Pointer { mutability: ma, inner: ia }, TypeKind::Pointer { mutability: mb, inner: ib })
                if ma == mb =>
            {
                self.equate_types(span, ia, ib)
            }
            (TypeKind::Path(pa, _), TypeKind::Path(pb, _)) if pa.item == pb.item => {
                for (x, y) in pa.params.types.iter().zip(pb.params.types.iter()) {
                    self.equate_types(span, x, y)?;
                }
                Ok(())
            }
            (TypeKind::Function { args: aa, ret: ra, .. }, TypeKind::Function { args: ab, ret: rb, .. })
                if aa.len() == ab.len() =>
            {
                for (x, y) in aa.iter().zip(ab.iter()) {
                    self.equate_types(span, x, y)?;
                }
                self.equate_types(span, ra, rb)
            }
            (TypeKind::ErasedType(id_a), TypeKind::ErasedType(id_b)) if id_a == id_b => Ok(()),
            _ if a == b => Ok(()),
            _ => Err(TypeckError::TypeMismatch { span, expected: a.clone(), found: b.clone() }),
        }
    }

    /// Queues a coercion rule rather than equating directly: `src_expr`'s
    /// declared type may still need an implicit deref/borrow/unsize to
    /// reach `dest` (spec §4.4).
    pub fn equate_types_coerce(&mut self, _span: Span, dest: &Type, src: &Type, src_expr: ExprId) {
        let dest = self.ivars.get_deep(dest);
        let src_resolved = self.ivars.get_deep(src);
        if let Some((vid, _)) = dest.as_infer() {
            self.possible
                .possible_equate_type_unknown(vid, src_resolved.clone(), Some(CoerceOp::Coercion));
        }
        if let Some((vid, _)) = src_resolved.as_infer() {
            self.possible.possible_equate_type_unknown(vid, dest.clone(), Some(CoerceOp::Coercion));
        }
        self.add_coercion(dest, src_resolved, src_expr);
    }

    /// Queues an associated-type projection: `lhs == <self_ty as
    /// trait_path<trait_params>>::assoc_name` (spec §4.5). `is_operator`
    /// marks a rule desugared from a `BinOp`/`UniOp` lang item, so
    /// `assoc::process_associated` can try the built-in primitive semantics
    /// before searching impls.
    #[allow(clippy::too_many_arguments)]
    pub fn equate_types_assoc(
        &mut self,
        span: Span,
        lhs: &Type,
        trait_path: ItemPath,
        trait_params: PathParams,
        self_ty: &Type,
        assoc_name: Option<crate::symbol::Symbol>,
        is_operator: bool,
    ) {
        let lhs = self.ivars.get_deep(lhs);
        let self_ty = self.ivars.get_deep(self_ty);
        self.add_associated(span, lhs, self_ty, trait_path, trait_params, assoc_name, is_operator);
    }

    /// Binds a pattern's declared/expected type into its binding slots,
    /// following reference depth for match-ergonomics default binding modes
    /// (spec §4.8 `MatchErgonomics`). `scrutinee` is the matched expression
    /// when this pattern is a match arm (`None` for `let`/closure-param
    /// patterns, which have nothing to run ergonomics against).
    pub fn handle_pattern(
        &mut self,
        span: Span,
        pat: &mut crate::hir::Pattern,
        expected: &Type,
        scrutinee: Option<ExprId>,
    ) -> TypeckResult<()> {
        use crate::hir::PatternKind::*;
        let expected = self.ivars.get_deep(expected);
        pat.ty = Some(expected.clone());
        match &pat.kind {
            Wildcard | Literal(_) | Path(_) => Ok(()),
            Binding { .. } => Ok(()),
            Tuple(elems) => {
                let (inner, _depth) = expected.strip_references();
                if let TypeKind::Tuple(field_tys) = inner.kind() {
                    if field_tys.len() != elems.len() {
                        return Err(TypeckError::ArityMismatch {
                            span,
                            expected: field_tys.len(),
                            found: elems.len(),
                        });
                    }
                } else if inner.is_infer() {
                    self.add_revisit_adv(span, AdvRevisitKind::SplitTuple { pat_ty: inner.clone(), arity: elems.len() });
                }
                Ok(())
            }
            Slice { before, middle, after } => {
                let (inner, _depth) = expected.strip_references();
                if let Some(scrutinee) = scrutinee {
                    self.add_revisit_adv(span, AdvRevisitKind::MatchErgonomics { scrutinee, ref_depth: 0 });
                }
                let fixed_len = before.len() + after.len();
                let has_rest = middle.is_some();
                self.add_revisit_adv(span, AdvRevisitKind::SlicePat { pat_ty: inner.clone(), fixed_len, has_rest });
                if middle.is_some() {
                    self.add_revisit_adv(
                        span,
                        AdvRevisitKind::SplitSlicePat { pat_ty: inner, before: before.len(), after: after.len() },
                    );
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
