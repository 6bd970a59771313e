//! The inference-variable store (spec §4.1).
//!
//! Grounded on `hir_ty`'s own note (`infer/unify.rs`) that it "uses the
//! union-find implementation from the `ena` crate, which is extracted from
//! rustc" — here that crate is used directly, with two small `UnifyKey`
//! families, rather than through `chalk_solve::infer::InferenceTable`: this
//! engine's unification policy (occurs-check rewrite on `set`, not a lazy
//! substitution) follows mrustc's `HMTypeInferrence` instead of chalk's.

use std::collections::HashMap;

use ena::unify::{InPlaceUnificationTable, NoError, UnifyKey, UnifyValue};

use crate::ty::{ConstGeneric, ErasedAliasId, InferClass, PathParams, Type, TypeKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVid(u32);

impl UnifyKey for TyVid {
    type Value = TySlot;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> TyVid {
        TyVid(u)
    }

    fn tag() -> &'static str {
        "TyVid"
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstVid(u32);

impl UnifyKey for ConstVid {
    type Value = ConstSlot;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> ConstVid {
        ConstVid(u)
    }

    fn tag() -> &'static str {
        "ConstVid"
    }
}

/// The value an ivar's union-find root carries: either still unknown (with
/// its numeric class, for integer/float default fallback) or bound to a
/// concrete type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TySlot {
    Unknown(InferClass),
    Known(Type),
}

impl UnifyValue for TySlot {
    type Error = NoError;

    fn unify_values(lhs: &TySlot, rhs: &TySlot) -> Result<TySlot, NoError> {
        // `ena` calls this when two un-aliased keys are merged directly
        // (`union_var_var`, no rewrite already performed by the caller); the
        // context always resolves the bound type itself before picking a
        // value, so only the "both unknown" case should ever reach here.
        Ok(match (lhs, rhs) {
            (TySlot::Known(t), _) | (_, TySlot::Known(t)) => TySlot::Known(t.clone()),
            (TySlot::Unknown(InferClass::None), TySlot::Unknown(other))
            | (TySlot::Unknown(other), TySlot::Unknown(InferClass::None)) => {
                TySlot::Unknown(*other)
            }
            (TySlot::Unknown(a), TySlot::Unknown(_)) => TySlot::Unknown(*a),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstSlot {
    Unknown,
    Known(ConstGeneric),
}

impl UnifyValue for ConstSlot {
    type Error = NoError;

    fn unify_values(lhs: &ConstSlot, rhs: &ConstSlot) -> Result<ConstSlot, NoError> {
        Ok(match (lhs, rhs) {
            (ConstSlot::Known(c), _) | (_, ConstSlot::Known(c)) => ConstSlot::Known(c.clone()),
            (ConstSlot::Unknown, ConstSlot::Unknown) => ConstSlot::Unknown,
        })
    }
}

/// State for one `impl Trait`/erased-alias occurrence: the params it was
/// instantiated with (to detect hrtb-incompatible re-uses) and the concrete
/// type it has settled on so far, if any.
#[derive(Clone, Debug)]
pub struct ErasedAliasState {
    pub params: PathParams,
    pub current_type: Option<Type>,
}

/// Owns both union-find tables plus the bookkeeping the driver needs to know
/// whether a pass made progress (spec §4.7: "run until a pass makes no
/// changes").
pub struct IvarStore {
    types: InPlaceUnificationTable<TyVid>,
    consts: InPlaceUnificationTable<ConstVid>,
    /// Ivars known to require `Sized` (populated by `require_sized` calls);
    /// checked at the end against `CrateInfo::type_is_sized`.
    sized_flags: Vec<bool>,
    erased_type_aliases: HashMap<ErasedAliasId, ErasedAliasState>,
    changed: bool,
}

impl IvarStore {
    pub fn new() -> IvarStore {
        IvarStore {
            types: InPlaceUnificationTable::new(),
            consts: InPlaceUnificationTable::new(),
            sized_flags: Vec::new(),
            erased_type_aliases: HashMap::new(),
            changed: false,
        }
    }

    pub fn new_type_ivar(&mut self, class: InferClass) -> Type {
        let vid = self.types.new_key(TySlot::Unknown(class));
        self.sized_flags.push(false);
        debug_assert_eq!(self.sized_flags.len() as u32, self.types.len() as u32);
        Type::new(TypeKind::Infer { index: vid, class })
    }

    pub fn new_value_ivar(&mut self) -> ConstGeneric {
        let vid = self.consts.new_key(ConstSlot::Unknown);
        ConstGeneric::Infer(vid)
    }

    pub fn require_sized(&mut self, vid: TyVid) {
        let root = self.types.find(vid);
        let slot = &mut self.sized_flags[root.index() as usize];
        if !*slot {
            *slot = true;
            self.mark_change();
        }
    }

    pub fn is_required_sized(&mut self, vid: TyVid) -> bool {
        let root = self.types.find(vid);
        self.sized_flags[root.index() as usize]
    }

    /// The current binding of `vid`, one layer deep: `None` if still
    /// unbound, `Some(ty)` otherwise. Does not recurse into `ty` looking for
    /// further ivars.
    pub fn get(&mut self, vid: TyVid) -> Option<Type> {
        match self.types.probe_value(vid) {
            TySlot::Known(ty) => Some(ty),
            TySlot::Unknown(_) => None,
        }
    }

    /// Follows `ty` through as many bound ivars as necessary to reach either
    /// a concrete shape or an unbound ivar.
    pub fn get_deep(&mut self, ty: &Type) -> Type {
        let mut cur = ty.clone();
        loop {
            match cur.as_infer() {
                Some((vid, _)) => match self.get(vid) {
                    Some(next) => cur = next,
                    None => return cur,
                },
                None => return cur,
            }
        }
    }

    pub fn const_get(&mut self, vid: ConstVid) -> Option<ConstGeneric> {
        match self.consts.probe_value(vid) {
            ConstSlot::Known(c) => Some(c),
            ConstSlot::Unknown => None,
        }
    }

    pub fn mark_change(&mut self) {
        self.changed = true;
    }

    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    /// Binds `vid` to `ty`, rewriting away any indirection if `ty` is itself
    /// another (possibly bound) ivar, and performing an occurs check: a type
    /// binding that would contain its own ivar is always an error here
    /// rather than building an infinite type (following mrustc's
    /// `HMTypeInferrence::set_ivar_to`, which asserts the same).
    pub fn set(&mut self, vid: TyVid, ty: Type) -> Result<(), OccursCheckFailure> {
        let root = self.types.find(vid);
        let resolved = self.get_deep(&ty);
        if let Some((other_vid, _)) = resolved.as_infer() {
            if self.types.find(other_vid) == root {
                // `?T = ?T`: a no-op union, not a contradiction.
                return Ok(());
            }
        }
        if occurs(self, root, &resolved) {
            return Err(OccursCheckFailure);
        }
        let class = match self.types.probe_value(root) {
            TySlot::Unknown(c) => c,
            TySlot::Known(_) => InferClass::None,
        };
        let _ = class;
        self.types.union_value(root, TySlot::Known(resolved));
        self.mark_change();
        Ok(())
    }

    /// Unions two ivars without binding either to a concrete type (used when
    /// two unknowns are equated, e.g. `equate_types(?A, ?B)`).
    pub fn unify_vars(&mut self, a: TyVid, b: TyVid) {
        if self.types.find(a) != self.types.find(b) {
            self.types.union(a, b);
            self.mark_change();
        }
    }

    pub fn const_set(&mut self, vid: ConstVid, value: ConstGeneric) {
        self.consts.union_value(vid, ConstSlot::Known(value));
        self.mark_change();
    }

    pub fn erased_alias_state(&self, id: ErasedAliasId) -> Option<&ErasedAliasState> {
        self.erased_type_aliases.get(&id)
    }

    pub fn erased_alias_entry(&mut self, id: ErasedAliasId, params: PathParams) -> &mut ErasedAliasState {
        self.erased_type_aliases
            .entry(id)
            .or_insert_with(|| ErasedAliasState { params, current_type: None })
    }

    /// Every ivar allocated so far, by its original (not union-find-rooted)
    /// index, that is still unbound. Used by the fallback ladder once
    /// direct unification has stalled.
    pub fn all_unresolved(&mut self) -> Vec<TyVid> {
        let len = self.types.len() as u32;
        (0..len)
            .map(TyVid::from_index)
            .filter(|&vid| self.get(vid).is_none())
            .collect()
    }
}

impl Default for IvarStore {
    fn default() -> Self {
        IvarStore::new()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OccursCheckFailure;

fn occurs(store: &mut IvarStore, root: TyVid, ty: &Type) -> bool {
    match ty.kind() {
        TypeKind::Infer { index, .. } => store.types.find(*index) == root,
        TypeKind::Diverge | TypeKind::Primitive(_) | TypeKind::Generic { .. } | TypeKind::ErasedType(_) => {
            false
        }
        TypeKind::Path(_, _) => false,
        TypeKind::TraitObject { .. } => false,
        TypeKind::Array { inner, .. } | TypeKind::Slice { inner } => occurs(store, root, inner),
        TypeKind::Tuple(items) => items.iter().any(|t| occurs(store, root, t)),
        TypeKind::Borrow { inner, .. } | TypeKind::Pointer { inner, .. } => occurs(store, root, inner),
        TypeKind::NamedFunction { .. } => false,
        TypeKind::Function { args, ret, .. } => {
            args.iter().any(|t| occurs(store, root, t)) || occurs(store, root, ret)
        }
        TypeKind::Closure { args, ret, .. } => {
            args.iter().any(|t| occurs(store, root, t)) || occurs(store, root, ret)
        }
        TypeKind::Generator { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::PrimitiveKind;

    #[test]
    fn fresh_ivar_is_unbound() {
        let mut store = IvarStore::new();
        let ty = store.new_type_ivar(InferClass::None);
        let (vid, _) = ty.as_infer().unwrap();
        assert!(store.get(vid).is_none());
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut store = IvarStore::new();
        let ty = store.new_type_ivar(InferClass::None);
        let (vid, _) = ty.as_infer().unwrap();
        let concrete = Type::new(TypeKind::Primitive(PrimitiveKind::U8));
        store.set(vid, concrete.clone()).unwrap();
        assert_eq!(store.get(vid), Some(concrete));
    }

    #[test]
    fn occurs_check_rejects_self_reference() {
        let mut store = IvarStore::new();
        let ty = store.new_type_ivar(InferClass::None);
        let (vid, _) = ty.as_infer().unwrap();
        let wrapped = Type::new(TypeKind::Slice { inner: ty });
        assert!(store.set(vid, wrapped).is_err());
    }

    #[test]
    fn unifying_two_ivars_then_binding_one_binds_both() {
        let mut store = IvarStore::new();
        let a = store.new_type_ivar(InferClass::None);
        let b = store.new_type_ivar(InferClass::None);
        let (a_vid, _) = a.as_infer().unwrap();
        let (b_vid, _) = b.as_infer().unwrap();
        store.unify_vars(a_vid, b_vid);
        let concrete = Type::new(TypeKind::Primitive(PrimitiveKind::Bool));
        store.set(a_vid, concrete.clone()).unwrap();
        assert_eq!(store.get(b_vid), Some(concrete));
    }
}
