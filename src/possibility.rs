//! The possibility tracker (spec §4.6), grounded verbatim on mrustc's
//! `IVarPossible` (`examples/original_source/src/hir_typeck/expr_cs.hpp`):
//! per-ivar sets of types it could coerce to/from, a default-type set, and a
//! record of trait bounds it must satisfy, used to pick a concrete type for
//! an ivar that direct unification never pinned down.

use ena::unify::UnifyKey;

use crate::ivar::TyVid;
use crate::ty::{ItemPath, Mutability, PathParams, Type, TypeKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoerceOp {
    Coercion,
    Unsizing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoerceTy {
    pub op: CoerceOp,
    pub ty: Type,
}

/// Everything known about one ivar's possible resolutions, short of an
/// outright binding.
#[derive(Clone, Debug, Default)]
pub struct IvarPossible {
    /// Set once contradictory possibilities were recorded for this ivar;
    /// once set, only the "final option" fallback may still pick one.
    pub force_disable: bool,
    /// Set when an explicit "cannot coerce to anything" constraint fired.
    pub force_no_to: bool,
    /// Set when an explicit "cannot coerce from anything" constraint fired.
    pub force_no_from: bool,
    pub types_coerce_to: Vec<CoerceTy>,
    pub types_coerce_from: Vec<CoerceTy>,
    /// Candidate exact types, deduplicated by `PartialEq`, not a `HashSet`
    /// so the ordering used for "single survivor" checks stays stable.
    pub types_default: Vec<Type>,
    pub has_bounded: bool,
    /// Whether any of `bounded`'s trait bounds names this ivar as the
    /// `Self` type of the bound (as opposed to an associated-type output).
    pub bounds_include_self: bool,
    /// Trait bounds this ivar participates in; insertion order matters for
    /// `PickFirstBound` fallback (spec §9.1 open-question decision).
    pub bounded: Vec<(ItemPath, PathParams)>,
}

impl IvarPossible {
    fn push_default(&mut self, ty: Type) {
        if !self.types_default.iter().any(|t| t == &ty) {
            self.types_default.push(ty);
        }
    }

    fn push_coerce_to(&mut self, ct: CoerceTy) {
        if !self.types_coerce_to.iter().any(|c| c == &ct) {
            self.types_coerce_to.push(ct);
        }
    }

    fn push_coerce_from(&mut self, ct: CoerceTy) {
        if !self.types_coerce_from.iter().any(|c| c == &ct) {
            self.types_coerce_from.push(ct);
        }
    }

    /// Every possibility this ivar currently admits as an exact type,
    /// whichever list it came from.
    pub fn all_candidates(&self) -> Vec<Type> {
        let mut out = self.types_default.clone();
        for ct in self.types_coerce_to.iter().chain(self.types_coerce_from.iter()) {
            if !out.iter().any(|t| t == &ct.ty) {
                out.push(ct.ty.clone());
            }
        }
        out
    }
}

/// Order fallback is attempted in once direct unification has run dry (spec
/// §4.6). Fixed by the open-question decision recorded in DESIGN.md: this is
/// a literal match over the variants in this order, not a priority number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FallbackMode {
    Backwards,
    Assume,
    IgnoreWeakDisable,
    PickFirstBound,
    FinalOption,
}

impl FallbackMode {
    pub const ORDER: [FallbackMode; 5] = [
        FallbackMode::Backwards,
        FallbackMode::Assume,
        FallbackMode::IgnoreWeakDisable,
        FallbackMode::PickFirstBound,
        FallbackMode::FinalOption,
    ];
}

/// Per-ivar possibility state, indexed in parallel with `IvarStore`'s type
/// table.
#[derive(Default)]
pub struct PossibilityTracker {
    entries: Vec<IvarPossible>,
}

impl PossibilityTracker {
    pub fn new() -> PossibilityTracker {
        PossibilityTracker { entries: Vec::new() }
    }

    fn ensure(&mut self, vid: TyVid) -> &mut IvarPossible {
        let idx = vid_index(vid);
        if self.entries.len() <= idx {
            self.entries.resize_with(idx + 1, IvarPossible::default);
        }
        &mut self.entries[idx]
    }

    pub fn get(&self, vid: TyVid) -> Option<&IvarPossible> {
        self.entries.get(vid_index(vid))
    }

    /// `equate_type_unknown`: record `ty` as a possibility of `vid`, without
    /// asserting equality yet (used when a rule sees `?A` on one side of a
    /// coercion and a concrete type on the other).
    pub fn possible_equate_type_unknown(&mut self, vid: TyVid, ty: Type, op: Option<CoerceOp>) {
        let entry = self.ensure(vid);
        match op {
            None => entry.push_default(ty),
            Some(op) => entry.push_coerce_to(CoerceTy { op, ty }),
        }
    }

    /// Records that `vid` must satisfy `trait_path<trait_params>`.
    pub fn possible_equate_type_bounds(
        &mut self,
        vid: TyVid,
        trait_path: ItemPath,
        trait_params: PathParams,
        is_self: bool,
    ) {
        let entry = self.ensure(vid);
        entry.has_bounded = true;
        entry.bounds_include_self |= is_self;
        if !entry.bounded.iter().any(|(p, pp)| p == &trait_path && pp == &trait_params) {
            entry.bounded.push((trait_path, trait_params));
        }
    }

    /// Merges `b`'s possibilities into `a` (used when two ivars are equated
    /// directly); `b`'s entry is left in place but should no longer be
    /// consulted once the ivars are unioned in the `IvarStore`.
    pub fn possible_equate_ivar(&mut self, a: TyVid, b: TyVid) {
        let b_entry = self.entries.get(vid_index(b)).cloned().unwrap_or_default();
        let a_entry = self.ensure(a);
        a_entry.force_disable |= b_entry.force_disable;
        a_entry.force_no_to |= b_entry.force_no_to;
        a_entry.force_no_from |= b_entry.force_no_from;
        for ct in b_entry.types_coerce_to {
            a_entry.push_coerce_to(ct);
        }
        for ct in b_entry.types_coerce_from {
            a_entry.push_coerce_from(ct);
        }
        for ty in b_entry.types_default {
            a_entry.push_default(ty);
        }
        a_entry.has_bounded |= b_entry.has_bounded;
        a_entry.bounds_include_self |= b_entry.bounds_include_self;
        for bound in b_entry.bounded {
            if !a_entry.bounded.contains(&bound) {
                a_entry.bounded.push(bound);
            }
        }
    }

    pub fn possible_equate_ivar_bounds(&mut self, vid: TyVid, trait_path: ItemPath, trait_params: PathParams) {
        self.possible_equate_type_bounds(vid, trait_path, trait_params, true);
    }

    pub fn possible_equate_ivar_unknown(&mut self, vid: TyVid, ty: Type) {
        self.possible_equate_type_unknown(vid, ty, None);
    }

    pub fn mark_no_coerce_to(&mut self, vid: TyVid) {
        self.ensure(vid).force_no_to = true;
    }

    pub fn mark_no_coerce_from(&mut self, vid: TyVid) {
        self.ensure(vid).force_no_from = true;
    }

    pub fn mark_disabled(&mut self, vid: TyVid) {
        self.ensure(vid).force_disable = true;
    }

    /// Direct, non-fallback resolution (spec §4.6 steps 1 and 5): tried every
    /// pass, even before anything has stalled, because neither step relaxes a
    /// safeguard the way the fallback ladder does.
    ///
    /// - **Coincidence**: a type recorded as both a coerce-to and a
    ///   coerce-from possibility must be the answer — the ivar is being
    ///   coerced to the same type it's being coerced from.
    /// - **Single survivor**: if every recorded possibility (defaults,
    ///   coerce-to, coerce-from) agrees on one type, take it.
    pub fn resolve_direct(&self, vid: TyVid) -> Option<Type> {
        let entry = self.entries.get(vid_index(vid))?;
        if entry.force_disable {
            return None;
        }
        if let Some(ty) = coincidence(entry) {
            return Some(ty);
        }
        single_survivor(&entry.all_candidates())
    }

    /// Attempts to resolve `vid` to a single type using the fallback rules
    /// for `mode`, in the order defined by `FallbackMode::ORDER`. Returns
    /// `None` if this mode cannot decide (the driver should then try the
    /// next mode).
    pub fn resolve_with_fallback(&self, vid: TyVid, mode: FallbackMode) -> Option<Type> {
        let entry = self.entries.get(vid_index(vid))?;
        if entry.force_disable && mode != FallbackMode::FinalOption {
            return None;
        }
        match mode {
            // Respects `force_no_to`/`force_no_from`: an explicit "cannot
            // coerce to/from anything" constraint excludes that half of the
            // candidate set here, unlike `IgnoreWeakDisable` below.
            FallbackMode::Backwards => {
                let mut candidates = entry.types_default.clone();
                if !entry.force_no_to {
                    extend_unique(&mut candidates, entry.types_coerce_to.iter().map(|c| c.ty.clone()));
                }
                if !entry.force_no_from {
                    extend_unique(&mut candidates, entry.types_coerce_from.iter().map(|c| c.ty.clone()));
                }
                pointer_family_order(&candidates).or_else(|| single_survivor(&candidates))
            }
            // Picks the most-permissive pointer/borrow type among the
            // possibilities when they're all otherwise compatible, falling
            // back to a lone default type.
            FallbackMode::Assume => {
                let candidates = entry.all_candidates();
                pointer_family_order(&candidates).or_else(|| {
                    if entry.types_default.len() == 1 {
                        Some(entry.types_default[0].clone())
                    } else {
                        None
                    }
                })
            }
            // Same candidate set as `Backwards`, but `force_no_to`/
            // `force_no_from` are ignored entirely.
            FallbackMode::IgnoreWeakDisable => {
                let candidates = entry.all_candidates();
                pointer_family_order(&candidates).or_else(|| single_survivor(&candidates))
            }
            FallbackMode::PickFirstBound => {
                // Insertion order on `bounded` is load-bearing: the first
                // bound recorded is the one preferred when several equally
                // plausible impls exist.
                if entry.bounded.is_empty() {
                    None
                } else {
                    entry.types_default.first().cloned().or_else(|| entry.all_candidates().into_iter().next())
                }
            }
            FallbackMode::FinalOption => entry.all_candidates().into_iter().next(),
        }
    }
}

/// A type recorded on both the coerce-to and coerce-from side: the ivar is
/// simultaneously "coerced to X" and "coerced from X", so X is forced.
fn coincidence(entry: &IvarPossible) -> Option<Type> {
    entry
        .types_coerce_to
        .iter()
        .find(|to| entry.types_coerce_from.iter().any(|from| from.ty == to.ty))
        .map(|to| to.ty.clone())
}

fn extend_unique(out: &mut Vec<Type>, items: impl Iterator<Item = Type>) {
    for ty in items {
        if !out.contains(&ty) {
            out.push(ty);
        }
    }
}

fn single_survivor(candidates: &[Type]) -> Option<Type> {
    match candidates {
        [one] => Some(one.clone()),
        _ => None,
    }
}

/// Picks the single most-permissive pointer/borrow candidate by the fixed
/// partial order "Borrow > Pointer; Shared > Unique > Owned" (spec §4.6
/// "pointer-family ordering"): the weaker the mutability, the more sources it
/// can accept, so a `Shared` borrow beats a `Unique` one whenever both are
/// still live candidates. Only applies when every candidate is itself a
/// borrow or pointer; mixed candidate sets defer to single-survivor logic.
fn pointer_family_order(candidates: &[Type]) -> Option<Type> {
    if candidates.is_empty() {
        return None;
    }
    fn permissiveness(m: Mutability) -> u8 {
        match m {
            Mutability::Shared => 2,
            Mutability::Unique => 1,
            Mutability::Owned => 0,
        }
    }
    let score = |ty: &Type| -> Option<(u8, u8)> {
        match ty.kind() {
            TypeKind::Borrow { mutability, .. } => Some((1, permissiveness(*mutability))),
            TypeKind::Pointer { mutability, .. } => Some((0, permissiveness(*mutability))),
            _ => None,
        }
    };
    let mut best: Option<(Type, (u8, u8))> = None;
    for ty in candidates {
        let rank = score(ty)?;
        let replace = match &best {
            Some((_, best_rank)) => rank > *best_rank,
            None => true,
        };
        if replace {
            best = Some((ty.clone(), rank));
        }
    }
    best.map(|(ty, _)| ty)
}

fn vid_index(vid: TyVid) -> usize {
    vid.index() as usize
}
