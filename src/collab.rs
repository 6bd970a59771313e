//! Collaborator interfaces (spec §6): the parts of a real compiler the core
//! treats as an opaque service — trait-impl lookup, autoderef, method/field
//! search, lang items. Loading an impl database or building an autoderef
//! table is out of scope; only the call shape is defined here, the same way
//! `hir_ty` calls out to `db: &dyn HirDatabase` without owning the database.

use crate::symbol::Symbol;
use crate::ty::{ItemId, ItemPath, PathParams, Type};

/// The verdict `find_trait_impls` hands back for each candidate impl,
/// mirroring mrustc's three-way impl-match outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchVerdict {
    /// The impl applies exactly as written, no further unification needed
    /// beyond what the callback already performed.
    Equal,
    /// The impl could apply, but only after further inference (it mentions
    /// ivars on either side); callers degrade this to a `possible`.
    Fuzzy,
    /// The impl's shape rules it out entirely.
    Unequal,
}

/// One candidate trait impl: the type the trait is implemented for, the
/// trait's own parameters as written by the impl, and (if the rule asked for
/// one) the type of its associated item.
#[derive(Clone, Debug)]
pub struct ImplCandidate {
    pub impl_ty: Type,
    pub trait_params: PathParams,
    pub assoc_ty: Option<Type>,
    pub verdict: MatchVerdict,
    pub where_clauses: Vec<WhereClause>,
}

#[derive(Clone, Debug)]
pub struct WhereClause {
    pub trait_: ItemPath,
    pub self_ty: Type,
}

/// Either a concrete three-way compare result or "don't know yet".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compare {
    Yes,
    No,
    Unknown,
}

/// One step of autoderef: `ty` became `result` via an optional overloaded
/// `Deref`/`DerefMut` call (`via_trait = true`) or a builtin deref
/// (`&T`/`*T`, `via_trait = false`).
#[derive(Clone, Debug)]
pub struct DerefStep {
    pub result: Type,
    pub via_trait: bool,
}

/// How many `&`/autoref steps a method receiver needed, and whether it was
/// `&self`/`&mut self`/`self`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutorefKind {
    None,
    Ref,
    RefMut,
}

#[derive(Clone, Debug)]
pub struct MethodCandidate {
    pub path: ItemPath,
    pub autoref: AutorefKind,
    pub autoderef_count: u32,
    /// `true` if this candidate came from a trait impl rather than an
    /// inherent impl.
    pub from_trait: bool,
    /// The trait this candidate is defined in, if any; used to prefer the
    /// "current trait" during fallback de-duplication.
    pub trait_: Option<ItemId>,
}

/// The external trait-impl / autoderef / lang-item database. Implementors
/// own whatever index structures make these queries fast; the core only
/// ever calls through this trait.
pub trait CrateInfo {
    /// Search for impls of `trait_path<trait_params>` for `self_ty`,
    /// optionally projecting `assoc_name` (empty string asks only "does an
    /// impl exist").
    fn find_trait_impls(
        &self,
        trait_path: &ItemPath,
        trait_params: &PathParams,
        self_ty: &Type,
        assoc_name: Option<&str>,
    ) -> Vec<ImplCandidate>;

    /// One step of autoderef (`*ty`), or `None` if `ty` does not implement
    /// `Deref` and is not itself a builtin pointer/reference.
    fn autoderef(&self, ty: &Type) -> Option<DerefStep>;

    /// Search in-scope traits plus inherent impls for `method_name` on `ty`
    /// (after zero or more autoderef steps, and optionally one autoref).
    fn autoderef_find_method(
        &self,
        traits_in_scope: &[ItemId],
        ty: &Type,
        method_name: &str,
    ) -> Vec<MethodCandidate>;

    /// Look up a field named `name` directly on `ty` (no autoderef).
    fn find_field(&self, ty: &Type, name: &str) -> Option<Type>;

    /// Whether `ty` is known to satisfy (or fail) the language's implicit
    /// `Sized` bound.
    fn type_is_sized(&self, ty: &Type) -> Compare;

    /// Resolve a lang item (e.g. `"owned_box"`, `"add"`, `"index"`) to its
    /// item path, if the crate graph defines one.
    fn lang_item_path(&self, name: &str) -> Option<ItemPath>;
}

/// Current scope when typechecking one function body (spec §6: "current impl
/// generics, item generics, in-scope traits (stack), module path, enclosing
/// trait").
#[derive(Clone, Debug, Default)]
pub struct ModuleState {
    pub impl_generics: Vec<Symbol>,
    pub item_generics: Vec<Symbol>,
    pub traits_in_scope: Vec<ItemId>,
    pub module_path: Vec<Symbol>,
    pub enclosing_trait: Option<ItemPath>,
}
