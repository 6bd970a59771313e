//! The four rule kinds the enumerator emits and the driver drains to a
//! fixed point (spec §4.2–§4.3): coercions, associated-type projections,
//! per-node revisits, and the handful of "advanced" revisits that need a
//! tagged sum of their own because each carries unrelated payloads.

use crate::hir::{ExprId, Span};
use crate::symbol::Symbol;
use crate::ty::{ItemPath, PathParams, Type};

#[derive(Clone, Debug)]
pub struct CoercionRule {
    pub id: usize,
    pub dest: Type,
    pub src: Type,
    pub src_expr: ExprId,
}

#[derive(Clone, Debug)]
pub struct AssociatedRule {
    pub id: usize,
    pub span: Span,
    /// The output the associated-type projection is equated against.
    pub lhs: Type,
    pub trait_path: ItemPath,
    pub trait_params: PathParams,
    pub assoc_name: Option<Symbol>,
    pub self_ty: Type,
    /// Set for the trait used to desugar an operator (`BinOp`/`UniOp`
    /// `lang_item()`). The built-in arithmetic/bitwise semantics on numeric
    /// primitives are checked first for these (spec §4.5 step 1) so that an
    /// `i32 + i32` never has to round-trip through `find_trait_impls`.
    pub is_operator: bool,
}

#[derive(Clone, Debug)]
pub enum NodeRevisitKind {
    Cast { value: ExprId, target_ty: Type },
    Index { value: ExprId, index: ExprId, result: Type },
    Deref { value: ExprId, result: Type },
    CallValue { callee: ExprId, args: Vec<ExprId>, result: Type },
    CallMethod { receiver: ExprId, method: Symbol, args: Vec<ExprId>, result: Type },
    Field { value: ExprId, name: Symbol, result: Type },
}

#[derive(Clone, Debug)]
pub struct NodeRevisit {
    pub id: usize,
    pub expr: ExprId,
    pub kind: NodeRevisitKind,
}

/// Whether a revisit/fallback pass is running under direct unification or
/// has been escalated into the fallback ladder (spec §4.7: node revisits
/// and adv-revisits are re-tried with `is_fallback = true` between the
/// `IgnoreWeakDisable` and `PickFirstBound` rungs, unlocking behaviors like
/// "block diverges defaults to `()`" that must never fire on a first pass).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevisitMode {
    Direct,
    Fallback,
}

#[derive(Clone, Debug)]
pub enum AdvRevisitKind {
    /// `match &x { Some(v) => .. }`-style default binding-mode inference.
    MatchErgonomics { scrutinee: ExprId, ref_depth: u32 },
    /// A tuple pattern whose arity depends on an as-yet-unresolved type.
    SplitTuple { pat_ty: Type, arity: usize },
    /// A slice pattern with a `..` rest binding.
    SlicePat { pat_ty: Type, fixed_len: usize, has_rest: bool },
    /// A slice pattern whose rest portion itself needs re-splitting once the
    /// element type resolves.
    SplitSlicePat { pat_ty: Type, before: usize, after: usize },
    /// A block/statement whose type should default to `()` if nothing else
    /// constrains it (e.g. a `for` loop body).
    DefaultUnit { target: Type },
}

#[derive(Clone, Debug)]
pub struct AdvRevisit {
    pub id: usize,
    pub span: Span,
    pub kind: AdvRevisitKind,
}

/// Outcome a revisit/associated-rule handler reports back to the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule resolved completely and can be dropped from the queue.
    Done,
    /// Not enough is known yet; keep the rule for the next pass.
    Stalled,
}
