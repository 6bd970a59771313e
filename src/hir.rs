//! The in-crate HIR shape the core operates over (spec §3.1 expansion).
//!
//! Building this tree from source text is out of scope; it is defined here
//! only so the solver has something concrete to mutate, the way `hir_ty`
//! mutates the `Expr`/`Pat` arenas it gets from the (out-of-scope, to this
//! crate) `hir_def` crate. Nodes live in a caller-owned `la_arena::Arena` and
//! are addressed by index rather than by pointer, per the arena redesign
//! flag in spec §9.

use la_arena::{Arena, Idx};

use crate::symbol::Symbol;
use crate::ty::{ConstGeneric, ItemPath, Mutability, Type};

pub type ExprId = Idx<ExprNode>;
pub type PatId = Idx<Pattern>;

/// A minimal source location. Constructing real spans from source text is
/// out of scope; this is just a carrier so diagnostics can point somewhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub file: u32,
    pub start: u32,
    pub end: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingMode {
    Move,
    Ref(Mutability),
}

impl Default for BindingMode {
    fn default() -> Self {
        BindingMode::Move
    }
}

#[derive(Clone, Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
    /// Filled in by the enumerator (a fresh ivar) and overwritten by the
    /// applier with the fully-resolved type. `None` only before enumeration.
    pub res_ty: Option<Type>,
}

impl ExprNode {
    pub fn new(kind: ExprKind, span: Span) -> ExprNode {
        ExprNode { kind, span, res_ty: None }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn is_comparison(self) -> bool {
        use BinOp::*;
        matches!(self, Eq | Ne | Lt | Le | Gt | Ge)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinOp::Shl | BinOp::Shr)
    }

    /// The `ops::*` lang-item name backing an overloadable arithmetic/bitwise op.
    pub fn lang_item(self) -> Option<&'static str> {
        use BinOp::*;
        Some(match self {
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            Rem => "rem",
            BitAnd => "bitand",
            BitOr => "bitor",
            BitXor => "bitxor",
            Shl => "shl",
            Shr => "shr",
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UniOp {
    Not,
    Neg,
}

impl UniOp {
    pub fn lang_item(self) -> &'static str {
        match self {
            UniOp::Not => "not",
            UniOp::Neg => "neg",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Arm {
    pub pat: PatId,
    pub guard: Option<ExprId>,
    pub body: ExprId,
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: Symbol,
    pub value: ExprId,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Let { pat: PatId, declared_ty: Option<Type>, init: Option<ExprId> },
    Expr(ExprId),
}

#[derive(Clone, Debug)]
pub enum Literal {
    Bool(bool),
    Int(i128, Option<crate::ty::PrimitiveKind>),
    Float(Option<crate::ty::PrimitiveKind>),
    Str(Symbol),
    ByteStr(Vec<u8>),
    Char(char),
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Block { stmts: Vec<Stmt>, tail: Option<ExprId> },
    Let { pat: PatId, declared_ty: Option<Type>, init: ExprId },
    If { cond: ExprId, then_branch: ExprId, else_branch: Option<ExprId> },
    Match { scrutinee: ExprId, arms: Vec<Arm> },
    Loop { label: Option<Symbol>, body: ExprId },
    Break { label: Option<Symbol>, value: Option<ExprId> },
    Continue { label: Option<Symbol> },
    Return { value: Option<ExprId> },
    Yield { value: Option<ExprId> },
    BinOp { op: BinOp, lhs: ExprId, rhs: ExprId },
    UniOp { op: UniOp, value: ExprId },
    Borrow { mutability: Mutability, value: ExprId },
    RawBorrow { mutability: Mutability, value: ExprId },
    Cast { value: ExprId, target_ty: Type },
    Index { value: ExprId, index: ExprId },
    Deref { value: ExprId },
    Emplace { place: ExprId, value: ExprId },
    CallValue { callee: ExprId, args: Vec<ExprId> },
    CallMethod { receiver: ExprId, method: Symbol, generics: PathParamsSyntax, args: Vec<ExprId> },
    CallPath { path: ItemPath, args: Vec<ExprId> },
    Field { value: ExprId, name: Symbol },
    Closure { params: Vec<(PatId, Option<Type>)>, declared_ret: Option<Type>, body: ExprId },
    Literal(Literal),
    Tuple(Vec<ExprId>),
    ArrayList(Vec<ExprId>),
    ArraySized { value: ExprId, count: ConstGeneric },
    StructLiteral { path: ItemPath, fields: Vec<Field>, spread: Option<ExprId> },
    TupleVariant { path: ItemPath, fields: Vec<ExprId> },
    UnitVariant { path: ItemPath },
    PathExpr { path: ItemPath },
    /// Inserted by the coerce kernel: an explicit deref step.
    ImplicitDeref { value: ExprId },
    /// Inserted by the coerce kernel: an autoref/reborrow step.
    ImplicitBorrow { mutability: Mutability, value: ExprId },
    /// Inserted by the coerce kernel: a primitive/pointer-family cast.
    ImplicitCast { value: ExprId, target_ty: Type },
    /// Inserted by the coerce kernel: an unsizing coercion.
    ImplicitUnsize { value: ExprId, target_ty: Type },
}

/// The syntactic (possibly absent) turbofish on a method call; kept separate
/// from `PathParams` because it may be partially supplied.
#[derive(Clone, Debug, Default)]
pub struct PathParamsSyntax {
    pub types: Vec<Type>,
}

#[derive(Clone, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
    pub ty: Option<Type>,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Pattern {
        Pattern { kind, span, ty: None }
    }
}

#[derive(Clone, Debug)]
pub enum PatternKind {
    Wildcard,
    Binding { name: Symbol, mode: BindingMode, slot: u32, sub: Option<PatId> },
    Tuple(Vec<PatId>),
    TupleStruct { path: ItemPath, fields: Vec<PatId> },
    Struct { path: ItemPath, fields: Vec<(Symbol, PatId)> },
    Slice { before: Vec<PatId>, middle: Option<PatId>, after: Vec<PatId> },
    Reference { mutability: Mutability, inner: PatId },
    Literal(Literal),
    Path(ItemPath),
}

/// A whole function body: the caller-owned arenas plus the root expression.
pub struct FunctionBody {
    pub exprs: Arena<ExprNode>,
    pub pats: Arena<Pattern>,
    pub root: ExprId,
}

impl FunctionBody {
    pub fn new(exprs: Arena<ExprNode>, pats: Arena<Pattern>, root: ExprId) -> FunctionBody {
        FunctionBody { exprs, pats, root }
    }
}
