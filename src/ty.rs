//! The type and const-generic data model (spec §3).
//!
//! `Type` mirrors mrustc's `HIR::TypeRef` sum (see
//! `examples/original_source/src/hir_typeck/expr_cs.hpp`), generalized to a
//! plain Rust enum. There is no global interner: `Type` wraps its variant in
//! an `Arc` so clones stay cheap without needing a `db`/interner threaded
//! through every call, the same tradeoff the teacher's `TyKind::intern`
//! makes except without the session-scoped interning table.

use std::fmt;
use std::sync::Arc;

use crate::hir::ExprId;
use crate::ivar::{ConstVid, TyVid};
use crate::symbol::Symbol;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type(pub Arc<TypeKind>);

impl Type {
    pub fn new(kind: TypeKind) -> Type {
        Type(Arc::new(kind))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    pub fn unit() -> Type {
        Type::new(TypeKind::Tuple(Vec::new()))
    }

    pub fn diverge() -> Type {
        Type::new(TypeKind::Diverge)
    }

    pub fn bool_() -> Type {
        Type::new(TypeKind::Primitive(PrimitiveKind::Bool))
    }

    pub fn str_() -> Type {
        Type::new(TypeKind::Primitive(PrimitiveKind::Str))
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.kind(), TypeKind::Tuple(fields) if fields.is_empty())
    }

    pub fn is_diverge(&self) -> bool {
        matches!(self.kind(), TypeKind::Diverge)
    }

    pub fn as_infer(&self) -> Option<(TyVid, InferClass)> {
        match self.kind() {
            &TypeKind::Infer { index, class } => Some((index, class)),
            _ => None,
        }
    }

    pub fn is_infer(&self) -> bool {
        self.as_infer().is_some()
    }

    pub fn borrow_of(mutability: Mutability, inner: Type) -> Type {
        Type::new(TypeKind::Borrow { mutability, inner })
    }

    pub fn pointer_of(mutability: Mutability, inner: Type) -> Type {
        Type::new(TypeKind::Pointer { mutability, inner })
    }

    /// Strips any number of `&`/`&mut` wrappers, returning the innermost type
    /// and the number of layers removed.
    pub fn strip_references(&self) -> (&Type, usize) {
        let mut cur = self;
        let mut count = 0;
        loop {
            match cur.kind() {
                TypeKind::Borrow { inner, .. } => {
                    cur = inner;
                    count += 1;
                }
                _ => return (cur, count),
            }
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InferClass {
    None,
    Integer,
    Float,
}

/// Borrow/pointer strength. `Shared < Unique < Owned` for borrows;
/// raw pointers only ever use `Shared`/`Unique`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mutability {
    Shared,
    Unique,
    Owned,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Str,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
}

impl PrimitiveKind {
    pub fn is_integer(self) -> bool {
        use PrimitiveKind::*;
        matches!(self, I8 | I16 | I32 | I64 | I128 | Isize | U8 | U16 | U32 | U64 | U128 | Usize)
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }

    /// The type the language default-falls-back integer/float ivars to.
    pub fn default_integer() -> PrimitiveKind {
        PrimitiveKind::I32
    }

    pub fn default_float() -> PrimitiveKind {
        PrimitiveKind::F64
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Abi {
    Rust,
    C,
    System,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lifetime {
    Static,
    Erased,
    Named(u32),
}

/// An opaque handle to an item resolved by the (out-of-scope) name-resolution
/// pass; the core only ever compares these for equality and forwards them to
/// `CrateInfo` queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathBinding {
    Struct(ItemId),
    Enum(ItemId),
    Union(ItemId),
    TypeAlias(ItemId),
    Unbound,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PathParams {
    pub types: Vec<Type>,
    pub consts: Vec<ConstGeneric>,
}

impl PathParams {
    pub fn empty() -> PathParams {
        PathParams::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemPath {
    pub item: ItemId,
    pub name: Symbol,
    pub params: PathParams,
}

/// A single erased-`impl Trait` alias occurring in a signature; all
/// occurrences of the same alias within one typecheck must unify to the same
/// concrete type (tracked by `IvarStore::erased_type_aliases`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErasedAliasId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Infer { index: TyVid, class: InferClass },
    /// The never type `!`.
    Diverge,
    Primitive(PrimitiveKind),
    Path(ItemPath, PathBinding),
    Generic { name: Symbol, binding: u32 },
    TraitObject { trait_: ItemPath, markers: Vec<ItemPath>, lifetime: Lifetime },
    ErasedType(ErasedAliasId),
    Array { inner: Type, size: ConstGeneric },
    Slice { inner: Type },
    Tuple(Vec<Type>),
    Borrow { mutability: Mutability, inner: Type },
    Pointer { mutability: Mutability, inner: Type },
    NamedFunction { path: ItemPath },
    Function { abi: Abi, is_unsafe: bool, args: Vec<Type>, ret: Type, hrls: Vec<Symbol> },
    Closure { node_id: ExprId, args: Vec<Type>, ret: Type },
    Generator { node_id: ExprId },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstGeneric {
    Infer(ConstVid),
    Generic(Symbol),
    Evaluated(Vec<u8>),
    Unevaluated(ExprId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_empty_tuple() {
        assert!(Type::unit().is_unit());
        assert!(!Type::diverge().is_unit());
    }

    #[test]
    fn strip_references_counts_layers() {
        let inner = Type::new(TypeKind::Primitive(PrimitiveKind::U8));
        let once = Type::borrow_of(Mutability::Shared, inner.clone());
        let twice = Type::borrow_of(Mutability::Shared, once.clone());
        let (ty, n) = twice.strip_references();
        assert_eq!(n, 2);
        assert_eq!(ty, &inner);
    }

    #[test]
    fn mutability_order() {
        assert!(Mutability::Shared < Mutability::Unique);
        assert!(Mutability::Unique < Mutability::Owned);
    }
}
