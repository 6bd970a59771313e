//! The apply/writeback pass (spec §5): walks the HIR one last time and
//! commits each node's fully-resolved type into its `res_ty`/pattern `ty`
//! slot, erroring if anything is still an unbound ivar. Grounded on
//! `examples/other_examples`' rustc_typeck `check/writeback.rs`
//! (`WritebackCx`), which performs the same "resolve everything, assert
//! nothing's left over" pass after its own constraint solver settles.

use crate::context::Context;
use crate::error::{TypeckError, TypeckResult};
use crate::hir::{ExprId, FunctionBody, PatId};
use crate::ty::Type;

pub fn writeback(cx: &mut Context, body: &mut FunctionBody) -> TypeckResult<()> {
    let expr_ids: Vec<ExprId> = body.exprs.iter().map(|(id, _)| id).collect();
    for id in expr_ids {
        let ty = body.exprs[id].res_ty.clone().expect("every node was assigned a type during enumeration");
        let resolved = resolve_completely(cx, &ty, &body.exprs[id].span)?;
        body.exprs[id].res_ty = Some(resolved);
    }

    let pat_ids: Vec<PatId> = body.pats.iter().map(|(id, _)| id).collect();
    for id in pat_ids {
        if let Some(ty) = body.pats[id].ty.clone() {
            let resolved = resolve_completely(cx, &ty, &body.pats[id].span)?;
            body.pats[id].ty = Some(resolved);
        }
    }

    Ok(())
}

/// Recursively resolves `ty` through the ivar store, falling back to the
/// default-integer/default-float type for any ivar whose class demands one
/// and erroring for anything still genuinely ambiguous.
fn resolve_completely(cx: &mut Context, ty: &Type, span: &crate::hir::Span) -> TypeckResult<Type> {
    let resolved = cx.ivars.get_deep(ty);
    if let Some((_, class)) = resolved.as_infer() {
        use crate::ty::{InferClass, PrimitiveKind, TypeKind};
        return match class {
            InferClass::Integer => Ok(Type::new(TypeKind::Primitive(PrimitiveKind::default_integer()))),
            InferClass::Float => Ok(Type::new(TypeKind::Primitive(PrimitiveKind::default_float()))),
            InferClass::None => Err(TypeckError::UnresolvedInference { span: *span }),
        };
    }
    use crate::ty::TypeKind::*;
    let rebuilt = match resolved.kind() {
        Array { inner, size } => Type::new(Array { inner: resolve_completely(cx, inner, span)?, size: size.clone() }),
        Slice { inner } => Type::new(Slice { inner: resolve_completely(cx, inner, span)? }),
        Tuple(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_completely(cx, item, span)?);
            }
            Type::new(Tuple(out))
        }
        Borrow { mutability, inner } => {
            Type::new(Borrow { mutability: *mutability, inner: resolve_completely(cx, inner, span)? })
        }
        Pointer { mutability, inner } => {
            Type::new(Pointer { mutability: *mutability, inner: resolve_completely(cx, inner, span)? })
        }
        Function { abi, is_unsafe, args, ret, hrls } => {
            let mut out_args = Vec::with_capacity(args.len());
            for a in args {
                out_args.push(resolve_completely(cx, a, span)?);
            }
            let ret = resolve_completely(cx, ret, span)?;
            Type::new(Function { abi: *abi, is_unsafe: *is_unsafe, args: out_args, ret, hrls: hrls.clone() })
        }
        Closure { node_id, args, ret } => {
            let mut out_args = Vec::with_capacity(args.len());
            for a in args {
                out_args.push(resolve_completely(cx, a, span)?);
            }
            let ret = resolve_completely(cx, ret, span)?;
            Type::new(Closure { node_id: *node_id, args: out_args, ret })
        }
        _ => resolved.clone(),
    };
    Ok(rebuilt)
}
