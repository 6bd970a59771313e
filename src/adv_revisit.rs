//! The "advanced" revisit kinds (spec §4.8): pattern-shape decisions that
//! can't be made until a scrutinee/pattern type resolves. Grounded on
//! mrustc's pattern-handling revisit classes in `expr_cs__enum.cpp` and the
//! `BindingMode` shape `hir_ty::infer.rs` uses for match ergonomics.

use crate::context::Context;
use crate::error::TypeckError;
use crate::hir::{FunctionBody, Span};
use crate::rules::{AdvRevisit, AdvRevisitKind, RevisitMode, RuleOutcome};
use crate::ty::{ConstGeneric, Type, TypeKind};

pub fn process_adv_revisit(cx: &mut Context, body: &FunctionBody, span: Span, revisit: &AdvRevisit, mode: RevisitMode) -> RuleOutcome {
    match &revisit.kind {
        AdvRevisitKind::MatchErgonomics { scrutinee, ref_depth } => match_ergonomics(cx, body, span, *scrutinee, *ref_depth),
        AdvRevisitKind::SplitTuple { pat_ty, arity } => split_tuple(cx, span, pat_ty, *arity),
        AdvRevisitKind::SlicePat { pat_ty, fixed_len, has_rest } => {
            slice_pat(cx, span, pat_ty, *fixed_len, *has_rest)
        }
        AdvRevisitKind::SplitSlicePat { pat_ty, before, after } => {
            split_slice_pat(cx, span, pat_ty, *before, *after)
        }
        AdvRevisitKind::DefaultUnit { target } => default_unit(cx, target, mode),
    }
}

/// Walks the scrutinee's wrapping `&`/`&mut` layers, tallying them into an
/// implicit-deref count the same way autoderef would (spec §4.8): a pattern
/// that explicitly borrowed (`&&x`, `ref_depth` layers of its own) can never
/// consume more reference layers than the scrutinee's resolved type actually
/// has on offer.
fn match_ergonomics(cx: &mut Context, body: &FunctionBody, span: Span, scrutinee: crate::hir::ExprId, ref_depth: u32) -> RuleOutcome {
    let scrutinee_ty = body.exprs[scrutinee].res_ty.clone().expect("scrutinee enumerated before its match arms");
    let scrutinee_ty = cx.ivars.get_deep(&scrutinee_ty);
    if scrutinee_ty.is_infer() {
        return RuleOutcome::Stalled;
    }
    let (_, available_depth) = scrutinee_ty.strip_references();
    if (available_depth as u32) < ref_depth {
        cx.push_error(TypeckError::TypeMismatch { span, expected: scrutinee_ty.clone(), found: scrutinee_ty });
    }
    RuleOutcome::Done
}

fn split_tuple(cx: &mut Context, span: Span, pat_ty: &Type, arity: usize) -> RuleOutcome {
    let resolved = cx.ivars.get_deep(pat_ty);
    if resolved.is_infer() {
        return RuleOutcome::Stalled;
    }
    match resolved.kind() {
        TypeKind::Tuple(fields) if fields.len() == arity => RuleOutcome::Done,
        TypeKind::Tuple(fields) => {
            cx.push_error(TypeckError::ArityMismatch { span, expected: fields.len(), found: arity });
            RuleOutcome::Done
        }
        _ => {
            cx.push_error(TypeckError::TypeMismatch {
                span,
                expected: Type::new(TypeKind::Tuple(Vec::new())),
                found: resolved,
            });
            RuleOutcome::Done
        }
    }
}

/// Decodes an `Array` size's evaluated const (spec §3: `ConstGeneric::Evaluated`
/// stores the const's value, little-endian, not the byte length of the
/// encoding — `enumerate.rs` always writes a `u64`, so this is always an
/// 8-byte buffer whose *decoded value* is the element count).
fn array_len(bytes: &[u8]) -> Option<usize> {
    let array: [u8; 8] = bytes.try_into().ok()?;
    usize::try_from(u64::from_le_bytes(array)).ok()
}

fn slice_pat(cx: &mut Context, span: Span, pat_ty: &Type, fixed_len: usize, has_rest: bool) -> RuleOutcome {
    let resolved = cx.ivars.get_deep(pat_ty);
    if resolved.is_infer() {
        return RuleOutcome::Stalled;
    }
    match resolved.kind() {
        TypeKind::Array { size: ConstGeneric::Evaluated(bytes), .. } => {
            let Some(len) = array_len(bytes) else {
                cx.push_error(TypeckError::Internal("malformed array length const".to_string()));
                return RuleOutcome::Done;
            };
            if has_rest {
                if len < fixed_len {
                    cx.push_error(TypeckError::ArityMismatch { span, expected: fixed_len, found: len });
                }
            } else if len != fixed_len {
                cx.push_error(TypeckError::ArityMismatch { span, expected: fixed_len, found: len });
            }
            RuleOutcome::Done
        }
        TypeKind::Slice { .. } => RuleOutcome::Done,
        _ => RuleOutcome::Done,
    }
}

/// Re-splits a slice pattern's rest binding once the element type (and, for
/// arrays, the overall length) resolves: `before` bindings consume the first
/// `before` elements, `after` bindings consume the last `after`, and
/// whatever's left in between is the `..` rest. The only thing left to
/// validate here once the scrutinee is concrete is that an array has room
/// for both ends; a slice's length is checked at runtime, not here.
fn split_slice_pat(cx: &mut Context, span: Span, pat_ty: &Type, before: usize, after: usize) -> RuleOutcome {
    let resolved = cx.ivars.get_deep(pat_ty);
    if resolved.is_infer() {
        return RuleOutcome::Stalled;
    }
    if let TypeKind::Array { size: ConstGeneric::Evaluated(bytes), .. } = resolved.kind() {
        if let Some(len) = array_len(bytes) {
            if before + after > len {
                cx.push_error(TypeckError::ArityMismatch { span, expected: before + after, found: len });
            }
        }
    }
    RuleOutcome::Done
}

/// Defaults a still-unresolved ivar to `()` (spec §4.3 "Block diverges ...
/// defaults to unit only in fallback mode"): on a direct pass this stays
/// pending so a later constraint gets the chance to pin it to something more
/// specific; only once the driver has escalated into the fallback ladder is
/// defaulting-to-unit allowed to fire.
fn default_unit(cx: &mut Context, target: &Type, mode: RevisitMode) -> RuleOutcome {
    let resolved = cx.ivars.get_deep(target);
    let Some((vid, _)) = resolved.as_infer() else {
        return RuleOutcome::Done;
    };
    if mode != RevisitMode::Fallback {
        return RuleOutcome::Stalled;
    }
    let _ = cx.ivars.set(vid, Type::unit());
    RuleOutcome::Done
}
