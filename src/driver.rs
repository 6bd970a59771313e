//! The fixed-point driver (spec §4.7): repeatedly drain the rule queues
//! until a pass makes no further progress, then escalate through the
//! possibility-tracker fallback ladder — re-trying node revisits in fallback
//! mode partway through it — before giving up. Grounded on mrustc's
//! "iterate to fixpoint, then guess" description and given a hard iteration
//! cap (spec §7) so a buggy rule set fails loudly instead of spinning
//! forever.

use log::{debug, trace, warn};

use crate::adv_revisit::process_adv_revisit;
use crate::assoc::process_associated;
use crate::coerce::process_coercion;
use crate::context::Context;
use crate::error::{TypeckError, TypeckResult};
use crate::hir::FunctionBody;
use crate::possibility::FallbackMode;
use crate::rules::{RevisitMode, RuleOutcome};

const MAX_ITERATIONS: usize = 1000;

pub fn run(cx: &mut Context, body: &mut FunctionBody) -> TypeckResult<()> {
    let root = body.root;
    let mut enumerator = crate::enumerate::Enumerator::new(cx, body);
    enumerator.visit(root);

    if cx.has_errors() {
        return Err(cx.take_errors().into_iter().next().unwrap());
    }

    iterate_to_fixpoint(cx, body)?;

    if cx.pending_rule_count() > 0 {
        return Err(TypeckError::IterationCapExceeded { remaining_rules: cx.pending_rule_count() });
    }

    Ok(())
}

/// One full drain of the coercion/associated/revisit/adv-revisit queues.
/// Returns whether anything resolved.
fn run_rule_pass(cx: &mut Context, body: &mut FunctionBody, mode: RevisitMode) -> TypeckResult<bool> {
    let mut made_progress = false;

    let coercions = cx.drain_coercions();
    let mut stalled_coercions = Vec::with_capacity(coercions.len());
    for rule in coercions {
        match process_coercion(cx, body, &rule) {
            RuleOutcome::Done => made_progress = true,
            RuleOutcome::Stalled => stalled_coercions.push(rule),
        }
    }
    cx.requeue_coercions(stalled_coercions);

    let associated = cx.drain_associated();
    let mut stalled_associated = Vec::with_capacity(associated.len());
    for rule in associated {
        match process_associated(cx, &rule) {
            RuleOutcome::Done => made_progress = true,
            RuleOutcome::Stalled => stalled_associated.push(rule),
        }
    }
    cx.requeue_associated(stalled_associated);

    let revisits = cx.drain_revisits();
    let mut stalled_revisits = Vec::with_capacity(revisits.len());
    for revisit in revisits {
        match crate::revisit::process_revisit(cx, body, &revisit, mode) {
            RuleOutcome::Done => made_progress = true,
            RuleOutcome::Stalled => stalled_revisits.push(revisit),
        }
    }
    cx.requeue_revisits(stalled_revisits);

    let adv_revisits = cx.drain_adv_revisits();
    let mut stalled_adv = Vec::with_capacity(adv_revisits.len());
    for revisit in adv_revisits {
        let span = revisit.span;
        match process_adv_revisit(cx, body, span, &revisit, mode) {
            RuleOutcome::Done => made_progress = true,
            RuleOutcome::Stalled => stalled_adv.push(revisit),
        }
    }
    cx.requeue_adv_revisits(stalled_adv);

    made_progress |= cx.ivars.take_changed();

    if cx.has_errors() {
        return Err(cx.take_errors().into_iter().next().unwrap());
    }
    Ok(made_progress)
}

/// Tries the possibility tracker against every unresolved ivar, either in
/// direct mode (`mode = None`, spec §4.6 steps 1+5, never relaxes a
/// safeguard) or escalated into one rung of the fallback ladder.
fn try_possibility_pass(cx: &mut Context, mode: Option<FallbackMode>) -> bool {
    let mut resolved_any = false;
    let pending_vids = cx.unresolved_ivars();
    for vid in pending_vids {
        let resolved = match mode {
            None => cx.possible.resolve_direct(vid),
            Some(m) => cx.possible.resolve_with_fallback(vid, m),
        };
        if let Some(ty) = resolved {
            if cx.ivars.set(vid, ty).is_ok() {
                cx.ivars.mark_change();
                resolved_any = true;
            }
        }
    }
    resolved_any
}

/// Implements spec §4.7's pseudocode verbatim: drain rule queues; if that
/// made no progress, try the possibility tracker with `mode = None`, then
/// escalate through `Backwards -> Assume -> IgnoreWeakDisable`; if still
/// stuck, re-run node/adv revisits in fallback mode (unlocking behaviors
/// like "default block type to `()`"); then try `PickFirstBound ->
/// FinalOption`; then apply generic defaults (not modeled: this engine has
/// no type-param-default registry) and loop again. No progress anywhere in
/// a whole pass ends the loop early rather than spinning to the cap.
fn iterate_to_fixpoint(cx: &mut Context, body: &mut FunctionBody) -> TypeckResult<()> {
    for iteration in 0..MAX_ITERATIONS {
        let mut made_progress = run_rule_pass(cx, body, RevisitMode::Direct)?;

        if !made_progress {
            made_progress = try_possibility_pass(cx, None);
        }
        if !made_progress {
            made_progress = try_possibility_pass(cx, Some(FallbackMode::Backwards));
        }
        if !made_progress {
            made_progress = try_possibility_pass(cx, Some(FallbackMode::Assume));
        }
        if !made_progress {
            made_progress = try_possibility_pass(cx, Some(FallbackMode::IgnoreWeakDisable));
        }
        if !made_progress {
            warn!("typeck re-running revisits in fallback mode with {} rule(s) pending", cx.pending_rule_count());
            made_progress = run_rule_pass(cx, body, RevisitMode::Fallback)?;
        }
        if !made_progress {
            made_progress = try_possibility_pass(cx, Some(FallbackMode::PickFirstBound));
        }
        if !made_progress {
            made_progress = try_possibility_pass(cx, Some(FallbackMode::FinalOption));
        }

        trace!(
            "typeck pass {}: {} rule(s) pending, progress = {}",
            iteration,
            cx.pending_rule_count(),
            made_progress
        );

        if cx.has_errors() {
            return Err(cx.take_errors().into_iter().next().unwrap());
        }

        if cx.pending_rule_count() == 0 {
            debug!("typeck reached a fixed point after {} pass(es)", iteration + 1);
            return Ok(());
        }

        if !made_progress {
            debug!("typeck stalled after {} pass(es) with {} rule(s) left", iteration + 1, cx.pending_rule_count());
            return Ok(());
        }
    }

    Err(TypeckError::IterationCapExceeded { remaining_rules: cx.pending_rule_count() })
}
