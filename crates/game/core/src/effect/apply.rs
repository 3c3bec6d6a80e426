//! Shared pipeline stages used by every handler.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{EffectContext, EvaluationTarget, ResourceGain, ResourceRuntime, finite_or_zero};
use crate::error::{ResourceError, ResourceResult};
use crate::state::ResourceState;
use crate::tier;

/// Runs the generic then the resource-specific modifier stage over `amount`
/// and returns the rescaled amount. Non-finite results normalise to 0.
pub(super) fn evaluate(
    ctx: &mut dyn EffectContext,
    target: EvaluationTarget<'_>,
    amount: f64,
) -> f64 {
    let resource_id = target.resource_id();
    let mut gains = vec![ResourceGain::new(resource_id, amount)];
    ctx.run_evaluation_mods(target.generic_key(), &mut gains);
    ctx.run_evaluation_mods(&target.specific_key(), &mut gains);

    let evaluated: f64 = gains
        .iter()
        .filter(|gain| gain.key == resource_id)
        .map(|gain| gain.amount)
        .sum();

    trace!(
        target: "resource_core::effect",
        evaluation_target = target.generic_key(),
        resource = resource_id,
        before = amount,
        after = evaluated,
        "evaluated amount"
    );
    finite_or_zero(evaluated)
}

/// Fails unless `id` exists and may be written directly.
pub(super) fn ensure_mutable(state: &ResourceState, id: &str) -> ResourceResult<()> {
    if state.get_state(id)?.is_limited() {
        return Err(ResourceError::LimitedParentMutation(id.to_string()));
    }
    Ok(())
}

/// Applies `delta` through the state store and runs the common tail:
/// recent-gains log, observer notifications, tier resync.
///
/// Returns the realized delta after clamping.
pub(super) fn apply_resource_delta(
    runtime: &ResourceRuntime,
    state: &mut ResourceState,
    resource_id: &str,
    delta: f64,
    ctx: &mut dyn EffectContext,
    suppress_hooks: bool,
) -> ResourceResult<f64> {
    let previous = state.get(resource_id)?;
    state.adjust(resource_id, delta, true)?;
    let current = state.get(resource_id)?;
    let realized = current - previous;

    ctx.recent_resource_gains()
        .push(ResourceGain::new(resource_id, realized));

    debug!(
        target: "resource_core::effect",
        resource = resource_id,
        requested = delta,
        realized,
        value = current,
        "applied resource delta"
    );

    if !suppress_hooks && let Some(observer) = runtime.observer() {
        if realized > 0.0 {
            observer.on_gain(resource_id, realized);
        } else if realized < 0.0 {
            observer.on_loss(resource_id, -realized);
        }
        observer.on_value_change(resource_id, previous, current);
    }

    resync_tiers(runtime, state, resource_id, ctx)?;
    Ok(realized)
}

/// Re-runs tiering for `resource_id` and then each of its ancestors.
pub(super) fn resync_tiers(
    runtime: &ResourceRuntime,
    state: &mut ResourceState,
    resource_id: &str,
    ctx: &mut dyn EffectContext,
) -> ResourceResult<()> {
    let blueprint = Arc::clone(state.blueprint());
    let chain = std::iter::once(resource_id).chain(blueprint.ancestors(resource_id));
    for id in chain {
        tier::apply_tiering(state, id, Some((runtime, &mut *ctx)), true)?;
    }
    Ok(())
}
