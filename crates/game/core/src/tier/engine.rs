//! Step resolution and transition side effects.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{TierStep, TierTransition};
use crate::blueprint::{TierStepDefinition, TierTrackDefinition};
use crate::effect::{EffectContext, ResourceRuntime};
use crate::error::{ResourceError, ResourceResult};
use crate::state::ResourceState;

/// A step change detected by [`resolve`].
struct StepChange {
    track_id: String,
    from: Option<String>,
    to: Option<String>,
}

/// Re-resolves the tier step of `resource_id` and runs transition effects.
///
/// Does nothing if the resource is unknown or has no tier track. When the
/// step changes and `side_effects` is supplied, the old step's exit effects
/// run first, then its passives are removed, then the new step's enter
/// effects run, each list in configured order. Without `side_effects` only
/// the bookkeeping is updated. When `record_transition` is set the tier is
/// marked touched and the transition is queued on `state`.
///
/// # Errors
///
/// [`ResourceError::OverlappingTierSteps`] if more than one step matches the
/// value, plus any error raised by the executed effects.
pub fn apply_tiering<C>(
    state: &mut ResourceState,
    resource_id: &str,
    side_effects: Option<(&ResourceRuntime, &mut C)>,
    record_transition: bool,
) -> ResourceResult<()>
where
    C: EffectContext + ?Sized,
{
    let Some(change) = resolve(state, resource_id)? else {
        return Ok(());
    };

    debug!(
        target: "resource_core::tier",
        resource = resource_id,
        track = %change.track_id,
        from = ?change.from,
        to = ?change.to,
        "tier step changed"
    );

    if let Some((runtime, context)) = side_effects {
        run_transition_effects(state, resource_id, &change, runtime, context)?;
    }

    if record_transition {
        if let Some(tier) = state.tier_mut(resource_id) {
            tier.touched = true;
        }
        state.push_tier_transition(TierTransition {
            resource_id: resource_id.to_string(),
            track_id: change.track_id,
            from_step_id: change.from,
            to_step_id: change.to,
        });
    }

    Ok(())
}

/// Places every tiered value on its track without recording transitions or
/// running effects. Used once when a state tree is created.
pub fn initialise(state: &mut ResourceState) -> ResourceResult<()> {
    let blueprint = Arc::clone(state.blueprint());
    for id in blueprint.ordered_ids() {
        apply_tiering::<dyn EffectContext>(state, id, None, false)?;
    }
    Ok(())
}

/// Updates the tier snapshot and reports a step change, if any.
fn resolve(state: &mut ResourceState, resource_id: &str) -> ResourceResult<Option<StepChange>> {
    let Ok(value) = state.get(resource_id) else {
        return Ok(None);
    };
    let Some(tier) = state.tier_mut(resource_id) else {
        return Ok(None);
    };

    let matched = match_step(&tier.steps, value).map_err(|steps| {
        ResourceError::OverlappingTierSteps {
            resource: resource_id.to_string(),
            track: tier.track_id.clone(),
            value,
            steps,
        }
    })?;

    let from = tier.current_step_id.clone();
    tier.place(matched, value);
    if tier.current_step_id == from {
        return Ok(None);
    }

    Ok(Some(StepChange {
        track_id: tier.track_id.clone(),
        from,
        to: tier.current_step_id.clone(),
    }))
}

/// Returns the index of the single step matching `value`, or the ids of every
/// matching step if more than one does.
fn match_step(steps: &[TierStep], value: f64) -> Result<Option<usize>, Vec<String>> {
    let mut matches = steps.iter().filter(|step| step.matches(value));
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    let rest: Vec<&TierStep> = matches.collect();
    if rest.is_empty() {
        return Ok(Some(first.index));
    }
    Err(std::iter::once(first)
        .chain(rest)
        .map(|step| step.id.clone())
        .collect())
}

fn run_transition_effects<C>(
    state: &mut ResourceState,
    resource_id: &str,
    change: &StepChange,
    runtime: &ResourceRuntime,
    context: &mut C,
) -> ResourceResult<()>
where
    C: EffectContext + ?Sized,
{
    let blueprint = Arc::clone(state.blueprint());
    let Some(track) = blueprint.entry(resource_id)?.tier() else {
        return Ok(());
    };
    let exiting = step_config(track, change.from.as_deref());
    let entering = step_config(track, change.to.as_deref());

    if let Some(step) = exiting {
        run_effect_ids(state, &step.exit, runtime, context)?;
        for passive in &step.passives {
            trace!(
                target: "resource_core::tier",
                resource = resource_id,
                passive = %passive,
                "removing step passive"
            );
            context.remove_passive(passive);
        }
    }
    if let Some(step) = entering {
        run_effect_ids(state, &step.enter, runtime, context)?;
    }
    Ok(())
}

fn step_config<'t>(
    track: &'t TierTrackDefinition,
    step_id: Option<&str>,
) -> Option<&'t TierStepDefinition> {
    let step_id = step_id?;
    track.steps.iter().find(|step| step.id == step_id)
}

fn run_effect_ids<C>(
    state: &mut ResourceState,
    effect_ids: &[String],
    runtime: &ResourceRuntime,
    context: &mut C,
) -> ResourceResult<()>
where
    C: EffectContext + ?Sized,
{
    let Some(resolver) = runtime.tier_resolver() else {
        return Ok(());
    };
    for effect_id in effect_ids {
        match resolver.resolve(effect_id) {
            Some(effects) => context.run_effects(runtime, &effects, state)?,
            None => trace!(
                target: "resource_core::tier",
                effect = %effect_id,
                "tier effect id resolved to nothing"
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, index: usize, min: f64, max: Option<f64>) -> TierStep {
        TierStep {
            id: id.to_string(),
            index,
            min,
            max,
            label: None,
        }
    }

    #[test]
    fn finds_single_match() {
        let steps = [step("a", 0, 0.0, Some(4.0)), step("b", 1, 5.0, None)];
        assert_eq!(match_step(&steps, 4.0), Ok(Some(0)));
        assert_eq!(match_step(&steps, 4.5), Ok(None));
        assert_eq!(match_step(&steps, 99.0), Ok(Some(1)));
        assert_eq!(match_step(&steps, -1.0), Ok(None));
    }

    #[test]
    fn reports_every_overlapping_step() {
        let steps = [
            step("a", 0, 0.0, Some(5.0)),
            step("b", 1, 5.0, None),
            step("c", 2, 3.0, Some(6.0)),
        ];
        assert_eq!(
            match_step(&steps, 5.0),
            Err(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }
}
