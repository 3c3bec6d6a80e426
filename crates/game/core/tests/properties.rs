//! Property-based tests for state invariants and effect arithmetic.
//!
//! Run with: cargo test -p resource-core --test properties

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;

use resource_core::{
    Blueprint, ChangePayload, GroupDefinition, GroupParentDescriptor, Owners, ResourceBounds,
    ResourceDefinition, ResourceEffect, ResourceRuntime, ResourceState, SessionContext,
    TierStepDefinition, TierTrackDefinition, TransferEndpoint,
};

const CHILDREN: [&str; 3] = ["fire", "water", "earth"];

/// Three bounded children summed into a capped parent, itself nested in an
/// outer group with an unbounded child.
fn nested_blueprint() -> Arc<Blueprint> {
    Blueprint::build(
        [
            ResourceDefinition::new("fire", 0)
                .with_bounds(ResourceBounds::between(0.0, 10.0))
                .in_group("elements", None),
            ResourceDefinition::new("water", 1)
                .with_bounds(ResourceBounds::between(-5.0, 15.0))
                .in_group("elements", None),
            ResourceDefinition::new("earth", 2)
                .with_bounds(ResourceBounds::at_least(0.0))
                .in_group("elements", None),
            ResourceDefinition::new("spirit", 3).in_group("world", None),
        ],
        [
            GroupDefinition::new(
                "elements",
                GroupParentDescriptor::new("essence", 0)
                    .with_bounds(ResourceBounds::between(0.0, 30.0))
                    .in_group("world", None),
            ),
            GroupDefinition::new("world", GroupParentDescriptor::new("totality", 1)),
        ],
    )
    .unwrap()
}

fn assert_parents_consistent(state: &ResourceState) -> Result<(), TestCaseError> {
    let children_sum: f64 = CHILDREN.iter().map(|id| state.get(id).unwrap()).sum();
    let essence = state.get_state("essence").unwrap();
    prop_assert_eq!(essence.value(), essence.bounds().clamp(children_sum));

    let world_sum = essence.value() + state.get("spirit").unwrap();
    prop_assert_eq!(state.get("totality").unwrap(), world_sum);
    Ok(())
}

fn assert_within_bounds(state: &ResourceState) -> Result<(), TestCaseError> {
    for value in state.iter() {
        let bounds = value.bounds();
        if let Some(lower) = bounds.lower {
            prop_assert!(value.value() >= lower, "{} below {}", value.id(), lower);
        }
        if let Some(upper) = bounds.upper {
            prop_assert!(value.value() <= upper, "{} above {}", value.id(), upper);
        }
    }
    Ok(())
}

fn mutation() -> impl Strategy<Value = (usize, f64, bool)> {
    (0..4usize, -50.0f64..50.0, any::<bool>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Parents always equal the clamped sum of their children, and every value
    /// stays inside its bounds, across arbitrary writes.
    #[test]
    fn prop_parents_and_bounds_hold(mutations in prop::collection::vec(mutation(), 1..40)) {
        let mut state = ResourceState::new(nested_blueprint()).unwrap();
        let ids = ["fire", "water", "earth", "spirit"];

        for (index, amount, absolute) in mutations {
            let id = ids[index];
            if absolute {
                state.set(id, amount, true).unwrap();
            } else {
                state.adjust(id, amount, true).unwrap();
            }
            assert_parents_consistent(&state)?;
            assert_within_bounds(&state)?;
        }
    }

    /// Raising the parent cap keeps the parent equal to the clamped sum.
    #[test]
    fn prop_parent_bound_increase_releases_sum(
        fire in 0.0f64..10.0,
        water in 0.0f64..15.0,
        earth in 0.0f64..40.0,
        increase in 0.0f64..30.0,
    ) {
        let mut state = ResourceState::create(
            nested_blueprint(),
            [("fire", fire), ("water", water), ("earth", earth)],
        )
        .unwrap();
        state.increase_upper_bound("essence", increase).unwrap();
        assert_parents_consistent(&state)?;
        assert_within_bounds(&state)?;
    }

    /// Clearing touches always leaves every flag unset, and repeating it is a
    /// no-op.
    #[test]
    fn prop_clear_touches_idempotent(mutations in prop::collection::vec(mutation(), 0..10)) {
        let mut state = ResourceState::new(nested_blueprint()).unwrap();
        let ids = ["fire", "water", "earth", "spirit"];
        for (index, amount, _) in mutations {
            state.set(ids[index], amount, true).unwrap();
        }

        state.clear_touches();
        prop_assert!(state.iter().all(|value| !value.touched()));
        state.clear_touches();
        prop_assert!(state.iter().all(|value| !value.touched()));
    }

    /// Adding then removing the same flat amount restores the value when no
    /// bound engages.
    #[test]
    fn prop_add_remove_round_trip(start in 0.0f64..1000.0, amount in 0.0f64..1000.0) {
        let blueprint = Blueprint::build(
            [ResourceDefinition::new("gold", 0).with_bounds(ResourceBounds::at_least(0.0))],
            Vec::new(),
        )
        .unwrap();
        let mut state = ResourceState::create(blueprint, [("gold", start)]).unwrap();
        let runtime = ResourceRuntime::new();
        let mut ctx = SessionContext::new();

        runtime
            .apply(
                &ResourceEffect::add("gold", ChangePayload::amount(amount)),
                &mut Owners::single(&mut state),
                &mut ctx,
                1.0,
            )
            .unwrap();
        runtime
            .apply(
                &ResourceEffect::remove("gold", ChangePayload::amount(amount)),
                &mut Owners::single(&mut state),
                &mut ctx,
                1.0,
            )
            .unwrap();

        prop_assert!((state.get("gold").unwrap() - start).abs() < 1e-9);
    }

    /// The recipient never gains more than the donor loses, and the two match
    /// exactly when neither side is bound-limited.
    #[test]
    fn prop_transfer_conserves(
        donor in 0.0f64..50.0,
        recipient in 0.0f64..50.0,
        donor_cap in 0.0f64..60.0,
        recipient_cap in 0.0f64..60.0,
        amount in 0.0f64..80.0,
    ) {
        let blueprint = Blueprint::build(
            [
                ResourceDefinition::new("donor", 0)
                    .with_bounds(ResourceBounds::between(0.0, donor_cap)),
                ResourceDefinition::new("recipient", 1)
                    .with_bounds(ResourceBounds::between(0.0, recipient_cap)),
            ],
            Vec::new(),
        )
        .unwrap();
        let mut active = ResourceState::create(Arc::clone(&blueprint), [("recipient", recipient)])
            .unwrap();
        let mut opponent = ResourceState::create(blueprint, [("donor", donor)]).unwrap();
        let donor_before = opponent.get("donor").unwrap();
        let recipient_before = active.get("recipient").unwrap();
        let mut ctx = SessionContext::new();

        ResourceRuntime::new()
            .apply(
                &ResourceEffect::transfer(
                    TransferEndpoint::opponent("donor"),
                    TransferEndpoint::active("recipient"),
                    ChangePayload::amount(amount),
                ),
                &mut Owners::pair(&mut active, &mut opponent),
                &mut ctx,
                1.0,
            )
            .unwrap();

        let lost = donor_before - opponent.get("donor").unwrap();
        let gained = active.get("recipient").unwrap() - recipient_before;
        prop_assert!(lost >= 0.0);
        prop_assert!(gained <= lost + 1e-9);

        let limited = amount > donor_before || amount > recipient_cap - recipient_before;
        if !limited {
            prop_assert!((gained - lost).abs() < 1e-9);
            prop_assert!((lost - amount).abs() < 1e-9);
        }
    }

    /// A track of adjacent, non-overlapping steps resolves every value to at
    /// most one step.
    #[test]
    fn prop_non_overlapping_track_is_deterministic(value in -10.0f64..100.0) {
        let track = TierTrackDefinition::new(
            "levels",
            vec![
                TierStepDefinition::new("low", 0.0, Some(9.0)),
                TierStepDefinition::new("mid", 10.0, Some(49.0)),
                TierStepDefinition::new("high", 50.0, None),
            ],
        );
        let blueprint =
            Blueprint::build([ResourceDefinition::new("xp", 0).with_tier(track)], Vec::new())
                .unwrap();

        let state = ResourceState::create(blueprint, [("xp", value)]).unwrap();
        let tier = state.get_state("xp").unwrap().tier().unwrap();
        let expected = match value {
            v if (0.0..=9.0).contains(&v) => Some("low"),
            v if (10.0..=49.0).contains(&v) => Some("mid"),
            v if v >= 50.0 => Some("high"),
            _ => None,
        };
        prop_assert_eq!(tier.current_step_id.as_deref(), expected);
    }
}
