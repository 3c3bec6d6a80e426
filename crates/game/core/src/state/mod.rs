//! Per-owner mutable resource state.
//!
//! A [`ResourceState`] is built once per owner from a shared
//! [`Blueprint`] and mutated by the effect handlers for the rest of the
//! session. It owns three responsibilities:
//!
//! 1. **Clamping**: every write is clamped into the value's bounds
//! 2. **Aggregation**: group parents always equal the clamped sum of their
//!    children and can never be written directly
//! 3. **Dirty tracking**: changed values and all their ancestors are marked
//!    touched until the caller clears them

mod snapshot;
mod value;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

pub use snapshot::{ResourceSnapshot, TierSnapshot, ValueSnapshot};
pub use value::ResourceValue;

use value::ValueLink;

use crate::blueprint::{Blueprint, BlueprintEntry};
use crate::error::{ResourceError, ResourceResult};
use crate::tier::{self, TierState, TierTransition};

/// Value tree of a single owner.
#[derive(Clone, Debug)]
pub struct ResourceState {
    blueprint: Arc<Blueprint>,
    values: HashMap<String, ResourceValue>,
    tier_transitions: Vec<TierTransition>,
}

impl ResourceState {
    /// Builds a state tree with every resource at its clamped default of 0.
    pub fn new(blueprint: Arc<Blueprint>) -> ResourceResult<Self> {
        Self::create(blueprint, std::iter::empty::<(String, f64)>())
    }

    /// Builds a state tree seeded from `initial_values`.
    ///
    /// Seeds are clamped into bounds; seeds for group parents or unknown ids
    /// are ignored. Parents are then computed bottom-up and every tiered value
    /// is placed on its track without recording a transition.
    ///
    /// # Errors
    ///
    /// [`ResourceError::OverlappingTierSteps`] if a seeded value matches more
    /// than one step.
    pub fn create<I, K>(blueprint: Arc<Blueprint>, initial_values: I) -> ResourceResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let seeds: HashMap<String, f64> = initial_values
            .into_iter()
            .map(|(id, value)| (id.into(), value))
            .collect();

        let mut values = HashMap::with_capacity(blueprint.len());
        for id in blueprint.ordered_ids() {
            let entry = blueprint.entry(id)?;
            let bounds = entry.bounds();
            let parent = blueprint.parent_of(id).map(str::to_string);
            let (value, link) = match entry {
                BlueprintEntry::Child(_) => {
                    let seed = seeds
                        .get(id)
                        .copied()
                        .filter(|seed| seed.is_finite())
                        .unwrap_or(0.0);
                    (bounds.clamp(seed), ValueLink::Child { parent })
                }
                BlueprintEntry::GroupParent { .. } => {
                    if seeds.contains_key(id) {
                        trace!(
                            target: "resource_core::state",
                            resource = %id,
                            "ignoring seed for limited parent"
                        );
                    }
                    let children = blueprint.children_of(id).to_vec();
                    (0.0, ValueLink::Limited { children, parent })
                }
            };
            values.insert(
                id.clone(),
                ResourceValue {
                    id: id.clone(),
                    value,
                    bounds,
                    touched: false,
                    tier: entry.tier().map(TierState::from_track),
                    link,
                },
            );
        }

        let mut state = Self {
            blueprint,
            values,
            tier_transitions: Vec::new(),
        };

        let blueprint = Arc::clone(&state.blueprint);
        for parent in blueprint.recompute_order() {
            state.recompute_parent(parent);
        }

        tier::initialise(&mut state)?;
        Ok(state)
    }

    pub fn blueprint(&self) -> &Arc<Blueprint> {
        &self.blueprint
    }

    /// Current value of `id`.
    pub fn get(&self, id: &str) -> ResourceResult<f64> {
        self.get_state(id).map(ResourceValue::value)
    }

    /// Full runtime record of `id`.
    pub fn get_state(&self, id: &str) -> ResourceResult<&ResourceValue> {
        self.values
            .get(id)
            .ok_or_else(|| ResourceError::UnknownResource(id.to_string()))
    }

    /// Writes `amount` into `id`, clamped to its bounds.
    ///
    /// When the stored value actually changes, the value (if `mark_touched`)
    /// and every ancestor parent are marked touched and the ancestors are
    /// recomputed. Non-finite amounts are ignored.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::UnknownResource`] if `id` is not in the blueprint
    /// - [`ResourceError::LimitedParentMutation`] if `id` is a group parent
    pub fn set(&mut self, id: &str, amount: f64, mark_touched: bool) -> ResourceResult<()> {
        let value = self
            .values
            .get_mut(id)
            .ok_or_else(|| ResourceError::UnknownResource(id.to_string()))?;
        if value.is_limited() {
            return Err(ResourceError::LimitedParentMutation(id.to_string()));
        }
        if !amount.is_finite() {
            trace!(
                target: "resource_core::state",
                resource = id,
                amount,
                "ignoring non-finite write"
            );
            return Ok(());
        }

        let clamped = value.bounds.clamp(amount);
        if clamped == value.value {
            return Ok(());
        }
        value.value = clamped;
        if mark_touched {
            value.touched = true;
        }

        self.recompute_ancestors(id, mark_touched);
        Ok(())
    }

    /// Adds `delta` to the current value of `id`; see [`Self::set`].
    pub fn adjust(&mut self, id: &str, delta: f64, mark_touched: bool) -> ResourceResult<()> {
        let current = self.get(id)?;
        self.set(id, current + delta, mark_touched)
    }

    /// Raises the upper bound of `id` by `amount` and returns the new bound.
    ///
    /// Returns `None` for values without an upper bound. The current value of
    /// a plain resource is untouched; a group parent is recomputed because the
    /// looser bound may release part of its child sum.
    pub fn increase_upper_bound(&mut self, id: &str, amount: f64) -> ResourceResult<Option<f64>> {
        let value = self
            .values
            .get_mut(id)
            .ok_or_else(|| ResourceError::UnknownResource(id.to_string()))?;
        let Some(upper) = value.bounds.upper else {
            return Ok(None);
        };
        let new_bound = upper + amount;
        value.bounds.upper = Some(new_bound);

        if value.is_limited() && self.recompute_parent(id) {
            if let Some(value) = self.values.get_mut(id) {
                value.touched = true;
            }
            self.recompute_ancestors(id, true);
        }
        Ok(Some(new_bound))
    }

    pub fn is_limited(&self, id: &str) -> bool {
        self.blueprint.is_limited(id)
    }

    /// Clears the touched flag of every value.
    pub fn clear_touches(&mut self) {
        for value in self.values.values_mut() {
            value.touched = false;
        }
    }

    /// Clears the touched flag of every tier.
    pub fn clear_tier_touches(&mut self) {
        for tier in self.values.values_mut().filter_map(|v| v.tier.as_mut()) {
            tier.touched = false;
        }
    }

    pub fn mark_untouched(&mut self, id: &str) -> ResourceResult<()> {
        let value = self
            .values
            .get_mut(id)
            .ok_or_else(|| ResourceError::UnknownResource(id.to_string()))?;
        value.touched = false;
        Ok(())
    }

    /// Transitions recorded since the last drain, oldest first.
    pub fn tier_transitions(&self) -> &[TierTransition] {
        &self.tier_transitions
    }

    /// Drains the recorded transitions.
    pub fn take_tier_transitions(&mut self) -> Vec<TierTransition> {
        std::mem::take(&mut self.tier_transitions)
    }

    /// Values in blueprint presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceValue> + '_ {
        self.blueprint
            .ordered_ids()
            .iter()
            .filter_map(|id| self.values.get(id))
    }

    pub(crate) fn tier_mut(&mut self, id: &str) -> Option<&mut TierState> {
        self.values.get_mut(id)?.tier.as_mut()
    }

    pub(crate) fn push_tier_transition(&mut self, transition: TierTransition) {
        self.tier_transitions.push(transition);
    }

    fn recompute_ancestors(&mut self, id: &str, mark_touched: bool) {
        let blueprint = Arc::clone(&self.blueprint);
        for parent in blueprint.ancestors(id) {
            self.recompute_parent(parent);
            if mark_touched && let Some(value) = self.values.get_mut(parent) {
                value.touched = true;
            }
        }
    }

    /// Sets a parent to the clamped sum of its children. Returns true if the
    /// stored value changed.
    fn recompute_parent(&mut self, parent: &str) -> bool {
        let sum: f64 = self
            .blueprint
            .children_of(parent)
            .iter()
            .filter_map(|child| self.values.get(child))
            .map(ResourceValue::value)
            .sum();
        let Some(value) = self.values.get_mut(parent) else {
            return false;
        };
        let clamped = value.bounds.clamp(sum);
        if clamped == value.value {
            return false;
        }
        value.value = clamped;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{
        GroupDefinition, GroupParentDescriptor, ResourceBounds, ResourceDefinition,
    };

    fn elements() -> Arc<Blueprint> {
        Blueprint::build(
            [
                ResourceDefinition::new("fire", 0)
                    .with_bounds(ResourceBounds::between(0.0, 10.0))
                    .in_group("elements", None),
                ResourceDefinition::new("water", 1)
                    .with_bounds(ResourceBounds::between(0.0, 15.0))
                    .in_group("elements", None),
                ResourceDefinition::new("gold", 2).with_bounds(ResourceBounds::at_least(0.0)),
            ],
            [GroupDefinition::new(
                "elements",
                GroupParentDescriptor::new("essence", 0),
            )],
        )
        .unwrap()
    }

    #[test]
    fn seeds_are_clamped_and_parents_computed() {
        let state =
            ResourceState::create(elements(), [("fire", 30.0), ("water", 7.0), ("gold", -4.0)])
                .unwrap();

        assert_eq!(state.get("fire").unwrap(), 10.0);
        assert_eq!(state.get("gold").unwrap(), 0.0);
        assert_eq!(state.get("essence").unwrap(), 17.0);
        assert!(state.iter().all(|value| !value.touched()));
    }

    #[test]
    fn parent_seeds_are_ignored() {
        let state = ResourceState::create(elements(), [("essence", 99.0), ("fire", 2.0)]).unwrap();
        assert_eq!(state.get("essence").unwrap(), 2.0);
    }

    #[test]
    fn unknown_resource_is_an_error() {
        let state = ResourceState::new(elements()).unwrap();
        assert_eq!(
            state.get("mana"),
            Err(ResourceError::UnknownResource("mana".into()))
        );
    }

    #[test]
    fn set_marks_value_and_parent_touched() {
        let mut state = ResourceState::new(elements()).unwrap();
        state.set("fire", 4.0, true).unwrap();

        assert!(state.get_state("fire").unwrap().touched());
        assert!(state.get_state("essence").unwrap().touched());
        assert!(!state.get_state("water").unwrap().touched());
    }

    #[test]
    fn set_without_change_leaves_flags_alone() {
        let mut state = ResourceState::create(elements(), [("fire", 10.0)]).unwrap();
        state.set("fire", 25.0, true).unwrap();

        assert!(!state.get_state("fire").unwrap().touched());
        assert!(!state.get_state("essence").unwrap().touched());
    }

    #[test]
    fn set_rejects_limited_parent() {
        let mut state = ResourceState::new(elements()).unwrap();
        let err = state.set("essence", 3.0, true).unwrap_err();
        assert_eq!(err, ResourceError::LimitedParentMutation("essence".into()));
    }

    #[test]
    fn non_finite_writes_are_ignored() {
        let mut state = ResourceState::create(elements(), [("gold", 5.0)]).unwrap();
        state.set("gold", f64::NAN, true).unwrap();
        state.adjust("gold", f64::INFINITY, true).unwrap();
        assert_eq!(state.get("gold").unwrap(), 5.0);
    }

    #[test]
    fn clearing_touches_is_idempotent() {
        let mut state = ResourceState::new(elements()).unwrap();
        state.adjust("water", 3.0, true).unwrap();
        state.clear_touches();
        state.clear_touches();
        assert!(state.iter().all(|value| !value.touched()));

        state.adjust("gold", 1.0, true).unwrap();
        state.mark_untouched("gold").unwrap();
        state.mark_untouched("gold").unwrap();
        assert!(!state.get_state("gold").unwrap().touched());
    }

    #[test]
    fn raising_parent_bound_releases_clamped_sum() {
        let blueprint = Blueprint::build(
            [
                ResourceDefinition::new("a", 0).in_group("g", None),
                ResourceDefinition::new("b", 1).in_group("g", None),
            ],
            [GroupDefinition::new(
                "g",
                GroupParentDescriptor::new("total", 0)
                    .with_bounds(ResourceBounds::between(0.0, 5.0)),
            )],
        )
        .unwrap();
        let mut state = ResourceState::create(blueprint, [("a", 4.0), ("b", 4.0)]).unwrap();
        assert_eq!(state.get("total").unwrap(), 5.0);

        let bound = state.increase_upper_bound("total", 2.0).unwrap();
        assert_eq!(bound, Some(7.0));
        assert_eq!(state.get("total").unwrap(), 7.0);
        assert!(state.get_state("total").unwrap().touched());
    }
}
