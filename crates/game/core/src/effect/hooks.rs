//! Observer and resolver interfaces injected into the runtime.

use std::collections::HashMap;

use super::ResourceEffect;

/// Notifications fired after a realized change.
///
/// Every method has an empty default so observers implement only what they
/// need. Effects with `suppress_hooks` set skip `on_gain`, `on_loss` and
/// `on_value_change`.
pub trait ResourceObserver: Send + Sync {
    /// `previous` and `current` are the stored values around the change.
    /// Fires even when clamping leaves the value where it was.
    fn on_value_change(&self, resource_id: &str, previous: f64, current: f64) {
        let _ = (resource_id, previous, current);
    }

    /// `amount` is the positive realized gain.
    fn on_gain(&self, resource_id: &str, amount: f64) {
        let _ = (resource_id, amount);
    }

    /// `amount` is the positive magnitude of the realized loss.
    fn on_loss(&self, resource_id: &str, amount: f64) {
        let _ = (resource_id, amount);
    }

    fn on_upper_bound_increase(&self, resource_id: &str, amount: f64, new_bound: f64) {
        let _ = (resource_id, amount, new_bound);
    }
}

/// Maps tier enter/exit effect ids to effect lists.
pub trait TierEffectResolver: Send + Sync {
    fn resolve(&self, effect_id: &str) -> Option<Vec<ResourceEffect>>;
}

/// Resolver backed by a plain id → effects table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TierEffectTable {
    effects: HashMap<String, Vec<ResourceEffect>>,
}

impl TierEffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, effect_id: impl Into<String>, effects: Vec<ResourceEffect>) {
        self.effects.insert(effect_id.into(), effects);
    }

    pub fn with(mut self, effect_id: impl Into<String>, effects: Vec<ResourceEffect>) -> Self {
        self.insert(effect_id, effects);
        self
    }

    pub fn contains(&self, effect_id: &str) -> bool {
        self.effects.contains_key(effect_id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl From<HashMap<String, Vec<ResourceEffect>>> for TierEffectTable {
    fn from(effects: HashMap<String, Vec<ResourceEffect>>) -> Self {
        Self { effects }
    }
}

impl TierEffectResolver for TierEffectTable {
    fn resolve(&self, effect_id: &str) -> Option<Vec<ResourceEffect>> {
        self.effects.get(effect_id).cloned()
    }
}
