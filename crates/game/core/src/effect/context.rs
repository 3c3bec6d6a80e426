//! Effect execution context and the evaluation-modifier registry.

use core::fmt;

use tracing::trace;

use super::{Owners, ResourceEffect, ResourceRuntime};
use crate::error::ResourceResult;
use crate::state::ResourceState;

/// One entry of a gains list: a resource id and a signed amount.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceGain {
    pub key: String,
    pub amount: f64,
}

impl ResourceGain {
    pub fn new(key: impl Into<String>, amount: f64) -> Self {
        Self {
            key: key.into(),
            amount,
        }
    }
}

/// Key under which evaluation modifiers are registered.
///
/// Each target has a generic key shared by every resource and a specific key
/// for one resource id. Handlers run the generic stage first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationTarget<'a> {
    /// Add and remove effects.
    Resource(&'a str),
    /// Donor side of a transfer.
    TransferDonor(&'a str),
    /// Recipient side of a transfer.
    TransferRecipient(&'a str),
}

impl EvaluationTarget<'_> {
    pub const RESOURCE: &'static str = "resource";
    pub const TRANSFER_DONOR: &'static str = "transfer:donor";
    pub const TRANSFER_RECIPIENT: &'static str = "transfer:recipient";

    pub fn generic_key(&self) -> &'static str {
        match self {
            Self::Resource(_) => Self::RESOURCE,
            Self::TransferDonor(_) => Self::TRANSFER_DONOR,
            Self::TransferRecipient(_) => Self::TRANSFER_RECIPIENT,
        }
    }

    pub fn resource_id(&self) -> &str {
        match self {
            Self::Resource(id) | Self::TransferDonor(id) | Self::TransferRecipient(id) => id,
        }
    }

    pub fn specific_key(&self) -> String {
        format!("{}:{}", self.generic_key(), self.resource_id())
    }
}

/// Host services the effect handlers depend on.
///
/// The passive system sits behind `run_evaluation_mods` and `remove_passive`;
/// tier enter/exit lists are executed through `run_effects`.
pub trait EffectContext {
    /// Runs every modifier registered for `target`, in registration order.
    /// Modifiers rescale `gains` in place.
    fn run_evaluation_mods(&mut self, target: &str, gains: &mut Vec<ResourceGain>);

    /// Removes a passive granted by a tier step the owner just left.
    fn remove_passive(&mut self, passive_id: &str);

    /// Executes a resolved tier effect list against `state`, in order.
    fn run_effects(
        &mut self,
        runtime: &ResourceRuntime,
        effects: &[ResourceEffect],
        state: &mut ResourceState,
    ) -> ResourceResult<()>;

    /// Append-only log of realized deltas.
    fn recent_resource_gains(&mut self) -> &mut Vec<ResourceGain>;
}

type ModifierFn = Box<dyn Fn(&mut Vec<ResourceGain>) + Send + Sync>;

struct RegisteredModifier {
    id: String,
    target: String,
    apply: ModifierFn,
}

/// Evaluation modifiers keyed by target string.
///
/// A modifier is identified by an id so the passive that registered it can
/// remove it again.
#[derive(Default)]
pub struct EvaluationModifiers {
    modifiers: Vec<RegisteredModifier>,
}

impl EvaluationModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, id: impl Into<String>, target: impl Into<String>, apply: F)
    where
        F: Fn(&mut Vec<ResourceGain>) + Send + Sync + 'static,
    {
        self.modifiers.push(RegisteredModifier {
            id: id.into(),
            target: target.into(),
            apply: Box::new(apply),
        });
    }

    /// Removes every modifier registered under `id`. Returns true if any was
    /// removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|modifier| modifier.id != id);
        self.modifiers.len() != before
    }

    pub fn run(&self, target: &str, gains: &mut Vec<ResourceGain>) {
        for modifier in self.modifiers.iter().filter(|m| m.target == target) {
            trace!(
                target: "resource_core::effect",
                modifier = %modifier.id,
                evaluation_target = target,
                "running evaluation modifier"
            );
            (modifier.apply)(gains);
        }
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl fmt::Debug for EvaluationModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.modifiers
                    .iter()
                    .map(|modifier| (&modifier.id, &modifier.target)),
            )
            .finish()
    }
}

/// Ready-made [`EffectContext`] for one turn of play.
///
/// Owns the evaluation modifiers, the recent-gains log and a log of removed
/// passives. Tier effect lists run against the owner whose tier changed.
#[derive(Debug, Default)]
pub struct SessionContext {
    modifiers: EvaluationModifiers,
    recent_gains: Vec<ResourceGain>,
    removed_passives: Vec<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modifiers(modifiers: EvaluationModifiers) -> Self {
        Self {
            modifiers,
            ..Self::default()
        }
    }

    pub fn modifiers(&self) -> &EvaluationModifiers {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut EvaluationModifiers {
        &mut self.modifiers
    }

    pub fn recent_gains(&self) -> &[ResourceGain] {
        &self.recent_gains
    }

    pub fn take_recent_gains(&mut self) -> Vec<ResourceGain> {
        std::mem::take(&mut self.recent_gains)
    }

    pub fn removed_passives(&self) -> &[String] {
        &self.removed_passives
    }
}

impl EffectContext for SessionContext {
    fn run_evaluation_mods(&mut self, target: &str, gains: &mut Vec<ResourceGain>) {
        self.modifiers.run(target, gains);
    }

    fn remove_passive(&mut self, passive_id: &str) {
        self.modifiers.remove(passive_id);
        self.removed_passives.push(passive_id.to_string());
    }

    fn run_effects(
        &mut self,
        runtime: &ResourceRuntime,
        effects: &[ResourceEffect],
        state: &mut ResourceState,
    ) -> ResourceResult<()> {
        for effect in effects {
            runtime.apply(effect, &mut Owners::single(state), self, 1.0)?;
        }
        Ok(())
    }

    fn recent_resource_gains(&mut self) -> &mut Vec<ResourceGain> {
        &mut self.recent_gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_keys() {
        let target = EvaluationTarget::TransferDonor("gold");
        assert_eq!(target.generic_key(), "transfer:donor");
        assert_eq!(target.specific_key(), "transfer:donor:gold");
        assert_eq!(
            EvaluationTarget::Resource("happiness").specific_key(),
            "resource:happiness"
        );
    }

    #[test]
    fn modifiers_run_in_registration_order_for_their_target() {
        let mut modifiers = EvaluationModifiers::new();
        modifiers.register("double", "resource", |gains| {
            gains.iter_mut().for_each(|gain| gain.amount *= 2.0);
        });
        modifiers.register("plus-one", "resource", |gains| {
            gains.iter_mut().for_each(|gain| gain.amount += 1.0);
        });
        modifiers.register("ignored", "transfer:donor", |gains| gains.clear());

        let mut gains = vec![ResourceGain::new("gold", 3.0)];
        modifiers.run("resource", &mut gains);
        assert_eq!(gains, vec![ResourceGain::new("gold", 7.0)]);
    }

    #[test]
    fn removing_a_passive_drops_its_modifiers() {
        let mut context = SessionContext::new();
        context
            .modifiers_mut()
            .register("blessing", "resource:gold", |gains| gains.clear());
        context.remove_passive("blessing");

        assert!(context.modifiers().is_empty());
        assert_eq!(context.removed_passives(), ["blessing"]);
    }
}
