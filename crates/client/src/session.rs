//! Multi-owner session assembled from loaded content.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use resource_content::{ResourceCatalog, SessionSeeds};
use resource_core::{
    Blueprint, ChangePayload, Owners, ResourceEffect, ResourceGain, ResourceObserver,
    ResourceRuntime, ResourceSnapshot, ResourceState, SessionContext, TierTransition,
};
use serde::Serialize;

use crate::script::ScriptStep;

/// Observer that forwards every notification to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ResourceObserver for TracingObserver {
    fn on_value_change(&self, resource_id: &str, previous: f64, current: f64) {
        tracing::info!(resource = resource_id, previous, current, "value changed");
    }

    fn on_gain(&self, resource_id: &str, amount: f64) {
        tracing::debug!(resource = resource_id, amount, "gain");
    }

    fn on_loss(&self, resource_id: &str, amount: f64) {
        tracing::debug!(resource = resource_id, amount, "loss");
    }

    fn on_upper_bound_increase(&self, resource_id: &str, amount: f64, new_bound: f64) {
        tracing::info!(resource = resource_id, amount, new_bound, "upper bound raised");
    }
}

/// A tier transition tagged with the owner it happened to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OwnerTransition {
    pub owner: String,
    #[serde(flatten)]
    pub transition: TierTransition,
}

/// Final output of a simulation run.
#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub owners: BTreeMap<String, ResourceSnapshot>,
    pub transitions: Vec<OwnerTransition>,
    pub gains: Vec<ResourceGain>,
    pub removed_passives: Vec<String>,
}

/// Every owner's state plus the shared runtime and context.
pub struct Session {
    blueprint: Arc<Blueprint>,
    runtime: ResourceRuntime,
    context: SessionContext,
    owners: BTreeMap<String, ResourceState>,
    transitions: Vec<OwnerTransition>,
}

impl Session {
    /// Builds one state tree per seeded owner.
    pub fn new(catalog: &ResourceCatalog, seeds: &SessionSeeds) -> Result<Self> {
        let blueprint = catalog.blueprint()?;
        for missing in catalog.unresolved_tier_effects() {
            tracing::warn!(effect = %missing, "tier effect id has no entry in the catalog");
        }

        let runtime = ResourceRuntime::new()
            .with_observer(Arc::new(TracingObserver))
            .with_tier_resolver(Arc::new(catalog.tier_effects.clone()));

        let mut owners = BTreeMap::new();
        for name in seeds.owner_names() {
            let state = ResourceState::create(Arc::clone(&blueprint), seeds.owner(name))
                .with_context(|| format!("Failed to seed owner {name}"))?;
            owners.insert(name.to_string(), state);
        }

        tracing::info!(
            resources = blueprint.len(),
            owners = owners.len(),
            "session ready"
        );

        Ok(Self {
            blueprint,
            runtime,
            context: SessionContext::new(),
            owners,
            transitions: Vec::new(),
        })
    }

    /// Adds an owner at default values if it is not already present.
    pub fn ensure_owner(&mut self, name: &str) -> Result<()> {
        if !self.owners.contains_key(name) {
            let state = ResourceState::new(Arc::clone(&self.blueprint))?;
            self.owners.insert(name.to_string(), state);
        }
        Ok(())
    }

    pub fn owner(&self, name: &str) -> Option<&ResourceState> {
        self.owners.get(name)
    }

    /// Applies one script step. The opponent state is detached from the map
    /// for the duration of the call so both owners can be borrowed mutably.
    pub fn apply(&mut self, step: &ScriptStep) -> Result<()> {
        let result = match step.opponent.as_deref() {
            Some(name) if name == step.actor => {
                bail!("Owner {name} cannot be its own opponent")
            }
            Some(name) => {
                let mut opponent = self
                    .owners
                    .remove(name)
                    .with_context(|| format!("Unknown opponent {name}"))?;
                let outcome = self.run_step(step, Some(&mut opponent));
                self.owners.insert(name.to_string(), opponent);
                outcome
            }
            None => self.run_step(step, None),
        };
        self.drain_transitions();
        result
    }

    fn run_step(&mut self, step: &ScriptStep, opponent: Option<&mut ResourceState>) -> Result<()> {
        let actor = self
            .owners
            .get_mut(&step.actor)
            .with_context(|| format!("Unknown actor {}", step.actor))?;
        let mut owners = match opponent {
            Some(opponent) => Owners::pair(actor, opponent),
            None => Owners::single(actor),
        };

        if step.global_action
            && let Some(cost) = self.blueprint.primary_action_cost()
        {
            let charge =
                ResourceEffect::remove(cost.resource_id.clone(), ChangePayload::amount(cost.amount));
            self.runtime
                .apply(&charge, &mut owners, &mut self.context, 1.0)
                .with_context(|| format!("Failed to charge action cost to {}", step.actor))?;
        }

        tracing::debug!(actor = %step.actor, effect = ?step.effect, "applying script step");
        self.runtime
            .apply(&step.effect, &mut owners, &mut self.context, step.multiplier)
            .with_context(|| format!("Failed to apply effect for {}", step.actor))
    }

    fn drain_transitions(&mut self) {
        for (name, state) in &mut self.owners {
            for transition in state.take_tier_transitions() {
                tracing::info!(
                    owner = %name,
                    resource = %transition.resource_id,
                    from = ?transition.from_step_id,
                    to = ?transition.to_step_id,
                    "tier transition"
                );
                self.transitions.push(OwnerTransition {
                    owner: name.clone(),
                    transition,
                });
            }
            state.clear_tier_touches();
        }
    }

    /// Snapshots every owner and drains the logs collected so far.
    pub fn report(&mut self) -> SessionReport {
        let owners = self
            .owners
            .iter()
            .map(|(name, state)| (name.clone(), state.snapshot()))
            .collect();
        for state in self.owners.values_mut() {
            state.clear_touches();
        }

        SessionReport {
            owners,
            transitions: std::mem::take(&mut self.transitions),
            gains: self.context.take_recent_gains(),
            removed_passives: self.context.removed_passives().to_vec(),
        }
    }
}
