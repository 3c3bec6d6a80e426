//! Upper-bound increase effect.

use tracing::{debug, trace};

use super::apply::resync_tiers;
use super::{EffectContext, Reconciliation, ResourceRuntime, finite_or_zero};
use crate::error::ResourceResult;
use crate::state::ResourceState;

/// Raises the upper bound of a resource. Values with no upper bound are left
/// alone, and so are non-positive increases.
///
/// Group parents are accepted here: raising a parent's cap can release a
/// previously clamped sum.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpperBoundIncreaseEffect {
    pub resource_id: String,
    pub amount: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reconciliation: Reconciliation,
}

impl UpperBoundIncreaseEffect {
    pub fn new(resource_id: impl Into<String>, amount: f64) -> Self {
        Self {
            resource_id: resource_id.into(),
            amount,
            reconciliation: Reconciliation::Clamp,
        }
    }

    pub fn apply(
        &self,
        runtime: &ResourceRuntime,
        state: &mut ResourceState,
        ctx: &mut dyn EffectContext,
        multiplier: f64,
    ) -> ResourceResult<()> {
        let Reconciliation::Clamp = self.reconciliation;
        state.get_state(&self.resource_id)?;

        let increase = finite_or_zero(self.amount * multiplier);
        if increase <= 0.0 {
            trace!(
                target: "resource_core::effect",
                resource = %self.resource_id,
                "bound increase resolved to zero"
            );
            return Ok(());
        }

        let Some(new_bound) = state.increase_upper_bound(&self.resource_id, increase)? else {
            trace!(
                target: "resource_core::effect",
                resource = %self.resource_id,
                "resource has no upper bound"
            );
            return Ok(());
        };

        debug!(
            target: "resource_core::effect",
            resource = %self.resource_id,
            increase,
            new_bound,
            "raised upper bound"
        );

        if let Some(observer) = runtime.observer() {
            observer.on_upper_bound_increase(&self.resource_id, increase, new_bound);
        }

        resync_tiers(runtime, state, &self.resource_id, ctx)
    }
}
