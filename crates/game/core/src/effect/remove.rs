//! Remove effect: lowers a resource by a flat or percent amount.

use tracing::trace;

use super::apply::{apply_resource_delta, ensure_mutable, evaluate};
use super::{ChangePayload, EffectContext, EvaluationTarget, Reconciliation, ResourceRuntime};
use crate::error::ResourceResult;
use crate::state::ResourceState;

/// Removes from a resource. The payload names the size of the removal; the
/// evaluated delta is capped at 0, so a remove can never raise a value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoveEffect {
    pub resource_id: String,
    pub payload: ChangePayload,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reconciliation: Reconciliation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub suppress_hooks: bool,
}

impl RemoveEffect {
    pub fn new(resource_id: impl Into<String>, payload: ChangePayload) -> Self {
        Self {
            resource_id: resource_id.into(),
            payload,
            reconciliation: Reconciliation::Clamp,
            suppress_hooks: false,
        }
    }

    /// Skip observer notifications (gains log and tiering still run).
    pub fn suppress_hooks(mut self) -> Self {
        self.suppress_hooks = true;
        self
    }

    pub fn apply(
        &self,
        runtime: &ResourceRuntime,
        state: &mut ResourceState,
        ctx: &mut dyn EffectContext,
        multiplier: f64,
    ) -> ResourceResult<()> {
        let Reconciliation::Clamp = self.reconciliation;
        ensure_mutable(state, &self.resource_id)?;

        let current = state.get(&self.resource_id)?;
        let base = -self.payload.resolve(current, multiplier);
        let delta = evaluate(ctx, EvaluationTarget::Resource(&self.resource_id), base).min(0.0);
        if delta == 0.0 {
            trace!(
                target: "resource_core::effect",
                resource = %self.resource_id,
                "remove resolved to zero"
            );
            return Ok(());
        }

        apply_resource_delta(
            runtime,
            state,
            &self.resource_id,
            delta,
            ctx,
            self.suppress_hooks,
        )?;
        Ok(())
    }
}
