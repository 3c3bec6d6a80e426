//! Two-party transfer effect.

use tracing::{debug, trace};

use super::apply::{apply_resource_delta, ensure_mutable, evaluate};
use super::{
    ChangePayload, EffectContext, EvaluationTarget, OwnerSide, Owners, Reconciliation,
    ResourceRuntime,
};
use crate::error::ResourceResult;

/// One side of a transfer: an owner and a resource on that owner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferEndpoint {
    #[cfg_attr(feature = "serde", serde(default))]
    pub side: OwnerSide,
    pub resource_id: String,
}

impl TransferEndpoint {
    pub fn active(resource_id: impl Into<String>) -> Self {
        Self {
            side: OwnerSide::Active,
            resource_id: resource_id.into(),
        }
    }

    pub fn opponent(resource_id: impl Into<String>) -> Self {
        Self {
            side: OwnerSide::Opponent,
            resource_id: resource_id.into(),
        }
    }
}

/// Moves an amount from a donor resource to a recipient resource.
///
/// Both sides are bounded and both run their own evaluation stage. Percent
/// payloads are always taken of the donor's value. The donor is committed
/// first and the recipient receives at most what the donor actually lost.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferEffect {
    pub donor: TransferEndpoint,
    pub recipient: TransferEndpoint,
    pub payload: ChangePayload,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reconciliation: Reconciliation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub suppress_hooks: bool,
}

impl TransferEffect {
    pub fn new(donor: TransferEndpoint, recipient: TransferEndpoint, payload: ChangePayload) -> Self {
        Self {
            donor,
            recipient,
            payload,
            reconciliation: Reconciliation::Clamp,
            suppress_hooks: false,
        }
    }

    /// Skip observer notifications on both sides.
    pub fn suppress_hooks(mut self) -> Self {
        self.suppress_hooks = true;
        self
    }

    pub fn apply(
        &self,
        runtime: &ResourceRuntime,
        owners: &mut Owners<'_>,
        ctx: &mut dyn EffectContext,
        multiplier: f64,
    ) -> ResourceResult<()> {
        let Reconciliation::Clamp = self.reconciliation;
        let donor_id = self.donor.resource_id.as_str();
        let recipient_id = self.recipient.resource_id.as_str();

        let (donor_value, donor_bounds) = {
            let state = owners.side(self.donor.side, donor_id)?;
            ensure_mutable(state, donor_id)?;
            let value = state.get_state(donor_id)?;
            (value.value(), value.bounds())
        };
        let (recipient_value, recipient_bounds) = {
            let state = owners.side(self.recipient.side, recipient_id)?;
            ensure_mutable(state, recipient_id)?;
            let value = state.get_state(recipient_id)?;
            (value.value(), value.bounds())
        };

        let base = self.payload.resolve(donor_value, multiplier).max(0.0);
        let amount = evaluate(ctx, EvaluationTarget::TransferDonor(donor_id), base).max(0.0);
        if amount == 0.0 {
            trace!(target: "resource_core::effect", donor = donor_id, "transfer resolved to zero");
            return Ok(());
        }

        let headroom = donor_bounds.headroom(donor_value);
        if headroom == 0.0 {
            trace!(target: "resource_core::effect", donor = donor_id, "donor has no headroom");
            return Ok(());
        }

        let capacity = recipient_bounds.capacity(recipient_value);
        if capacity == 0.0 {
            trace!(
                target: "resource_core::effect",
                recipient = recipient_id,
                "recipient has no capacity"
            );
            return Ok(());
        }

        let bounded = amount.min(headroom);
        let adjusted = evaluate(ctx, EvaluationTarget::TransferRecipient(recipient_id), bounded);
        if adjusted <= 0.0 {
            trace!(
                target: "resource_core::effect",
                recipient = recipient_id,
                "recipient evaluation resolved to zero"
            );
            return Ok(());
        }

        let planned = bounded.min(adjusted).min(capacity);

        let donor_state = owners.side(self.donor.side, donor_id)?;
        let realized = apply_resource_delta(
            runtime,
            donor_state,
            donor_id,
            -planned,
            ctx,
            self.suppress_hooks,
        )?;
        let lost = (-realized).max(0.0);

        let recipient_state = owners.side(self.recipient.side, recipient_id)?;
        let live = recipient_state.get_state(recipient_id)?;
        let live_capacity = live.bounds().capacity(live.value());
        let gained = lost.min(live_capacity);
        if gained > 0.0 {
            apply_resource_delta(
                runtime,
                recipient_state,
                recipient_id,
                gained,
                ctx,
                self.suppress_hooks,
            )?;
        }

        debug!(
            target: "resource_core::effect",
            donor = donor_id,
            recipient = recipient_id,
            planned,
            lost,
            gained,
            "transfer committed"
        );
        Ok(())
    }
}
