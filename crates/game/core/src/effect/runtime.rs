//! Effect interpreter.

use core::fmt;
use std::sync::Arc;

use tracing::trace;

use super::{EffectContext, Owners, ResourceEffect, ResourceObserver, TierEffectResolver};
use crate::error::ResourceResult;

/// Interprets [`ResourceEffect`] values against owner state.
///
/// Carries the injected collaborators: an optional observer notified of
/// realized changes and an optional resolver for tier enter/exit effect ids.
/// Cloning is cheap; both collaborators are shared.
#[derive(Clone, Default)]
pub struct ResourceRuntime {
    observer: Option<Arc<dyn ResourceObserver>>,
    tier_resolver: Option<Arc<dyn TierEffectResolver>>,
}

impl ResourceRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResourceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_tier_resolver(mut self, resolver: Arc<dyn TierEffectResolver>) -> Self {
        self.tier_resolver = Some(resolver);
        self
    }

    pub fn observer(&self) -> Option<&dyn ResourceObserver> {
        self.observer.as_deref()
    }

    pub fn tier_resolver(&self) -> Option<&dyn TierEffectResolver> {
        self.tier_resolver.as_deref()
    }

    /// Applies one effect, scaled by `multiplier`.
    ///
    /// Single-owner effects act on the active owner. Transfers pick each
    /// endpoint's owner from `owners`.
    ///
    /// # Errors
    ///
    /// Unknown resources, direct writes to group parents, a missing opponent
    /// for an opponent-side endpoint, and overlapping tier steps hit while
    /// resyncing tiers.
    pub fn apply(
        &self,
        effect: &ResourceEffect,
        owners: &mut Owners<'_>,
        ctx: &mut dyn EffectContext,
        multiplier: f64,
    ) -> ResourceResult<()> {
        trace!(target: "resource_core::effect", ?effect, multiplier, "applying effect");
        match effect {
            ResourceEffect::Add(add) => add.apply(self, owners.active(), ctx, multiplier),
            ResourceEffect::Remove(remove) => remove.apply(self, owners.active(), ctx, multiplier),
            ResourceEffect::Transfer(transfer) => transfer.apply(self, owners, ctx, multiplier),
            ResourceEffect::IncreaseUpperBound(bound) => {
                bound.apply(self, owners.active(), ctx, multiplier)
            }
        }
    }

    /// Applies `effects` in order, stopping at the first error.
    pub fn apply_all(
        &self,
        effects: &[ResourceEffect],
        owners: &mut Owners<'_>,
        ctx: &mut dyn EffectContext,
        multiplier: f64,
    ) -> ResourceResult<()> {
        for effect in effects {
            self.apply(effect, owners, ctx, multiplier)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResourceRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRuntime")
            .field("observer", &self.observer.is_some())
            .field("tier_resolver", &self.tier_resolver.is_some())
            .finish()
    }
}
