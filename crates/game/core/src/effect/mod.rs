//! Resource effects - declarative mutations applied to owner state.
//!
//! Every effect is a variant of the closed [`ResourceEffect`] sum type and is
//! interpreted by [`ResourceRuntime::apply`] through an exhaustive match.
//!
//! # Pipeline
//!
//! ```text
//! payload ─► base delta ─► evaluation modifiers ─► sign normalisation
//!                                                      │
//!         tiering ◄─ hooks ◄─ recent gains ◄─ clamped apply (state store)
//! ```
//!
//! Transfers run the pipeline twice, once per side, and always commit the
//! donor before the recipient so the recipient can never receive more than
//! the donor actually lost.

mod add;
mod apply;
mod bound;
mod context;
mod hooks;
mod remove;
mod runtime;
mod transfer;

use std::str::FromStr;

pub use add::AddEffect;
pub use bound::UpperBoundIncreaseEffect;
pub use context::{EffectContext, EvaluationModifiers, EvaluationTarget, ResourceGain, SessionContext};
pub use hooks::{ResourceObserver, TierEffectResolver, TierEffectTable};
pub use remove::RemoveEffect;
pub use runtime::ResourceRuntime;
pub use transfer::{TransferEffect, TransferEndpoint};

use crate::error::{ResourceError, ResourceResult};
use crate::state::ResourceState;

// ============================================================================
// Payloads
// ============================================================================

/// Rounding applied to percent payloads.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "&'static str")
)]
pub enum Rounding {
    Up,
    Down,
    /// Half away from zero.
    #[default]
    Nearest,
}

impl Rounding {
    pub fn parse(value: &str) -> ResourceResult<Self> {
        Self::from_str(value).map_err(|_| ResourceError::UnsupportedRounding(value.to_string()))
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Up => value.ceil(),
            Self::Down => value.floor(),
            Self::Nearest => value.round(),
        }
    }
}

impl TryFrom<String> for Rounding {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Strategy for resolving out-of-bounds values after a mutation.
///
/// Only clamping exists; any other strategy name is rejected when parsed.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "&'static str")
)]
pub enum Reconciliation {
    #[default]
    Clamp,
}

impl Reconciliation {
    pub fn parse(value: &str) -> ResourceResult<Self> {
        Self::from_str(value)
            .map_err(|_| ResourceError::UnsupportedReconciliation(value.to_string()))
    }
}

impl TryFrom<String> for Reconciliation {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Declarative size of a change.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangePayload {
    /// Flat amount.
    Amount { amount: f64 },
    /// Percentage of a reference value, rounded.
    Percent { percent: f64, rounding: Rounding },
}

impl ChangePayload {
    pub const fn amount(amount: f64) -> Self {
        Self::Amount { amount }
    }

    pub const fn percent(percent: f64, rounding: Rounding) -> Self {
        Self::Percent { percent, rounding }
    }

    /// Base delta for this payload, scaled by `multiplier`.
    ///
    /// Percent payloads are taken of `reference`. Non-finite results
    /// normalise to 0.
    pub fn resolve(&self, reference: f64, multiplier: f64) -> f64 {
        let raw = match *self {
            Self::Amount { amount } => amount * multiplier,
            Self::Percent { percent, rounding } => {
                rounding.apply(reference * (percent / 100.0) * multiplier)
            }
        };
        finite_or_zero(raw)
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

// ============================================================================
// Owners
// ============================================================================

/// Which owner an effect endpoint addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OwnerSide {
    /// The owner the effect is applied for.
    #[default]
    Active,
    /// The second owner of a two-party effect.
    Opponent,
}

/// The state trees an effect may touch: always the active owner, plus an
/// optional opponent for two-party effects.
pub struct Owners<'s> {
    active: &'s mut ResourceState,
    opponent: Option<&'s mut ResourceState>,
}

impl<'s> Owners<'s> {
    pub fn single(active: &'s mut ResourceState) -> Self {
        Self {
            active,
            opponent: None,
        }
    }

    pub fn pair(active: &'s mut ResourceState, opponent: &'s mut ResourceState) -> Self {
        Self {
            active,
            opponent: Some(opponent),
        }
    }

    pub fn active(&mut self) -> &mut ResourceState {
        &mut *self.active
    }

    /// State tree of `side`; `resource_id` only labels the error.
    pub fn side(&mut self, side: OwnerSide, resource_id: &str) -> ResourceResult<&mut ResourceState> {
        match side {
            OwnerSide::Active => Ok(&mut *self.active),
            OwnerSide::Opponent => self
                .opponent
                .as_deref_mut()
                .ok_or_else(|| ResourceError::MissingCounterpart(resource_id.to_string())),
        }
    }
}

// ============================================================================
// Effects
// ============================================================================

/// Every mutation this crate knows how to apply.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceEffect {
    Add(AddEffect),
    Remove(RemoveEffect),
    Transfer(TransferEffect),
    IncreaseUpperBound(UpperBoundIncreaseEffect),
}

impl ResourceEffect {
    pub fn add(resource_id: impl Into<String>, payload: ChangePayload) -> Self {
        Self::Add(AddEffect::new(resource_id, payload))
    }

    pub fn remove(resource_id: impl Into<String>, payload: ChangePayload) -> Self {
        Self::Remove(RemoveEffect::new(resource_id, payload))
    }

    pub fn transfer(
        donor: TransferEndpoint,
        recipient: TransferEndpoint,
        payload: ChangePayload,
    ) -> Self {
        Self::Transfer(TransferEffect::new(donor, recipient, payload))
    }

    pub fn increase_upper_bound(resource_id: impl Into<String>, amount: f64) -> Self {
        Self::IncreaseUpperBound(UpperBoundIncreaseEffect::new(resource_id, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rounds_half_away_from_zero() {
        assert_eq!(Rounding::Nearest.apply(2.5), 3.0);
        assert_eq!(Rounding::Nearest.apply(-2.5), -3.0);
        assert_eq!(Rounding::Up.apply(2.1), 3.0);
        assert_eq!(Rounding::Down.apply(2.9), 2.0);
    }

    #[test]
    fn percent_payload_scales_reference() {
        let payload = ChangePayload::percent(25.0, Rounding::Nearest);
        assert_eq!(payload.resolve(10.0, 1.0), 3.0);
        assert_eq!(payload.resolve(10.0, 2.0), 5.0);
        assert_eq!(ChangePayload::amount(4.0).resolve(100.0, 3.0), 12.0);
    }

    #[test]
    fn non_finite_payloads_resolve_to_zero() {
        assert_eq!(ChangePayload::amount(f64::NAN).resolve(0.0, 1.0), 0.0);
        assert_eq!(ChangePayload::amount(1.0).resolve(0.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn only_clamp_reconciliation_parses() {
        assert_eq!(Reconciliation::parse("clamp"), Ok(Reconciliation::Clamp));
        let err = Reconciliation::parse("overflow").unwrap_err();
        assert_eq!(err, ResourceError::UnsupportedReconciliation("overflow".into()));
        assert!(err.to_string().contains("only clamp reconciliation supported"));
    }

    #[test]
    fn rounding_parses_lowercase_names() {
        assert_eq!(Rounding::parse("up"), Ok(Rounding::Up));
        assert_eq!(Rounding::parse("nearest"), Ok(Rounding::Nearest));
        assert!(matches!(
            Rounding::parse("banker"),
            Err(ResourceError::UnsupportedRounding(_))
        ));
    }

    #[test]
    fn opponent_side_requires_second_owner() {
        let blueprint = crate::blueprint::Blueprint::build(
            [crate::blueprint::ResourceDefinition::new("gold", 0)],
            Vec::new(),
        )
        .unwrap();
        let mut state = ResourceState::new(blueprint).unwrap();
        let mut owners = Owners::single(&mut state);

        assert!(owners.side(OwnerSide::Active, "gold").is_ok());
        assert_eq!(
            owners.side(OwnerSide::Opponent, "gold").unwrap_err(),
            ResourceError::MissingCounterpart("gold".into())
        );
    }
}
