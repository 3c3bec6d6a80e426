//! Resource computation core for turn-based simulations.
//!
//! `resource-core` models numeric game resources and every rule that governs
//! them: bounds, computed group parents, tier tracks with enter/exit side
//! effects, and the add/remove/transfer/bound-increase effects that mutate
//! them. The crate is synchronous and performs no I/O; content loading and
//! presentation live in sibling crates.
//!
//! A session starts from a shared [`Blueprint`], builds one [`ResourceState`]
//! per owner, and routes every mutation through [`ResourceRuntime::apply`].
pub mod blueprint;
pub mod effect;
pub mod error;
pub mod state;
pub mod tier;

pub use blueprint::{
    Blueprint, BlueprintEntry, GlobalActionCost, GroupDefinition, GroupMembership,
    GroupParentDescriptor, ResourceBounds, ResourceDefinition, TierStepDefinition,
    TierTrackDefinition,
};
pub use effect::{
    AddEffect, ChangePayload, EffectContext, EvaluationModifiers, EvaluationTarget, OwnerSide,
    Owners, Reconciliation, RemoveEffect, ResourceEffect, ResourceGain, ResourceObserver,
    ResourceRuntime, Rounding, SessionContext, TierEffectResolver, TierEffectTable,
    TransferEffect, TransferEndpoint, UpperBoundIncreaseEffect,
};
pub use error::{CoreError, ErrorSeverity, ResourceError, ResourceResult};
pub use state::{ResourceSnapshot, ResourceState, ResourceValue, TierSnapshot, ValueSnapshot};
pub use tier::{TierProgress, TierState, TierStep, TierTransition};
