//! Common error infrastructure for resource-core.
//!
//! Every failure this crate reports is a programming or content error:
//! misconfigured definitions, unknown ids, or mutation of computed values.
//! Numeric edge cases (NaN, zero, wrong sign) are never errors; the effect
//! handlers normalise them into no-ops instead.
//!
//! # Design Principles
//!
//! - **Fail Fast**: configuration errors surface at blueprint build or on the
//!   first tiering pass, never as a silent pick
//! - **Severity Classification**: errors are categorised so hosts can decide
//!   whether to abort the session or reject a single request
//! - **Stable Codes**: each variant has a static code usable in logs and tests

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: a request referenced something that does not exist or
///   asked for something the model forbids
/// - **Internal**: the host wired collaborators incorrectly
/// - **Fatal**: content configuration is broken; the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid request, should not retry without changes.
    ///
    /// Examples: unknown resource id, direct write to a limited parent
    Validation,

    /// Unexpected host wiring.
    ///
    /// Examples: transfer to the opponent side without an opponent state
    Internal,

    /// Broken configuration, cannot continue.
    ///
    /// Examples: unknown group reference, overlapping tier steps
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates a bug rather than a bad request.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all resource-core errors.
///
/// Provides a uniform interface for error classification across the crate.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by the blueprint builder, the state store, the tiering
/// engine and the effect handlers.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResourceError {
    /// A definition referenced a group that was never registered.
    #[error("unknown group \"{group}\" referenced by \"{resource}\"")]
    UnknownGroup { resource: String, group: String },

    /// A plain definition reused the id of a group parent.
    #[error("group parents are computed, cannot be defined directly: \"{0}\"")]
    GroupParentCollision(String),

    /// Two definitions (or two groups) share an id.
    #[error("duplicate definition \"{0}\"")]
    DuplicateDefinition(String),

    /// Nested group membership loops back onto itself.
    #[error("group \"{0}\" is nested inside itself")]
    GroupCycle(String),

    /// More than one tier step matched a value.
    #[error(
        "overlapping step matches for \"{resource}\" on track \"{track}\" at value {value}: {steps:?}"
    )]
    OverlappingTierSteps {
        resource: String,
        track: String,
        value: f64,
        steps: Vec<String>,
    },

    /// Lookup of an id the blueprint does not contain.
    #[error("unknown resource \"{0}\"")]
    UnknownResource(String),

    /// Direct write to a computed group parent.
    #[error("cannot directly mutate limited parent \"{0}\"")]
    LimitedParentMutation(String),

    /// Any reconciliation strategy other than clamp.
    #[error("only clamp reconciliation supported (got \"{0}\")")]
    UnsupportedReconciliation(String),

    /// A rounding mode other than up, down or nearest.
    #[error("unsupported rounding mode \"{0}\"")]
    UnsupportedRounding(String),

    /// An effect addressed the opponent side but only one owner was supplied.
    #[error("effect targets the opponent of \"{0}\" but no opponent state was supplied")]
    MissingCounterpart(String),
}

impl CoreError for ResourceError {
    fn severity(&self) -> ErrorSeverity {
        use ResourceError::*;
        match self {
            UnknownGroup { .. }
            | GroupParentCollision(_)
            | DuplicateDefinition(_)
            | GroupCycle(_)
            | OverlappingTierSteps { .. } => ErrorSeverity::Fatal,
            UnsupportedReconciliation(_) | UnsupportedRounding(_) => ErrorSeverity::Fatal,
            UnknownResource(_) | LimitedParentMutation(_) => ErrorSeverity::Validation,
            MissingCounterpart(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ResourceError::*;
        match self {
            UnknownGroup { .. } => "RESOURCE_UNKNOWN_GROUP",
            GroupParentCollision(_) => "RESOURCE_GROUP_PARENT_COLLISION",
            DuplicateDefinition(_) => "RESOURCE_DUPLICATE_DEFINITION",
            GroupCycle(_) => "RESOURCE_GROUP_CYCLE",
            OverlappingTierSteps { .. } => "RESOURCE_OVERLAPPING_TIER_STEPS",
            UnknownResource(_) => "RESOURCE_UNKNOWN",
            LimitedParentMutation(_) => "RESOURCE_LIMITED_PARENT",
            UnsupportedReconciliation(_) => "RESOURCE_UNSUPPORTED_RECONCILIATION",
            UnsupportedRounding(_) => "RESOURCE_UNSUPPORTED_ROUNDING",
            MissingCounterpart(_) => "RESOURCE_MISSING_COUNTERPART",
        }
    }
}

/// Result alias used throughout the crate.
pub type ResourceResult<T> = Result<T, ResourceError>;
