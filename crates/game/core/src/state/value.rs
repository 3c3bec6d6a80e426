//! A single runtime value inside an owner's state tree.

use crate::blueprint::ResourceBounds;
use crate::tier::TierState;

/// How a value relates to the group structure.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum ValueLink {
    /// Directly mutable; `parent` is set for grouped resources.
    Child { parent: Option<String> },
    /// Computed as the clamped sum of `children`; `parent` is set for
    /// nested groups.
    Limited {
        children: Vec<String>,
        parent: Option<String>,
    },
}

/// Current value, bounds and bookkeeping of one resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceValue {
    pub(crate) id: String,
    pub(crate) value: f64,
    pub(crate) bounds: ResourceBounds,
    pub(crate) touched: bool,
    pub(crate) tier: Option<TierState>,
    pub(crate) link: ValueLink,
}

impl ResourceValue {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bounds(&self) -> ResourceBounds {
        self.bounds
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn tier(&self) -> Option<&TierState> {
        self.tier.as_ref()
    }

    pub fn is_limited(&self) -> bool {
        matches!(self.link, ValueLink::Limited { .. })
    }

    pub fn parent(&self) -> Option<&str> {
        match &self.link {
            ValueLink::Child { parent } | ValueLink::Limited { parent, .. } => parent.as_deref(),
        }
    }

    /// Child ids of a limited value; empty for plain resources.
    pub fn children(&self) -> &[String] {
        match &self.link {
            ValueLink::Limited { children, .. } => children,
            ValueLink::Child { .. } => &[],
        }
    }
}
