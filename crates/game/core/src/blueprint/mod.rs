//! Immutable structural metadata shared by every owner's resource state.
//!
//! A [`Blueprint`] is built once per game configuration from resource and
//! group definitions. It records presentation order, the parent/child maps of
//! grouped resources, and the global-action-cost pointers. It is never
//! mutated after construction and is shared behind an [`Arc`].
//!
//! ```text
//! definitions ──► Blueprint::build ──► Arc<Blueprint> ──► ResourceState (per owner)
//! ```

mod builder;
pub mod definition;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub use definition::{
    GroupDefinition, GroupMembership, GroupParentDescriptor, ResourceBounds, ResourceDefinition,
    TierStepDefinition, TierTrackDefinition,
};

use crate::error::{ResourceError, ResourceResult};

/// One id in the blueprint: either a plain resource or a computed group parent.
#[derive(Clone, Debug, PartialEq)]
pub enum BlueprintEntry {
    /// Directly mutable resource.
    Child(ResourceDefinition),
    /// Computed parent of the named group.
    GroupParent {
        group: String,
        parent: GroupParentDescriptor,
    },
}

impl BlueprintEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Child(def) => &def.id,
            Self::GroupParent { parent, .. } => &parent.id,
        }
    }

    pub fn order(&self) -> i32 {
        match self {
            Self::Child(def) => def.order,
            Self::GroupParent { parent, .. } => parent.order,
        }
    }

    pub fn bounds(&self) -> ResourceBounds {
        match self {
            Self::Child(def) => def.bounds,
            Self::GroupParent { parent, .. } => parent.bounds,
        }
    }

    pub fn tier(&self) -> Option<&TierTrackDefinition> {
        match self {
            Self::Child(def) => def.tier.as_ref(),
            Self::GroupParent { parent, .. } => parent.tier.as_ref(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Child(def) => def.label.as_deref(),
            Self::GroupParent { parent, .. } => parent.label.as_deref(),
        }
    }
}

/// Pointer to the resource charged for global actions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalActionCost {
    pub resource_id: String,
    pub amount: f64,
}

/// Immutable description of every resource and group parent.
#[derive(Clone, Debug, Default)]
pub struct Blueprint {
    entries: HashMap<String, BlueprintEntry>,
    ordered_ids: Vec<String>,
    parent_children: HashMap<String, Vec<String>>,
    child_parent: HashMap<String, String>,
    limited_ids: HashSet<String>,
    /// Group parents ordered so every parent comes after all of its nested
    /// parent descendants.
    recompute_order: Vec<String>,
    global_action_costs: Vec<GlobalActionCost>,
}

impl Blueprint {
    /// Builds a shared blueprint from resource and group definitions.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::UnknownGroup`] if a definition references an
    ///   unregistered group
    /// - [`ResourceError::GroupParentCollision`] if a plain definition reuses
    ///   a group parent id
    /// - [`ResourceError::DuplicateDefinition`] for repeated ids
    /// - [`ResourceError::GroupCycle`] for self-nesting groups
    pub fn build<R, G>(resources: R, groups: G) -> ResourceResult<Arc<Self>>
    where
        R: IntoIterator<Item = ResourceDefinition>,
        G: IntoIterator<Item = GroupDefinition>,
    {
        builder::build(
            resources.into_iter().collect(),
            groups.into_iter().collect(),
        )
        .map(Arc::new)
    }

    pub fn entry(&self, id: &str) -> ResourceResult<&BlueprintEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| ResourceError::UnknownResource(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Every id in global presentation order.
    pub fn ordered_ids(&self) -> &[String] {
        &self.ordered_ids
    }

    /// Direct children of a group parent, in intra-group order.
    pub fn children_of(&self, parent: &str) -> &[String] {
        self.parent_children
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn parent_of(&self, child: &str) -> Option<&str> {
        self.child_parent.get(child).map(String::as_str)
    }

    /// Iterates the parent chain of `id`, nearest parent first.
    pub fn ancestors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::successors(self.parent_of(id), move |current| self.parent_of(current))
    }

    pub fn is_limited(&self, id: &str) -> bool {
        self.limited_ids.contains(id)
    }

    /// Group parents ordered innermost first.
    pub fn recompute_order(&self) -> &[String] {
        &self.recompute_order
    }

    pub fn global_action_costs(&self) -> &[GlobalActionCost] {
        &self.global_action_costs
    }

    /// The first global-action-cost pointer in display order, if any.
    pub fn primary_action_cost(&self) -> Option<&GlobalActionCost> {
        self.global_action_costs.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
