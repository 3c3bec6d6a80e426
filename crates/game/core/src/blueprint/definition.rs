//! Raw resource and group definitions supplied by the content layer.
//!
//! Definitions are plain data. They carry no behaviour beyond small builder
//! helpers; the [`Blueprint`](super::Blueprint) builder validates and orders
//! them.

/// Inclusive numeric bounds for a resource value.
///
/// Either side may be absent, meaning the value is unbounded in that
/// direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceBounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ResourceBounds {
    /// Bounds with neither side set.
    pub const UNBOUNDED: Self = Self {
        lower: None,
        upper: None,
    };

    pub const fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    pub const fn between(lower: f64, upper: f64) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    pub const fn at_least(lower: f64) -> Self {
        Self::new(Some(lower), None)
    }

    pub const fn at_most(upper: f64) -> Self {
        Self::new(None, Some(upper))
    }

    /// Clamps `value` into the bounds.
    ///
    /// Applies the lower bound first, then the upper bound, so a misconfigured
    /// pair with `lower > upper` resolves to `upper` instead of panicking.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut clamped = value;
        if let Some(lower) = self.lower {
            clamped = clamped.max(lower);
        }
        if let Some(upper) = self.upper {
            clamped = clamped.min(upper);
        }
        clamped
    }

    /// How far `value` may fall before reaching the lower bound.
    ///
    /// Unbounded values may fall by their full amount.
    pub fn headroom(&self, value: f64) -> f64 {
        match self.lower {
            Some(lower) => (value - lower).max(0.0),
            None => value.max(0.0),
        }
    }

    /// How far `value` may rise before reaching the upper bound.
    pub fn capacity(&self, value: f64) -> f64 {
        match self.upper {
            Some(upper) => (upper - value).max(0.0),
            None => f64::INFINITY,
        }
    }
}

/// One numeric range on a tier track. Both ends are inclusive; `max` may be
/// left open.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierStepDefinition {
    pub id: String,
    pub min: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    /// Effect ids run, in order, when the value enters this step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enter: Vec<String>,
    /// Effect ids run, in order, when the value leaves this step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exit: Vec<String>,
    /// Passive ids removed when the value leaves this step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<String>,
}

impl TierStepDefinition {
    pub fn new(id: impl Into<String>, min: f64, max: Option<f64>) -> Self {
        Self {
            id: id.into(),
            min,
            max,
            label: None,
            enter: Vec::new(),
            exit: Vec::new(),
            passives: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn on_enter<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enter.extend(effects.into_iter().map(Into::into));
        self
    }

    pub fn on_exit<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exit.extend(effects.into_iter().map(Into::into));
        self
    }

    pub fn with_passives<I, S>(mut self, passives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passives.extend(passives.into_iter().map(Into::into));
        self
    }
}

/// Ordered set of steps attached to one resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierTrackDefinition {
    pub id: String,
    pub steps: Vec<TierStepDefinition>,
}

impl TierTrackDefinition {
    pub fn new(id: impl Into<String>, steps: Vec<TierStepDefinition>) -> Self {
        Self {
            id: id.into(),
            steps,
        }
    }
}

/// Membership of a resource (or a nested group parent) in a group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupMembership {
    pub group: String,
    /// Position inside the group; falls back to the member's display order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: Option<i32>,
}

/// A plain, directly mutable resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDefinition {
    pub id: String,
    pub order: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: ResourceBounds,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: Option<TierTrackDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<GroupMembership>,
    /// Amount this resource is charged per global action, if it is the
    /// action currency.
    #[cfg_attr(feature = "serde", serde(default))]
    pub global_action_cost: Option<f64>,
}

impl ResourceDefinition {
    pub fn new(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
            bounds: ResourceBounds::UNBOUNDED,
            label: None,
            description: None,
            tier: None,
            group: None,
            global_action_cost: None,
        }
    }

    pub fn with_bounds(mut self, bounds: ResourceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tier(mut self, track: TierTrackDefinition) -> Self {
        self.tier = Some(track);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>, order: Option<i32>) -> Self {
        self.group = Some(GroupMembership {
            group: group.into(),
            order,
        });
        self
    }

    pub fn with_global_action_cost(mut self, amount: f64) -> Self {
        self.global_action_cost = Some(amount);
        self
    }
}

/// Descriptor of the computed parent of a group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupParentDescriptor {
    pub id: String,
    pub order: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: ResourceBounds,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: Option<TierTrackDefinition>,
    /// Enclosing group, for nested parents.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<GroupMembership>,
}

impl GroupParentDescriptor {
    pub fn new(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
            label: None,
            description: None,
            bounds: ResourceBounds::UNBOUNDED,
            tier: None,
            group: None,
        }
    }

    pub fn with_bounds(mut self, bounds: ResourceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tier(mut self, track: TierTrackDefinition) -> Self {
        self.tier = Some(track);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>, order: Option<i32>) -> Self {
        self.group = Some(GroupMembership {
            group: group.into(),
            order,
        });
        self
    }
}

/// A group of resources summed into one computed parent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupDefinition {
    pub id: String,
    pub parent: GroupParentDescriptor,
}

impl GroupDefinition {
    pub fn new(id: impl Into<String>, parent: GroupParentDescriptor) -> Self {
        Self {
            id: id.into(),
            parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_both_sides() {
        let bounds = ResourceBounds::between(0.0, 10.0);
        assert_eq!(bounds.clamp(-3.0), 0.0);
        assert_eq!(bounds.clamp(4.0), 4.0);
        assert_eq!(bounds.clamp(50.0), 10.0);
        assert_eq!(ResourceBounds::UNBOUNDED.clamp(-7.5), -7.5);
    }

    #[test]
    fn headroom_and_capacity() {
        let bounds = ResourceBounds::between(2.0, 5.0);
        assert_eq!(bounds.headroom(4.0), 2.0);
        assert_eq!(bounds.capacity(4.0), 1.0);
        assert_eq!(ResourceBounds::UNBOUNDED.headroom(8.0), 8.0);
        assert!(ResourceBounds::UNBOUNDED.capacity(8.0).is_infinite());
    }
}
