//! Serializable, presentation-ordered view of a state tree.

use super::ResourceState;
use crate::tier::TierProgress;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierSnapshot {
    pub track_id: String,
    pub step_id: Option<String>,
    pub progress: TierProgress,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSnapshot {
    pub id: String,
    pub label: Option<String>,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub limited: bool,
    pub touched: bool,
    /// Enclosing group parent, if any.
    pub parent: Option<String>,
    /// Summed children of a group parent.
    pub children: Vec<String>,
    pub tier: Option<TierSnapshot>,
}

/// Every value of one owner, in blueprint presentation order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSnapshot {
    pub values: Vec<ValueSnapshot>,
}

impl ResourceSnapshot {
    pub fn get(&self, id: &str) -> Option<&ValueSnapshot> {
        self.values.iter().find(|value| value.id == id)
    }
}

impl ResourceState {
    pub fn snapshot(&self) -> ResourceSnapshot {
        let values = self
            .iter()
            .map(|value| ValueSnapshot {
                id: value.id().to_string(),
                label: self
                    .blueprint()
                    .entry(value.id())
                    .ok()
                    .and_then(|entry| entry.label())
                    .map(str::to_string),
                value: value.value(),
                lower: value.bounds().lower,
                upper: value.bounds().upper,
                limited: value.is_limited(),
                touched: value.touched(),
                parent: value.parent().map(str::to_string),
                children: value.children().to_vec(),
                tier: value.tier().map(|tier| TierSnapshot {
                    track_id: tier.track_id.clone(),
                    step_id: tier.current_step_id.clone(),
                    progress: tier.progress,
                }),
            })
            .collect();

        ResourceSnapshot { values }
    }
}
