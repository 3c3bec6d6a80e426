//! Tier tracks: ordered, non-overlapping step ranges attached to a resource.
//!
//! A resource with a tier track always sits in at most one step. Every change
//! to its value re-resolves the step; crossing into a different step runs the
//! old step's exit effects, removes its passives, runs the new step's enter
//! effects, and queues a [`TierTransition`] on the owner's state.
//!
//! ```text
//!        value ─► match steps ─► same step? ── yes ─► done
//!                                   │ no
//!                                   ▼
//!                 exit(old) ─► remove passives(old) ─► enter(new) ─► record
//! ```

mod engine;

pub use engine::{apply_tiering, initialise};

use crate::blueprint::TierTrackDefinition;

/// Runtime view of one step on a track.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierStep {
    pub id: String,
    pub index: usize,
    pub min: f64,
    pub max: Option<f64>,
    pub label: Option<String>,
}

impl TierStep {
    pub fn matches(&self, value: f64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value <= max)
    }
}

/// Where the value sits relative to its current step.
///
/// With no matching step, `min` is the value itself and `max` is the start of
/// the next step above, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierProgress {
    pub value: f64,
    pub min: f64,
    pub max: Option<f64>,
}

/// Per-owner tier bookkeeping for one tiered resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierState {
    pub track_id: String,
    pub steps: Vec<TierStep>,
    /// Step the value currently matches.
    pub current_step_id: Option<String>,
    /// Neighbouring step below the value.
    pub previous_step_id: Option<String>,
    /// Neighbouring step above the value.
    pub next_step_id: Option<String>,
    pub progress: TierProgress,
    pub touched: bool,
}

impl TierState {
    /// Creates unresolved tier state for a track. The first tiering pass
    /// places the value.
    pub fn from_track(track: &TierTrackDefinition) -> Self {
        let steps = track
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| TierStep {
                id: step.id.clone(),
                index,
                min: step.min,
                max: step.max,
                label: step.label.clone(),
            })
            .collect();

        Self {
            track_id: track.id.clone(),
            steps,
            current_step_id: None,
            previous_step_id: None,
            next_step_id: None,
            progress: TierProgress::default(),
            touched: false,
        }
    }

    pub fn current_step(&self) -> Option<&TierStep> {
        let current = self.current_step_id.as_deref()?;
        self.steps.iter().find(|step| step.id == current)
    }

    /// Refreshes step ids and the progress snapshot for `value`, given the
    /// index of the matched step.
    pub(crate) fn place(&mut self, matched: Option<usize>, value: f64) {
        match matched {
            Some(index) => {
                let step = &self.steps[index];
                self.progress = TierProgress {
                    value,
                    min: step.min,
                    max: step.max,
                };
                self.current_step_id = Some(step.id.clone());
                self.previous_step_id = index
                    .checked_sub(1)
                    .and_then(|below| self.steps.get(below))
                    .map(|step| step.id.clone());
                self.next_step_id = self.steps.get(index + 1).map(|step| step.id.clone());
            }
            None => {
                let below = self
                    .steps
                    .iter()
                    .rev()
                    .find(|step| step.max.is_some_and(|max| max < value));
                let above = self.steps.iter().find(|step| step.min > value);
                self.progress = TierProgress {
                    value,
                    min: value,
                    max: above.map(|step| step.min),
                };
                self.current_step_id = None;
                self.previous_step_id = below.map(|step| step.id.clone());
                self.next_step_id = above.map(|step| step.id.clone());
            }
        }
    }
}

/// A recorded step change, queued on the owner's state until drained.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierTransition {
    pub resource_id: String,
    pub track_id: String,
    pub from_step_id: Option<String>,
    pub to_step_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::TierStepDefinition;

    fn track() -> TierState {
        TierState::from_track(&TierTrackDefinition::new(
            "morale",
            vec![
                TierStepDefinition::new("low", 0.0, Some(3.0)),
                TierStepDefinition::new("steady", 4.0, Some(7.0)),
                TierStepDefinition::new("high", 10.0, None),
            ],
        ))
    }

    #[test]
    fn open_ended_step_matches_everything_above_min() {
        let tier = track();
        let high = &tier.steps[2];
        assert!(!high.matches(9.9));
        assert!(high.matches(10.0));
        assert!(high.matches(1e9));

        let low = &tier.steps[0];
        assert!(low.matches(3.0));
        assert!(!low.matches(3.5));
    }

    #[test]
    fn placing_inside_a_step_tracks_neighbours() {
        let mut tier = track();
        tier.place(Some(1), 5.0);

        assert_eq!(tier.current_step_id.as_deref(), Some("steady"));
        assert_eq!(tier.previous_step_id.as_deref(), Some("low"));
        assert_eq!(tier.next_step_id.as_deref(), Some("high"));
        assert_eq!(
            tier.progress,
            TierProgress {
                value: 5.0,
                min: 4.0,
                max: Some(7.0)
            }
        );
    }

    #[test]
    fn placing_in_a_gap_points_at_surrounding_steps() {
        let mut tier = track();
        tier.place(None, 8.5);

        assert_eq!(tier.current_step_id, None);
        assert_eq!(tier.previous_step_id.as_deref(), Some("steady"));
        assert_eq!(tier.next_step_id.as_deref(), Some("high"));
        assert_eq!(tier.progress.max, Some(10.0));
    }
}
