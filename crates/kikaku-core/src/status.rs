use crate::types::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Wizard progress attached to a project.
///
/// `completed_steps` only ever grows: steps are never un-completed.
/// `current_step` is the most recently visited step, not necessarily the
/// furthest one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub current_step: Step,
    #[serde(default)]
    pub completed_steps: BTreeSet<Step>,
    pub last_updated: DateTime<Utc>,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self {
            current_step: Step::Genre,
            completed_steps: BTreeSet::new(),
            last_updated: Utc::now(),
        }
    }
}

impl ProjectStatus {
    /// Record that the user reached `step`: the canonical prefix through
    /// `step` is unioned into `completed_steps`, and `current_step` moves to
    /// `step` even when that is a step backwards.
    ///
    /// The whole prefix counts as complete even on direct navigation past
    /// unfilled steps; resume derivation still routes by the actual state.
    pub fn mark_reached(&mut self, step: Step) {
        self.completed_steps.extend(step.prefix().iter().copied());
        self.current_step = step;
        self.last_updated = Utc::now();
    }

    /// Share of canonical steps completed, rounded to an integer percent.
    pub fn progress_percent(&self) -> u8 {
        let total = Step::all().len() as f64;
        let done = self.completed_steps.len() as f64;
        (100.0 * done / total).round() as u8
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
