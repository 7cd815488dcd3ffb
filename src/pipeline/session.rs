//! Current-run session state.
//!
//! The session is the single source of truth for one run: the user's
//! inputs, the per-stage outputs recorded so far, the pipeline position,
//! and which stage's output is being viewed. It is replaced atomically by
//! `start`, `reset`, and `load_record`; the epoch counter identifies each
//! replacement so a stale in-flight generation response can be discarded.

use crate::stage::{self, StageId, STAGE_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-provided seed data for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInputs {
    pub title: String,
    pub brief: String,
}

impl SessionInputs {
    pub fn new(title: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            brief: brief.into(),
        }
    }

    /// A run needs both a title and a brief.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.brief.is_empty()
    }
}

/// Per-stage generated outputs, keyed by result slot. A slot is either
/// absent or holds a complete string; it is never partially written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResults {
    #[serde(flatten)]
    slots: HashMap<String, String>,
}

impl SessionResults {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    pub fn insert(&mut self, slot: &str, text: String) {
        self.slots.insert(slot.to_string(), text);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Recorded outputs in registry order, skipping absent slots.
    pub fn in_registry_order(&self) -> impl Iterator<Item = (StageId, &str)> {
        stage::registry()
            .iter()
            .filter_map(|stage| self.get(stage.slot).map(|text| (stage.id, text)))
    }
}

/// Where the pipeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePosition {
    /// No run has started since the last reset.
    NotStarted,
    /// The stage at this ordinal is executing or next to execute.
    Running(usize),
    /// All seven stages are done.
    Completed,
}

impl PipelinePosition {
    /// The stage currently executing, if any.
    pub fn current_stage(self) -> Option<StageId> {
        match self {
            PipelinePosition::Running(ordinal) => StageId::at(ordinal),
            _ => None,
        }
    }

    /// Whether the stage at `ordinal` has completed.
    pub fn is_done(self, ordinal: usize) -> bool {
        match self {
            PipelinePosition::NotStarted => false,
            PipelinePosition::Running(current) => ordinal < current,
            PipelinePosition::Completed => ordinal < STAGE_COUNT,
        }
    }

    /// Whether the stage at `ordinal` may be navigated to: done stages and
    /// the currently executing stage are unlocked, later stages are not.
    pub fn is_unlocked(self, ordinal: usize) -> bool {
        match self {
            PipelinePosition::NotStarted => false,
            PipelinePosition::Running(current) => ordinal <= current,
            PipelinePosition::Completed => ordinal < STAGE_COUNT,
        }
    }

    /// Position after one successful stage completion.
    pub(crate) fn advance(self) -> Self {
        match self {
            PipelinePosition::Running(ordinal) if ordinal + 1 >= STAGE_COUNT => {
                PipelinePosition::Completed
            }
            PipelinePosition::Running(ordinal) => PipelinePosition::Running(ordinal + 1),
            other => other,
        }
    }
}

/// The single current-run state.
#[derive(Debug)]
pub struct Session {
    pub inputs: SessionInputs,
    pub results: SessionResults,
    pub position: PipelinePosition,
    pub running: bool,
    /// Run identity; bumped whenever the session is replaced so a stale
    /// in-flight response can be recognized and discarded.
    pub(crate) epoch: u64,
    active_tab: usize,
}

impl Session {
    pub fn new() -> Self {
        Self {
            inputs: SessionInputs::default(),
            results: SessionResults::default(),
            position: PipelinePosition::NotStarted,
            running: false,
            epoch: 0,
            active_tab: 0,
        }
    }

    /// The stage whose output is currently displayed.
    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Selects the stage whose output is displayed. Locked stages are
    /// ignored rather than rejected.
    pub fn set_active_tab(&mut self, ordinal: usize) {
        if self.position.is_unlocked(ordinal) {
            self.active_tab = ordinal;
        }
    }

    /// Replaces the session for a fresh run and mints a new epoch.
    pub(crate) fn begin_run(&mut self, inputs: SessionInputs) -> u64 {
        self.inputs = inputs;
        self.results = SessionResults::default();
        self.position = PipelinePosition::Running(0);
        self.running = true;
        self.active_tab = 0;
        self.epoch += 1;
        self.epoch
    }

    /// Clears the session back to its initial state.
    pub(crate) fn clear(&mut self) {
        self.inputs = SessionInputs::default();
        self.results = SessionResults::default();
        self.position = PipelinePosition::NotStarted;
        self.running = false;
        self.active_tab = 0;
        self.epoch += 1;
    }

    /// Installs an archived run's snapshot as the current session.
    pub(crate) fn install_record(&mut self, inputs: SessionInputs, results: SessionResults) {
        self.inputs = inputs;
        self.results = results;
        self.position = PipelinePosition::Completed;
        self.running = false;
        self.active_tab = 0;
        self.epoch += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_validation() {
        assert!(SessionInputs::new("title", "brief").is_valid());
        assert!(!SessionInputs::new("", "brief").is_valid());
        assert!(!SessionInputs::new("title", "").is_valid());
    }

    #[test]
    fn test_position_advances_one_stage_at_a_time() {
        let mut position = PipelinePosition::Running(0);
        for expected in 1..STAGE_COUNT {
            position = position.advance();
            assert_eq!(position, PipelinePosition::Running(expected));
        }
        assert_eq!(position.advance(), PipelinePosition::Completed);
        assert_eq!(
            PipelinePosition::Completed.advance(),
            PipelinePosition::Completed
        );
        assert_eq!(
            PipelinePosition::NotStarted.advance(),
            PipelinePosition::NotStarted
        );
    }

    #[test]
    fn test_unlock_rules() {
        assert!(!PipelinePosition::NotStarted.is_unlocked(0));

        let running = PipelinePosition::Running(3);
        assert!(running.is_unlocked(0));
        assert!(running.is_unlocked(3));
        assert!(!running.is_unlocked(4));
        assert!(running.is_done(2));
        assert!(!running.is_done(3));

        assert!(PipelinePosition::Completed.is_unlocked(STAGE_COUNT - 1));
        assert!(PipelinePosition::Completed.is_done(STAGE_COUNT - 1));
    }

    #[test]
    fn test_locked_tab_selection_is_ignored() {
        let mut session = Session::new();
        session.begin_run(SessionInputs::new("t", "b"));
        session.position = PipelinePosition::Running(2);

        session.set_active_tab(1);
        assert_eq!(session.active_tab(), 1);

        // Ordinal 5 is locked while stage 2 executes.
        session.set_active_tab(5);
        assert_eq!(session.active_tab(), 1);
    }

    #[test]
    fn test_session_replacement_bumps_epoch() {
        let mut session = Session::new();
        let first = session.begin_run(SessionInputs::new("t", "b"));
        session.clear();
        let second = session.begin_run(SessionInputs::new("t", "b"));
        assert!(second > first);
        assert!(session.running);

        session.install_record(SessionInputs::new("t", "b"), SessionResults::default());
        assert!(!session.running);
        assert_eq!(session.position, PipelinePosition::Completed);
        assert_eq!(session.active_tab(), 0);
    }

    #[test]
    fn test_results_registry_order_iteration() {
        let mut results = SessionResults::default();
        results.insert("seo", "S".to_string());
        results.insert("script", "A".to_string());
        results.insert("storyboard", "B".to_string());

        let ordered: Vec<(StageId, &str)> = results.in_registry_order().collect();
        assert_eq!(
            ordered,
            vec![
                (StageId::Script, "A"),
                (StageId::Storyboard, "B"),
                (StageId::Seo, "S"),
            ]
        );
    }
}
