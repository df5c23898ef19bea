//! Immutable, serializable view of a run for presentation layers.

use serde::Serialize;
use uuid::Uuid;

use crate::artifact::ResultBundle;

use super::catalog::{Phase, PhaseIcon};
use super::state::{PhaseStatus, RunState, RunStatus};

/// One phase card as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSnapshot {
    /// Ordinal position.
    pub index: usize,
    /// Card title.
    pub title: String,
    /// Icon tag.
    pub icon: PhaseIcon,
    /// Derived display status.
    pub status: PhaseStatus,
    /// Elapsed time once the phase has finished.
    pub duration_ms: Option<u64>,
}

/// Point-in-time copy of the simulator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSnapshot {
    /// Identifier of the current run, `None` when idle.
    pub run_id: Option<Uuid>,
    /// Run lifecycle status.
    pub status: RunStatus,
    /// Phase cursor; `None` when idle, phase count when complete.
    pub current_phase_index: Option<usize>,
    /// Tick interval of the current run.
    pub interval_ms: Option<u64>,
    /// Every phase with its derived status.
    pub phases: Vec<PhaseSnapshot>,
    /// Result bundle once complete.
    pub result: Option<ResultBundle>,
}

pub(crate) fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl RunSnapshot {
    /// Captures the state of `run` over the given catalog.
    ///
    /// Phases are matched to the run by list position.
    #[must_use]
    pub fn capture(
        phases: &[Phase],
        run: &RunState,
        run_id: Option<Uuid>,
        interval: Option<std::time::Duration>,
    ) -> Self {
        let durations = run.phase_durations();
        Self {
            run_id,
            status: run.status(),
            current_phase_index: run.current_phase(),
            interval_ms: interval.map(millis),
            phases: phases
                .iter()
                .enumerate()
                .map(|(index, phase)| PhaseSnapshot {
                    index,
                    title: phase.title.clone(),
                    icon: phase.icon,
                    status: run.phase_status(index),
                    duration_ms: durations.get(index).copied().flatten().map(millis),
                })
                .collect(),
            result: run.result().cloned(),
        }
    }

    /// Returns whether the run has reached its terminal state.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Complete
    }

    /// Sum of all finished phase durations in milliseconds.
    #[must_use]
    pub fn total_ms(&self) -> u64 {
        self.phases.iter().filter_map(|p| p.duration_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::artifact::SeededHashes;
    use crate::phase::catalog::builtin_phases;

    #[test]
    fn test_idle_snapshot_json() {
        let phases = builtin_phases();
        let run = RunState::new(phases.len());
        let snap = RunSnapshot::capture(&phases, &run, None, None);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["status"], "idle");
        assert!(json["current_phase_index"].is_null());
        assert!(json["result"].is_null());
        assert_eq!(json["phases"].as_array().unwrap().len(), 5);
        assert_eq!(json["phases"][0]["status"], "pending");
        assert_eq!(json["phases"][2]["icon"], "dna");
    }

    #[test]
    fn test_mid_run_snapshot() {
        let phases = builtin_phases();
        let mut run = RunState::new(phases.len());
        let t0 = Instant::now();
        run.begin(t0);
        run.tick(t0 + Duration::from_millis(1500), &mut SeededHashes::from_seed(0));

        let id = Uuid::new_v4();
        let snap = RunSnapshot::capture(&phases, &run, Some(id), Some(Duration::from_millis(1500)));
        assert_eq!(snap.run_id, Some(id));
        assert_eq!(snap.current_phase_index, Some(1));
        assert_eq!(snap.interval_ms, Some(1500));
        assert_eq!(snap.phases[0].status, PhaseStatus::Complete);
        assert_eq!(snap.phases[0].duration_ms, Some(1500));
        assert_eq!(snap.phases[1].status, PhaseStatus::Running);
        assert_eq!(snap.phases[1].duration_ms, None);
        assert_eq!(snap.total_ms(), 1500);
        assert!(!snap.is_complete());
    }

    #[test]
    fn test_positions_come_from_list_order() {
        let phases = vec![
            Phase::new(7, "a", "", PhaseIcon::Key),
            Phase::new(3, "b", "", PhaseIcon::Dna),
        ];
        let mut run = RunState::new(phases.len());
        let t0 = Instant::now();
        run.begin(t0);
        run.tick(t0 + Duration::from_millis(800), &mut SeededHashes::from_seed(0));

        let snap = RunSnapshot::capture(&phases, &run, None, None);
        assert_eq!(snap.phases[0].index, 0);
        assert_eq!(snap.phases[0].status, PhaseStatus::Complete);
        assert_eq!(snap.phases[0].duration_ms, Some(800));
        assert_eq!(snap.phases[1].index, 1);
        assert_eq!(snap.phases[1].status, PhaseStatus::Running);
    }
}
