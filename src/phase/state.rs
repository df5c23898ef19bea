//! Run state bookkeeping.
//!
//! `RunState` is the synchronous heart of the simulator: it owns the status,
//! the phase cursor, per-phase durations and the result bundle. It takes
//! the current time as an argument so transitions are deterministic; the
//! async driver in [`super::engine`] supplies timestamps from the tokio
//! clock.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::artifact::{self, HashSource, ResultBundle};

/// Lifecycle of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run has started, or the last one was reset.
    #[default]
    Idle,
    /// Ticks are advancing through phases.
    Running,
    /// Every phase finished and the result bundle is available.
    Complete,
}

/// Display status of a single phase, derived from [`RunState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// Not reached yet.
    Pending,
    /// Currently executing.
    Running,
    /// Finished.
    Complete,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Complete => "complete",
        })
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Complete => "complete",
        })
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A phase finished and the next one started.
    Advanced {
        /// Index of the phase that finished.
        completed: usize,
        /// How long it ran.
        duration: Duration,
        /// Index of the phase that started.
        next: usize,
    },
    /// The last phase finished; the run is complete.
    Finished {
        /// Index of the last phase.
        completed: usize,
        /// How long it ran.
        duration: Duration,
    },
}

/// Mutable state of the single simulation run.
///
/// `current_phase` is `None` while idle. During a run it points at the
/// running phase; on completion it sits one past the last index so every
/// phase reads as complete.
#[derive(Debug, Clone)]
pub struct RunState {
    num_phases: usize,
    status: RunStatus,
    current_phase: Option<usize>,
    phase_durations: Vec<Option<Duration>>,
    phase_started_at: Vec<Option<Instant>>,
    result: Option<ResultBundle>,
}

impl RunState {
    /// Creates an idle state for a catalog of `num_phases` phases.
    #[must_use]
    pub const fn new(num_phases: usize) -> Self {
        Self {
            num_phases,
            status: RunStatus::Idle,
            current_phase: None,
            phase_durations: Vec::new(),
            phase_started_at: Vec::new(),
            result: None,
        }
    }

    /// Returns the run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Returns the phase cursor (`None` when idle).
    #[must_use]
    pub const fn current_phase(&self) -> Option<usize> {
        self.current_phase
    }

    /// Returns the number of phases in the catalog.
    #[must_use]
    pub const fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Returns the per-phase durations; empty when idle.
    #[must_use]
    pub fn phase_durations(&self) -> &[Option<Duration>] {
        &self.phase_durations
    }

    /// Returns the result bundle, present only when complete.
    #[must_use]
    pub const fn result(&self) -> Option<&ResultBundle> {
        self.result.as_ref()
    }

    /// Derives the display status of the phase at `index`.
    #[must_use]
    pub fn phase_status(&self, index: usize) -> PhaseStatus {
        match self.current_phase {
            Some(current) if index < current => PhaseStatus::Complete,
            Some(current) if index == current && self.status == RunStatus::Running => {
                PhaseStatus::Running
            }
            _ => PhaseStatus::Pending,
        }
    }

    /// Begins a new run at `now`.
    ///
    /// Returns `false` without touching anything if a run is in progress.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.status == RunStatus::Running {
            return false;
        }

        self.status = RunStatus::Running;
        self.current_phase = Some(0);
        self.result = None;
        self.phase_durations = vec![None; self.num_phases];
        self.phase_started_at = vec![None; self.num_phases];
        if let Some(first) = self.phase_started_at.first_mut() {
            *first = Some(now);
        }
        true
    }

    /// Finishes the running phase at `now`.
    ///
    /// Records its duration, then either starts the next phase or, after
    /// the last one, moves the cursor past the end, synthesizes the result
    /// bundle from `hashes` and marks the run complete. Returns `None` when
    /// no run is in progress.
    pub fn tick(&mut self, now: Instant, hashes: &mut dyn HashSource) -> Option<TickOutcome> {
        if self.status != RunStatus::Running {
            return None;
        }
        let current = self.current_phase?;
        if current >= self.num_phases {
            return None;
        }

        let started = self.phase_started_at[current].unwrap_or(now);
        let duration = now.saturating_duration_since(started);
        self.phase_durations[current] = Some(duration);

        let next = current + 1;
        self.current_phase = Some(next);

        if next < self.num_phases {
            self.phase_started_at[next] = Some(now);
            Some(TickOutcome::Advanced {
                completed: current,
                duration,
                next,
            })
        } else {
            self.result = Some(artifact::synthesize(hashes));
            self.status = RunStatus::Complete;
            Some(TickOutcome::Finished {
                completed: current,
                duration,
            })
        }
    }

    /// Returns to idle, discarding durations and the result bundle.
    pub fn reset(&mut self) {
        self.status = RunStatus::Idle;
        self.current_phase = None;
        self.phase_durations.clear();
        self.phase_started_at.clear();
        self.result = None;
    }

    /// Sum of all recorded durations.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.phase_durations.iter().flatten().sum()
    }
}
