//! Pipeline simulator orchestration.
//!
//! `PipelineSimulator` wraps a [`RunState`] with a tokio ticker task that
//! advances the run one phase per interval. Only one ticker is ever live.
//! Cancellation happens under the run-state lock and the tick handler
//! checks it under the same lock, so no tick can touch the state once
//! `reset` has returned.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::artifact::{HashSource, ResultBundle, SeededHashes};
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;

use super::catalog::Phase;
use super::interval::{SimulationParams, TimingModel};
use super::snapshot::{RunSnapshot, millis};
use super::state::{PhaseStatus, RunState, RunStatus, TickOutcome};

/// Builder for [`PipelineSimulator`].
pub struct SimulatorBuilder {
    phases: Vec<Phase>,
    timing: TimingModel,
    hashes: Box<dyn HashSource>,
    emitter: Option<Arc<EventEmitter>>,
}

impl SimulatorBuilder {
    /// Overrides the timing model (default base 1200 ms).
    #[must_use]
    pub fn timing(mut self, timing: TimingModel) -> Self {
        self.timing = timing;
        self
    }

    /// Overrides the random source used for result artifacts.
    #[must_use]
    pub fn hashes(mut self, hashes: Box<dyn HashSource>) -> Self {
        self.hashes = hashes;
        self
    }

    /// Attaches a structured event sink.
    #[must_use]
    pub fn emitter(mut self, emitter: Arc<EventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Builds an idle simulator.
    ///
    /// Phase indices are reassigned from list order.
    #[must_use]
    pub fn build(mut self) -> PipelineSimulator {
        if self.phases.is_empty() {
            warn!("no phases configured; runs will never complete");
        }
        for (position, phase) in self.phases.iter_mut().enumerate() {
            if phase.index != position {
                debug!(title = %phase.title, from = phase.index, to = position, "renumbering phase");
                phase.index = position;
            }
        }

        let phases: Arc<[Phase]> = self.phases.into();
        let run = RunState::new(phases.len());
        let (snapshots, _) = watch::channel(RunSnapshot::capture(&phases, &run, None, None));

        PipelineSimulator {
            timing: self.timing,
            shared: Arc::new(Shared {
                phases,
                inner: Mutex::new(Inner {
                    run,
                    hashes: self.hashes,
                    ticker: None,
                    run_id: None,
                    interval: None,
                }),
                snapshots,
                emitter: self.emitter,
            }),
        }
    }
}

/// Timer-driven pipeline simulation.
///
/// Collaborators call [`start`](Self::start) and [`reset`](Self::reset),
/// and read state through the query methods, [`snapshot`](Self::snapshot),
/// or a [`subscribe`](Self::subscribe) channel that is refreshed after
/// every change. `start` must be called from within a tokio runtime.
pub struct PipelineSimulator {
    timing: TimingModel,
    shared: Arc<Shared>,
}

/// State shared with the ticker task.
struct Shared {
    phases: Arc<[Phase]>,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<RunSnapshot>,
    emitter: Option<Arc<EventEmitter>>,
}

struct Inner {
    run: RunState,
    hashes: Box<dyn HashSource>,
    ticker: Option<Ticker>,
    run_id: Option<Uuid>,
    interval: Option<Duration>,
}

/// Handle to the live ticker task.
struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

impl PipelineSimulator {
    /// Starts building a simulator over the given phase catalog.
    #[must_use]
    pub fn builder(phases: Vec<Phase>) -> SimulatorBuilder {
        SimulatorBuilder {
            phases,
            timing: TimingModel::default(),
            hashes: Box::new(SeededHashes::from_entropy()),
            emitter: None,
        }
    }

    /// Creates a simulator with default timing and an OS-seeded random source.
    #[must_use]
    pub fn new(phases: Vec<Phase>) -> Self {
        Self::builder(phases).build()
    }

    /// Starts a run with the given parameters.
    ///
    /// Returns `false` and changes nothing if a run is already in progress.
    pub fn start(&self, params: SimulationParams) -> bool {
        let mut inner = self.shared.lock();

        if inner.run.status() == RunStatus::Running {
            debug!(run_id = ?inner.run_id, "start ignored; run already in progress");
            metrics::record_start_ignored();
            self.shared.emit(Event::StartIgnored {
                timestamp: Utc::now(),
                run_id: inner.run_id,
            });
            return false;
        }

        if let Some(stale) = inner.ticker.take() {
            debug!("cancelling stale ticker before new run");
            stale.stop();
        }

        let now = Instant::now();
        inner.run.begin(now);

        let interval = self.timing.interval(params);
        let run_id = Uuid::new_v4();
        inner.run_id = Some(run_id);
        inner.interval = Some(interval);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(drive(
            Arc::clone(&self.shared),
            cancel.clone(),
            now,
            interval,
        ));
        inner.ticker = Some(Ticker { cancel, handle });

        info!(
            %run_id,
            data_size = %params.data_size,
            pqc_complexity = %params.pqc_complexity,
            interval_ms = millis(interval),
            "simulation started"
        );
        metrics::record_run_started(params.data_size.as_str(), params.pqc_complexity.as_str());
        metrics::set_current_phase(Some(0));
        self.shared.emit(Event::RunStarted {
            timestamp: Utc::now(),
            run_id,
            data_size: params.data_size,
            pqc_complexity: params.pqc_complexity,
            interval_ms: millis(interval),
            phase_count: self.shared.phases.len(),
        });
        if let Some(first) = self.shared.phases.first() {
            self.shared.emit(Event::PhaseEntered {
                timestamp: Utc::now(),
                run_id: Some(run_id),
                phase_index: 0,
                phase_title: first.title.clone(),
            });
        }

        self.shared.publish(&inner);
        true
    }

    /// Cancels any in-flight run and returns to idle.
    ///
    /// The ticker is cancelled before state is cleared. Safe to call in any
    /// state; calling it while idle does nothing.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();

        let had_ticker = inner.ticker.is_some();
        if let Some(ticker) = inner.ticker.take() {
            ticker.stop();
        }

        if inner.run.status() == RunStatus::Idle && !had_ticker {
            debug!("reset on idle simulator");
            return;
        }

        let run_id = inner.run_id.take();
        let phase_index = inner.run.current_phase();
        inner.run.reset();
        inner.interval = None;

        info!(run_id = ?run_id, phase_index = ?phase_index, "simulation reset");
        metrics::record_reset();
        metrics::set_current_phase(None);
        self.shared.emit(Event::RunReset {
            timestamp: Utc::now(),
            run_id,
            phase_index,
        });

        self.shared.publish(&inner);
    }

    /// Returns the phase catalog.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.shared.phases
    }

    /// Returns the timing model.
    #[must_use]
    pub const fn timing(&self) -> TimingModel {
        self.timing
    }

    /// Returns the run status.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.shared.lock().run.status()
    }

    /// Returns the phase cursor (`None` when idle).
    #[must_use]
    pub fn current_phase(&self) -> Option<usize> {
        self.shared.lock().run.current_phase()
    }

    /// Derives the display status of the phase at `index`.
    #[must_use]
    pub fn phase_status(&self, index: usize) -> PhaseStatus {
        self.shared.lock().run.phase_status(index)
    }

    /// Returns the per-phase durations; empty when idle.
    #[must_use]
    pub fn phase_durations(&self) -> Vec<Option<Duration>> {
        self.shared.lock().run.phase_durations().to_vec()
    }

    /// Returns the result bundle once the run is complete.
    #[must_use]
    pub fn result(&self) -> Option<ResultBundle> {
        self.shared.lock().run.result().cloned()
    }

    /// Returns the identifier of the current run.
    #[must_use]
    pub fn run_id(&self) -> Option<Uuid> {
        self.shared.lock().run_id
    }

    /// Captures the full state.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        let inner = self.shared.lock();
        self.shared.capture(&inner)
    }

    /// Subscribes to snapshots published after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.shared.snapshots.subscribe()
    }
}

impl Drop for PipelineSimulator {
    fn drop(&mut self) {
        if let Some(ticker) = self.shared.lock().ticker.take() {
            ticker.stop();
        }
    }
}

impl std::fmt::Debug for PipelineSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("PipelineSimulator")
            .field("num_phases", &self.shared.phases.len())
            .field("status", &inner.run.status())
            .field("current_phase", &inner.run.current_phase())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn capture(&self, inner: &Inner) -> RunSnapshot {
        RunSnapshot::capture(&self.phases, &inner.run, inner.run_id, inner.interval)
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(self.capture(inner));
    }

    fn emit(&self, event: Event) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(event);
        }
    }

    fn title(&self, index: usize) -> String {
        self.phases
            .get(index)
            .map_or_else(|| "<none>".to_owned(), |p| p.title.clone())
    }

    /// Advances the run by one phase.
    fn on_tick(&self, cancel: &CancellationToken) -> ControlFlow<()> {
        let mut guard = self.lock();
        if cancel.is_cancelled() {
            return ControlFlow::Break(());
        }

        let inner = &mut *guard;
        let Some(outcome) = inner.run.tick(Instant::now(), inner.hashes.as_mut()) else {
            return ControlFlow::Break(());
        };
        let run_id = inner.run_id;

        let flow = match outcome {
            TickOutcome::Advanced {
                completed,
                duration,
                next,
            } => {
                info!(from = completed, to = next, duration_ms = millis(duration), "phase complete");
                self.phase_completed(run_id, completed, duration);
                metrics::set_current_phase(Some(next));
                self.emit(Event::PhaseEntered {
                    timestamp: Utc::now(),
                    run_id,
                    phase_index: next,
                    phase_title: self.title(next),
                });
                ControlFlow::Continue(())
            }
            TickOutcome::Finished {
                completed,
                duration,
            } => {
                self.phase_completed(run_id, completed, duration);
                let total_ms = millis(inner.run.total_duration());
                info!(?run_id, total_ms, "simulation complete");
                metrics::record_run_completed();
                metrics::set_current_phase(inner.run.current_phase());
                self.emit(Event::RunCompleted {
                    timestamp: Utc::now(),
                    run_id,
                    total_ms,
                });
                if let Some(ticker) = inner.ticker.take() {
                    ticker.cancel.cancel();
                }
                ControlFlow::Break(())
            }
        };

        self.publish(inner);
        flow
    }

    fn phase_completed(&self, run_id: Option<Uuid>, index: usize, duration: Duration) {
        metrics::record_phase_duration(index, duration);
        self.emit(Event::PhaseCompleted {
            timestamp: Utc::now(),
            run_id,
            phase_index: index,
            phase_title: self.title(index),
            duration_ms: millis(duration),
        });
    }
}

/// Ticker loop: one tick per `period`, the first one `period` after
/// `started_at`.
async fn drive(
    shared: Arc<Shared>,
    cancel: CancellationToken,
    started_at: Instant,
    period: Duration,
) {
    let mut ticks = tokio::time::interval_at(started_at + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("ticker cancelled");
                break;
            }
            _ = ticks.tick() => {
                if shared.on_tick(&cancel).is_break() {
                    break;
                }
            }
        }
    }
}
