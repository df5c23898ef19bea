//! Structured event stream for `pqcsim`.
//!
//! Discrete, typed events emitted as the simulator moves through a run.
//! Events are serialized as newline-delimited JSON (JSONL) and include a
//! monotonically increasing sequence number for ordering.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::phase::{DataSize, PqcComplexity};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a simulation.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A run has started.
    RunStarted {
        /// When the run started.
        timestamp: DateTime<Utc>,
        /// Identifier of the new run.
        run_id: Uuid,
        /// Selected data size class.
        data_size: DataSize,
        /// Selected complexity class.
        pqc_complexity: PqcComplexity,
        /// Tick interval in milliseconds.
        interval_ms: u64,
        /// Number of phases in the catalog.
        phase_count: usize,
    },

    /// `start` was called while a run was in progress.
    StartIgnored {
        /// When the call arrived.
        timestamp: DateTime<Utc>,
        /// The run that kept going.
        run_id: Option<Uuid>,
    },

    /// A phase finished.
    PhaseCompleted {
        /// When the phase finished.
        timestamp: DateTime<Utc>,
        /// Run the phase belongs to.
        run_id: Option<Uuid>,
        /// Zero-based index of the phase.
        phase_index: usize,
        /// Title of the phase.
        phase_title: String,
        /// Elapsed time in milliseconds.
        duration_ms: u64,
    },

    /// A phase started.
    PhaseEntered {
        /// When the phase started.
        timestamp: DateTime<Utc>,
        /// Run the phase belongs to.
        run_id: Option<Uuid>,
        /// Zero-based index of the phase.
        phase_index: usize,
        /// Title of the phase.
        phase_title: String,
    },

    /// The last phase finished and the result bundle was produced.
    RunCompleted {
        /// When the run finished.
        timestamp: DateTime<Utc>,
        /// Identifier of the run.
        run_id: Option<Uuid>,
        /// Sum of all phase durations in milliseconds.
        total_ms: u64,
    },

    /// The simulator was reset.
    RunReset {
        /// When the reset happened.
        timestamp: DateTime<Utc>,
        /// Run that was discarded, if any.
        run_id: Option<Uuid>,
        /// Phase cursor at the time of the reset.
        phase_index: Option<usize>,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are dropped; a broken
/// event sink never stops a run.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug, so implement it by hand.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    ///
    /// Stdout is left to the renderer.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_event() -> Event {
        Event::RunStarted {
            timestamp: DateTime::parse_from_rfc3339("2026-03-04T10:15:30Z")
                .unwrap()
                .with_timezone(&Utc),
            run_id: Uuid::nil(),
            data_size: DataSize::Large,
            pqc_complexity: PqcComplexity::Paranoid,
            interval_ms: 4320,
            phase_count: 5,
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_string(&sample_event()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["type"], "RunStarted");
        assert_eq!(parsed["data_size"], "large");
        assert_eq!(parsed["pqc_complexity"], "paranoid");
        assert_eq!(parsed["interval_ms"], 4320);
    }

    #[test]
    fn emitter_writes_valid_jsonl() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());

        let output = tw.contents();
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["type"], "RunStarted");
        assert_eq!(parsed["phase_count"], 5);
        assert_eq!(parsed["sequence"], 0);
    }

    #[test]
    fn emitter_increments_sequence() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());
        emitter.emit(Event::RunReset {
            timestamp: Utc::now(),
            run_id: None,
            phase_index: None,
        });

        assert_eq!(emitter.event_count(), 2);

        let lines: Vec<serde_json::Value> = tw
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["type"], "RunReset");
    }

    #[test]
    fn all_event_variants_serialize_to_valid_json() {
        let now = Utc::now();
        let id = Some(Uuid::new_v4());
        let variants: Vec<Event> = vec![
            sample_event(),
            Event::StartIgnored {
                timestamp: now,
                run_id: id,
            },
            Event::PhaseCompleted {
                timestamp: now,
                run_id: id,
                phase_index: 0,
                phase_title: "Initialize PQC Environment".to_owned(),
                duration_ms: 1200,
            },
            Event::PhaseEntered {
                timestamp: now,
                run_id: id,
                phase_index: 1,
                phase_title: "Secure Data Ingestion".to_owned(),
            },
            Event::RunCompleted {
                timestamp: now,
                run_id: id,
                total_ms: 6000,
            },
            Event::RunReset {
                timestamp: now,
                run_id: id,
                phase_index: Some(3),
            },
        ];

        for variant in &variants {
            let json = serde_json::to_string(variant).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert!(parsed.get("type").is_some(), "missing type tag: {json}");
        }
    }

    #[test]
    fn envelope_flattens_event_fields() {
        let envelope = EventEnvelope {
            sequence: 7,
            event: sample_event(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["sequence"], 7);
        assert_eq!(parsed["type"], "RunStarted");
        assert!(
            parsed.get("event").is_none(),
            "event field should be flattened"
        );
    }
}
