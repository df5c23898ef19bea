//! Pipeline phase state machine
//!
//! Simulates a multi-phase post-quantum genomic pipeline. Nothing is
//! computed: a timer advances through a fixed phase catalog and the final
//! tick fabricates placeholder result strings.
//!
//! # Architecture
//!
//! - [`Phase`] - Static catalog entry (title, description, icon)
//! - [`TimingModel`] - Maps [`SimulationParams`] to a tick interval
//! - [`RunState`] - Synchronous run bookkeeping (status, cursor, durations)
//! - [`PipelineSimulator`] - Async driver owning the single ticker task
//! - [`RunSnapshot`] - Serializable view for renderers

pub mod catalog;
pub mod engine;
pub mod interval;
pub mod snapshot;
pub mod state;

pub use catalog::{Phase, PhaseIcon, builtin_phases};
pub use engine::{PipelineSimulator, SimulatorBuilder};
pub use interval::{DataSize, PqcComplexity, SimulationParams, TimingModel, interval};
pub use snapshot::{PhaseSnapshot, RunSnapshot};
pub use state::{PhaseStatus, RunState, RunStatus, TickOutcome};
