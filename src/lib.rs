//! `pqcsim` - visual simulation of a post-quantum secured genomic pipeline
//!
//! A timer walks a run through a fixed catalog of display-only phases and
//! fabricates placeholder result strings at the end. Nothing is actually
//! encrypted, annotated or committed.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod phase;
