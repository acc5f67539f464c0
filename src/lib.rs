//! Core library for the `volley` CLI.
//!
//! This crate provides the building blocks used by the binary: the record
//! model and its decoders, the round-robin fan-in over several inputs,
//! metrics and histogram aggregation, the windowed reporters, and the
//! record dumpers. The primary user-facing interface is the `volley`
//! command-line application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod dump;
pub mod error;
pub mod format;
pub mod metrics;
pub mod record;
pub mod report;
pub mod streams;

mod entry;
mod system;

pub use entry::run;
