//! Latency analysis for user/kernel channel benchmark logs.
//!
//! A benchmark driver runs a client program once per configuration and
//! appends every instrumented event to one log. This crate parses that log,
//! pairs start/end events per message and exports the resulting latency
//! series per benchmark question.

pub mod analyzer;
pub mod config;
pub mod report;
