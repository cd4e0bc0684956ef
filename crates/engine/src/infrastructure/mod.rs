//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod actor;
pub mod clock;
pub mod config;
pub mod journal;
pub mod json_files;
pub mod memory_store;
pub mod openai;
pub mod ports;
pub mod telemetry;
