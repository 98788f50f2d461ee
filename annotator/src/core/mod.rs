//! Deterministic, pure logic for trace classification.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! events and evaluation records and return deterministic outputs suitable
//! for tests.

pub mod answer;
pub mod classifier;
pub mod signals;
pub mod taxonomy;
pub mod text;
pub mod types;
