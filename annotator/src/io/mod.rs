//! I/O helpers for annotator commands.

pub mod annotations;
pub mod config;
pub mod inputs;
pub mod trace_log;
