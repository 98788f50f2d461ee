//! Stable exit codes for annotator CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed: missing required input, invalid config, or I/O error.
pub const INVALID: i32 = 1;
