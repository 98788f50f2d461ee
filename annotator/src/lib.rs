//! Rule-based failure-mode annotation for multi-agent solving traces.
//!
//! Given an ordered event log per problem and an external correctness
//! verdict, the annotator derives behavioral signals and labels the run with
//! codes from a fixed failure taxonomy.
//!
//! - **[`core`]**: Pure, deterministic logic (signals, answer matching,
//!   taxonomy, rule bank). No I/O, fully testable in isolation.
//! - **[`io`]**: Reading inputs and traces, writing annotations, config.
//!
//! [`annotate`] joins the two for batch runs, [`report`] aggregates the
//! results, and [`cli`] implements the commands.

pub mod annotate;
pub mod cli;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
