//! `rlimit`: inspect and adjust process resource limits, then optionally
//! exec a command that inherits them.
//!
//! This crate provides:
//! - Resource table: the `RLIMIT_*` kinds this platform defines
//! - Controller: query, apply and report one resource at a time
//! - CLI driver: argument parsing and the list / set / set-and-exec modes
//! - Structured log: JSONL diagnostics on standard error at `-vv`

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod resources;
pub mod structured_log;
pub mod sys;

pub use cli::{Invocation, Mode, Parsed};
pub use config::Config;
pub use controller::Controller;
pub use error::RlimitError;
