//! Pure-logic core of the `rlimit` tool.
//!
//! This crate provides:
//! - Limit codec: parse `"10k"`/`"2G"`/`"0x400"` style values and format them back
//! - Limit pairs: soft/hard values and the clamp rule applied before every set
//! - Limit requests: the `soft[,hard]` argument syntax
//!
//! Nothing here touches the OS. System calls live in `rlimit-cli`.

#![deny(unsafe_code)]

pub mod codec;
pub mod limits;

pub use codec::{ParseError, format_limit, parse_limit};
pub use limits::{LimitPair, LimitRequest, RLIM_INFINITY, resolve_limit};
