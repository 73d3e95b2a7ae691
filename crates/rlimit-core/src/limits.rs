//! Soft/hard limit pairs and the `soft[,hard]` request syntax.

use crate::codec::{ParseError, parse_limit};

/// Infinity sentinel for resource limits.
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd",
    target_os = "netbsd"
))]
pub const RLIM_INFINITY: u64 = i64::MAX as u64;

/// Infinity sentinel for resource limits.
#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
pub const RLIM_INFINITY: u64 = u64::MAX;

/// Resource limit values (like `struct rlimit`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitPair {
    /// Soft limit, the value the kernel enforces.
    pub soft: u64,
    /// Hard limit (ceiling for soft limit).
    pub hard: u64,
}

impl LimitPair {
    #[must_use]
    pub const fn new(soft: u64, hard: u64) -> Self {
        Self { soft, hard }
    }

    /// Returns `true` if the pair has a valid relationship (soft <= hard).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.soft <= self.hard
    }

    /// Lower the soft limit to the hard limit when it exceeds it.
    ///
    /// The hard limit is never raised to meet the soft one.
    #[must_use]
    pub fn clamped(self) -> Self {
        if self.hard < self.soft {
            Self {
                soft: self.hard,
                hard: self.hard,
            }
        } else {
            self
        }
    }
}

/// Parse a limit value, accepting `unlimited`/`infinity` for the sentinel.
pub fn resolve_limit(text: &str) -> Result<u64, ParseError> {
    if text.eq_ignore_ascii_case("unlimited") || text.eq_ignore_ascii_case("infinity") {
        return Ok(RLIM_INFINITY);
    }
    parse_limit(text)
}

/// One `soft[,hard]` argument. Absent sides leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitRequest {
    pub soft: Option<String>,
    pub hard: Option<String>,
}

impl LimitRequest {
    /// Split an argument at its first comma. Empty sides count as absent,
    /// so `",512"` only touches the hard limit.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        let (soft, hard) = match arg.split_once(',') {
            Some((soft, hard)) => (soft, Some(hard)),
            None => (arg, None),
        };
        let side = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            soft: side(soft),
            hard: hard.and_then(side),
        }
    }

    /// Returns `true` if neither side would change anything.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.soft.is_none() && self.hard.is_none()
    }

    /// Overlay the requested sides on `current`. The result is not clamped.
    pub fn merge(&self, current: LimitPair) -> Result<LimitPair, ParseError> {
        let mut next = current;
        if let Some(soft) = &self.soft {
            next.soft = resolve_limit(soft)?;
        }
        if let Some(hard) = &self.hard {
            next.hard = resolve_limit(hard)?;
        }
        Ok(next)
    }
}
