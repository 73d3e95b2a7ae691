//! Run configuration, built once from the command line.

/// Global display settings. Never changes after argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Number of `-v` flags. At 1, modified limits are echoed back; at 2,
    /// JSONL diagnostics go to standard error.
    pub verbosity: u8,
    /// Scale values to K/M/G in reports (`-h`).
    pub human_readable: bool,
}

impl Config {
    /// Whether a report line is printed for a resource.
    ///
    /// Query-only resources are always shown. Modified ones only when
    /// confirmation was asked for.
    #[inline]
    pub fn shows(&self, modified: bool) -> bool {
        self.verbosity > 0 || !modified
    }
}
