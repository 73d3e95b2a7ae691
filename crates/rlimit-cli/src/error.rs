//! Error type for the `rlimit` binary.

use std::io;

use thiserror::Error;

use rlimit_core::ParseError;

use crate::sys;

/// Everything that can stop a run. All variants are terminal.
#[derive(Debug, Error)]
pub enum RlimitError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Getting {resource} limit")]
    Query {
        resource: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("Setting {resource} limits to soft={soft} hard={hard}")]
    Set {
        resource: &'static str,
        soft: u64,
        hard: u64,
        #[source]
        source: io::Error,
    },
    #[error("Executing: {command}")]
    Exec {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Writing report")]
    Output(#[source] io::Error),
}

impl RlimitError {
    /// The OS error code behind this failure, if there is one.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Parse(_) => None,
            Self::Query { source, .. }
            | Self::Set { source, .. }
            | Self::Exec { source, .. }
            | Self::Output(source) => source.raw_os_error(),
        }
    }

    /// The `ERROR: ...` line printed on standard error.
    pub fn render(&self) -> String {
        match self.errno() {
            Some(code) => format!("ERROR: {self}: {}", sys::strerror(code)),
            None => format!("ERROR: {self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_has_no_errno() {
        let err = RlimitError::from(ParseError::Invalid("12q".into()));
        assert_eq!(err.errno(), None);
        assert_eq!(err.render(), "ERROR: Invalid limit '12q'");
    }

    #[test]
    fn test_set_error_appends_strerror() {
        let err = RlimitError::Set {
            resource: "CPU Time",
            soft: 10,
            hard: 20,
            source: io::Error::from_raw_os_error(libc::EPERM),
        };
        assert_eq!(err.errno(), Some(libc::EPERM));
        assert_eq!(
            err.render(),
            format!(
                "ERROR: Setting CPU Time limits to soft=10 hard=20: {}",
                sys::strerror(libc::EPERM)
            )
        );
    }

    #[test]
    fn test_exec_error_message() {
        let err = RlimitError::Exec {
            command: "nope 'a b'".into(),
            source: io::Error::from_raw_os_error(libc::ENOENT),
        };
        assert_eq!(
            err.render(),
            "ERROR: Executing: nope 'a b': No such file or directory"
        );
    }
}
