//! Safe boundary over `getrlimit`, `setrlimit`, `execvp` and `strerror_r`.

use std::ffi::{CStr, OsString};
use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

use rlimit_core::LimitPair;

use crate::resources::ResourceKind;

/// Where resource limits are read from and written to.
pub trait LimitSource {
    /// Fetch the current soft/hard pair.
    fn get(&self, resource: &ResourceKind) -> io::Result<LimitPair>;
    /// Ask for a new soft/hard pair. The kernel may refuse it.
    fn set(&mut self, resource: &ResourceKind, pair: LimitPair) -> io::Result<()>;
}

/// The calling process's own limits.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostLimits;

impl LimitSource for HostLimits {
    fn get(&self, resource: &ResourceKind) -> io::Result<LimitPair> {
        let mut rlim = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: `rlim` is a valid, writable `struct rlimit`.
        let rc = unsafe { libc::getrlimit(resource.id, &mut rlim) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(LimitPair::new(rlim.rlim_cur as u64, rlim.rlim_max as u64))
    }

    fn set(&mut self, resource: &ResourceKind, pair: LimitPair) -> io::Result<()> {
        let rlim = libc::rlimit {
            rlim_cur: pair.soft as libc::rlim_t,
            rlim_max: pair.hard as libc::rlim_t,
        };
        // SAFETY: `rlim` is a valid `struct rlimit` that outlives the call.
        let rc = unsafe { libc::setrlimit(resource.id, &rlim) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Replace the process image with `argv`, searching `PATH` for `argv[0]`.
///
/// Only returns on failure.
pub fn exec(argv: &[OsString]) -> io::Error {
    match argv.split_first() {
        Some((program, args)) => Command::new(program).args(args).exec(),
        None => io::Error::from_raw_os_error(libc::ENOENT),
    }
}

/// Human-readable description of an errno value, as `strerror` prints it.
pub fn strerror(code: i32) -> String {
    let mut buf = [0 as libc::c_char; 256];
    // SAFETY: `buf` is writable for `buf.len()` bytes; the XSI variant
    // NUL-terminates on success.
    let rc = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return format!("Unknown error {code}");
    }
    // SAFETY: `strerror_r` succeeded, so `buf` holds a NUL-terminated string.
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;

    #[test]
    fn test_host_get_returns_valid_pairs() {
        for resource in resources::all() {
            let pair = HostLimits.get(resource).unwrap();
            assert!(pair.is_valid(), "{}: {pair:?}", resource.name);
        }
    }

    #[test]
    fn test_host_set_rejects_soft_above_hard() {
        let core = resources::by_long("core").unwrap();
        let mut host = HostLimits;
        let current = host.get(core).unwrap();
        if current.hard == rlimit_core::RLIM_INFINITY {
            return;
        }
        let err = host
            .set(core, LimitPair::new(current.hard + 1, current.hard))
            .unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
        assert_eq!(host.get(core).unwrap(), current);
    }

    #[test]
    fn test_strerror_text() {
        assert_eq!(strerror(libc::ENOENT), "No such file or directory");
        assert!(!strerror(libc::EPERM).contains("os error"));
    }

    #[test]
    fn test_exec_missing_program() {
        let err = exec(&[OsString::from("/nonexistent/rlimit-test-binary")]);
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = exec(&[]);
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }
}
