//! Resource kinds known to this platform, in listing order.
//!
//! Entries are gated on the target so the table only names resources the
//! host C library defines.

/// The integer type `getrlimit`/`setrlimit` take for the resource argument.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub type RawResource = libc::__rlimit_resource_t;

/// The integer type `getrlimit`/`setrlimit` take for the resource argument.
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
pub type RawResource = libc::c_int;

/// A resource limit the tool can query and set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// `RLIMIT_*` identifier.
    pub id: RawResource,
    /// Label used in reports.
    pub name: &'static str,
    /// Long option, without the leading `--`.
    pub long: &'static str,
    /// Short option character.
    pub short: char,
}

const fn kind(id: RawResource, name: &'static str, long: &'static str, short: char) -> ResourceKind {
    ResourceKind {
        id,
        name,
        long,
        short,
    }
}

static RESOURCES: &[ResourceKind] = &[
    kind(libc::RLIMIT_AS, "Address Space", "address-space", 'a'),
    kind(libc::RLIMIT_CORE, "Core Size", "core", 'C'),
    kind(libc::RLIMIT_CPU, "CPU Time", "cpu", 'c'),
    kind(libc::RLIMIT_DATA, "Data Segment Size", "data", 'd'),
    kind(libc::RLIMIT_FSIZE, "File Size", "file-size", 'f'),
    #[cfg(any(target_os = "linux", target_os = "android"))]
    kind(libc::RLIMIT_LOCKS, "File Locks", "locks", 'l'),
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    kind(libc::RLIMIT_MEMLOCK, "Locked Memory", "mem-lock", 'L'),
    #[cfg(any(target_os = "linux", target_os = "android"))]
    kind(libc::RLIMIT_MSGQUEUE, "Message Queue", "message-queue", 'q'),
    #[cfg(any(target_os = "linux", target_os = "android"))]
    kind(libc::RLIMIT_NICE, "Nice", "nice", 'n'),
    kind(libc::RLIMIT_NOFILE, "File Descriptors", "file-descriptors", 'D'),
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    kind(libc::RLIMIT_NPROC, "Processes", "processes", 'p'),
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    kind(libc::RLIMIT_RSS, "Resident Set", "resident-set", 'r'),
    #[cfg(any(target_os = "linux", target_os = "android"))]
    kind(libc::RLIMIT_RTPRIO, "Real-Time Priority", "rt-priority", 'R'),
    #[cfg(any(target_os = "linux", target_os = "android"))]
    kind(libc::RLIMIT_RTTIME, "Real-Time CPU Time", "rt-time", 'T'),
    #[cfg(any(target_os = "linux", target_os = "android"))]
    kind(libc::RLIMIT_SIGPENDING, "Pending Signals", "pending-signals", 'S'),
    kind(libc::RLIMIT_STACK, "Stack Size", "stack", 's'),
];

/// Every resource supported on this platform.
#[inline]
pub fn all() -> &'static [ResourceKind] {
    RESOURCES
}

/// Look up a resource by its long option name.
pub fn by_long(name: &str) -> Option<&'static ResourceKind> {
    RESOURCES.iter().find(|r| r.long == name)
}

/// Look up a resource by its short option character.
pub fn by_short(c: char) -> Option<&'static ResourceKind> {
    RESOURCES.iter().find(|r| r.short == c)
}
