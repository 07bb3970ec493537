//! Process/thread identity and its diagnostic rendering.

use std::fmt;

/// Process/thread identifier triple
///
/// A `TargetId` names either a whole process or one thread inside it. Backends
/// fill in exactly one of the two thread components: ptrace-style backends use
/// the kernel LWP id, thread-library or simulator backends use an opaque thread
/// id. The unused component is zero.
///
/// Two sentinels exist:
/// - [`TargetId::ALL_THREADS`]: wildcard for every process and thread
/// - [`TargetId::NO_THREAD`]: the null/unset identifier
///
/// Values are immutable and compare structurally.
///
/// ## Example
///
/// ```rust
/// use tether_core::types::TargetId;
///
/// let thread = TargetId::new(42, 43, 0);
/// assert_eq!(thread.pid(), 42);
/// assert_eq!(thread.to_string(), "LWP 42.43");
/// assert_eq!(TargetId::ALL_THREADS.to_string(), "<all threads>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId
{
    pid: i32,
    lwp: i64,
    tid: u64,
}

impl TargetId
{
    /// Wildcard matching every process and thread
    pub const ALL_THREADS: Self = Self::new(-1, 0, 0);

    /// Null identifier ("no thread selected")
    pub const NO_THREAD: Self = Self::new(0, 0, 0);

    /// Build an identifier from its three components
    #[must_use]
    pub const fn new(pid: i32, lwp: i64, tid: u64) -> Self
    {
        Self { pid, lwp, tid }
    }

    /// Identifier naming a whole process
    #[must_use]
    pub const fn process(pid: i32) -> Self
    {
        Self::new(pid, 0, 0)
    }

    /// Process component
    #[must_use]
    pub const fn pid(self) -> i32
    {
        self.pid
    }

    /// Lightweight-process (kernel thread) component
    #[must_use]
    pub const fn lwp(self) -> i64
    {
        self.lwp
    }

    /// Thread-library / backend thread component
    #[must_use]
    pub const fn tid(self) -> u64
    {
        self.tid
    }

    /// `true` for the [`TargetId::ALL_THREADS`] wildcard
    #[must_use]
    pub fn is_all_threads(self) -> bool
    {
        self == Self::ALL_THREADS
    }

    /// `true` for the [`TargetId::NO_THREAD`] sentinel
    #[must_use]
    pub fn is_null(self) -> bool
    {
        self == Self::NO_THREAD
    }

    /// `true` if this identifier names a whole process rather than one thread
    #[must_use]
    pub fn is_process_wide(self) -> bool
    {
        self.lwp == 0 && self.tid == 0
    }

    /// Check whether `other` falls under this identifier used as a filter
    ///
    /// The wildcard matches everything, a process-wide id matches every thread
    /// of that process, and any other id only matches itself.
    ///
    /// ```rust
    /// use tether_core::types::TargetId;
    ///
    /// let thread = TargetId::new(7, 8, 0);
    /// assert!(TargetId::ALL_THREADS.matches(thread));
    /// assert!(TargetId::process(7).matches(thread));
    /// assert!(!TargetId::process(9).matches(thread));
    /// assert!(!thread.matches(TargetId::new(7, 9, 0)));
    /// ```
    #[must_use]
    pub fn matches(self, other: TargetId) -> bool
    {
        if self.is_all_threads() {
            true
        } else if self.is_process_wide() {
            self.pid == other.pid
        } else {
            self == other
        }
    }
}

/// Render an identifier as human-readable diagnostic text
///
/// Checks run in a fixed order because several components may be non-zero at
/// once: the two sentinels first, then the thread component, then the LWP,
/// and finally the bare process.
///
/// This is diagnostic text, not a wire format.
#[must_use]
pub fn format_target_id(id: TargetId) -> String
{
    id.to_string()
}

impl fmt::Display for TargetId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        if self.is_all_threads() {
            f.write_str("<all threads>")
        } else if self.is_null() {
            f.write_str("<null thread>")
        } else if self.tid != 0 {
            write!(f, "Thread {}.0x{:x}", self.pid, self.tid)
        } else if self.lwp != 0 {
            write!(f, "LWP {}.{}", self.pid, self.lwp)
        } else {
            write!(f, "Process {}", self.pid)
        }
    }
}

/// Thread descriptor handed out by a [`ThreadRegistry`](crate::hooks::ThreadRegistry)
///
/// The dispatcher never creates or destroys threads; it only remembers which
/// descriptor the registry returned for the currently selected thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo
{
    /// Identifier the registry knows this thread by
    pub id: TargetId,
    /// Optional human-readable name (e.g. from `/proc/<pid>/task/<tid>/comm`)
    pub name: Option<String>,
}

impl ThreadInfo
{
    /// Create a descriptor without a name
    #[must_use]
    pub fn new(id: TargetId) -> Self
    {
        Self { id, name: None }
    }

    /// Attach a human-readable name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self
    {
        self.name = Some(name.into());
        self
    }
}
