//! Wait statuses, signals and the status-kind translation table.

use std::fmt;

use super::TargetId;

/// Host signal number
///
/// Backends report signals using host numbering (the values `waitpid` hands
/// back on the machine running the stub). [`Signal::NONE`] means "no signal".
///
/// ## Example
///
/// ```rust
/// use tether_core::types::Signal;
///
/// let sig = Signal::from(libc::SIGSEGV);
/// assert_eq!(sig.name(), "SIGSEGV");
/// assert!(Signal::NONE.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signal(pub i32);

impl Signal
{
    /// No signal to deliver / no signal reported
    pub const NONE: Self = Signal(0);

    /// Raw host signal number
    #[must_use]
    pub const fn raw(self) -> i32
    {
        self.0
    }

    /// `true` for [`Signal::NONE`]
    #[must_use]
    pub const fn is_none(self) -> bool
    {
        self.0 == 0
    }

    /// Conventional `SIGxxx` name for this signal, or `"unknown"`
    #[must_use]
    pub fn name(self) -> &'static str
    {
        signal_name(self.0)
    }
}

impl From<i32> for Signal
{
    fn from(value: i32) -> Self
    {
        Signal(value)
    }
}

impl fmt::Display for Signal
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

#[cfg(unix)]
fn signal_name(signo: i32) -> &'static str
{
    match signo {
        0 => "0",
        libc::SIGHUP => "SIGHUP",
        libc::SIGINT => "SIGINT",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGILL => "SIGILL",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGABRT => "SIGABRT",
        libc::SIGBUS => "SIGBUS",
        libc::SIGFPE => "SIGFPE",
        libc::SIGKILL => "SIGKILL",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGUSR2 => "SIGUSR2",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGALRM => "SIGALRM",
        libc::SIGTERM => "SIGTERM",
        libc::SIGCHLD => "SIGCHLD",
        libc::SIGCONT => "SIGCONT",
        libc::SIGSTOP => "SIGSTOP",
        libc::SIGTSTP => "SIGTSTP",
        libc::SIGTTIN => "SIGTTIN",
        libc::SIGTTOU => "SIGTTOU",
        libc::SIGURG => "SIGURG",
        libc::SIGXCPU => "SIGXCPU",
        libc::SIGXFSZ => "SIGXFSZ",
        libc::SIGVTALRM => "SIGVTALRM",
        libc::SIGPROF => "SIGPROF",
        libc::SIGWINCH => "SIGWINCH",
        libc::SIGIO => "SIGIO",
        libc::SIGSYS => "SIGSYS",
        _ => "unknown",
    }
}

#[cfg(not(unix))]
fn signal_name(signo: i32) -> &'static str
{
    match signo {
        0 => "0",
        libc::SIGINT => "SIGINT",
        libc::SIGILL => "SIGILL",
        libc::SIGABRT => "SIGABRT",
        libc::SIGFPE => "SIGFPE",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGTERM => "SIGTERM",
        _ => "unknown",
    }
}

/// Category of a target state change, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitKind
{
    /// Thread stopped, usually because of a signal
    Stopped,
    /// Process exited normally
    Exited,
    /// Process was terminated by a signal
    Signalled,
    /// Backend-internal: a shared library / module was loaded
    Loaded,
    /// Process forked
    Forked,
    /// Process vforked
    Vforked,
    /// Process called exec
    Execd,
    /// Event with no meaning to the debugger (e.g. a swallowed internal stop)
    Spurious,
    /// Event the caller should ignore and wait again
    Ignore,
    /// No resumed threads remain to wait for
    NoResumed,
}

/// Status-kind translation table applied to every wait result
///
/// Each entry maps a backend-reported kind to the kind the rest of the stub
/// sees. Kinds not listed pass through unchanged. `Loaded` exists only so
/// backends can note library loads internally; the protocol layer learns about
/// those through a separate channel and must see a plain stop.
pub const KIND_TRANSLATIONS: &[(WaitKind, WaitKind)] = &[(WaitKind::Loaded, WaitKind::Stopped)];

impl WaitKind
{
    /// Apply [`KIND_TRANSLATIONS`] to this kind
    ///
    /// ```rust
    /// use tether_core::types::WaitKind;
    ///
    /// assert_eq!(WaitKind::Loaded.normalized(), WaitKind::Stopped);
    /// assert_eq!(WaitKind::Exited.normalized(), WaitKind::Exited);
    /// ```
    #[must_use]
    pub fn normalized(self) -> Self
    {
        KIND_TRANSLATIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map_or(self, |(_, to)| *to)
    }
}

/// Target state change reported by a backend's wait primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitStatus
{
    /// Stopped with the given signal (`Signal::NONE` for a plain stop)
    Stopped(Signal),
    /// Exited with the given exit code
    Exited(i32),
    /// Terminated by the given signal
    Signalled(Signal),
    /// Backend-internal library-load stop; never escapes the dispatcher
    Loaded(Signal),
    /// Forked; payload is the child
    Forked(TargetId),
    /// Vforked; payload is the child
    Vforked(TargetId),
    /// Exec'd the given path
    Execd(String),
    /// Spurious wakeup
    Spurious,
    /// Nothing interesting happened
    Ignore,
    /// Nothing left running to wait for
    NoResumed,
}

impl WaitStatus
{
    /// Payload-free kind of this status
    #[must_use]
    pub fn kind(&self) -> WaitKind
    {
        match self {
            Self::Stopped(_) => WaitKind::Stopped,
            Self::Exited(_) => WaitKind::Exited,
            Self::Signalled(_) => WaitKind::Signalled,
            Self::Loaded(_) => WaitKind::Loaded,
            Self::Forked(_) => WaitKind::Forked,
            Self::Vforked(_) => WaitKind::Vforked,
            Self::Execd(_) => WaitKind::Execd,
            Self::Spurious => WaitKind::Spurious,
            Self::Ignore => WaitKind::Ignore,
            Self::NoResumed => WaitKind::NoResumed,
        }
    }

    /// Apply the kind translation table, keeping the payload
    ///
    /// ```rust
    /// use tether_core::types::{Signal, WaitStatus};
    ///
    /// let status = WaitStatus::Loaded(Signal::NONE).normalize();
    /// assert_eq!(status, WaitStatus::Stopped(Signal::NONE));
    /// ```
    #[must_use]
    pub fn normalize(self) -> Self
    {
        match (self.kind().normalized(), self) {
            (WaitKind::Stopped, Self::Loaded(sig)) => Self::Stopped(sig),
            (_, status) => status,
        }
    }

    /// Diagnostic line for terminal statuses, as printed on the stub's console
    ///
    /// Returns `None` for statuses that do not end the inferior.
    #[must_use]
    pub fn exit_diagnostic(&self) -> Option<String>
    {
        match self {
            Self::Exited(code) => Some(format!("\nChild exited with status {code}\n")),
            Self::Signalled(sig) => Some(format!("\nChild terminated with signal = 0x{:x} ({})\n", sig.raw(), sig.name())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_translation_table_only_touches_loaded()
    {
        let kinds = [
            WaitKind::Stopped,
            WaitKind::Exited,
            WaitKind::Signalled,
            WaitKind::Forked,
            WaitKind::Vforked,
            WaitKind::Execd,
            WaitKind::Spurious,
            WaitKind::Ignore,
            WaitKind::NoResumed,
        ];
        for kind in kinds {
            assert_eq!(kind.normalized(), kind);
        }
        assert_eq!(WaitKind::Loaded.normalized(), WaitKind::Stopped);
    }

    #[test]
    fn test_normalize_keeps_payload()
    {
        let sig = Signal(libc::SIGTRAP);
        assert_eq!(WaitStatus::Loaded(sig).normalize(), WaitStatus::Stopped(sig));
        assert_eq!(WaitStatus::Exited(3).normalize(), WaitStatus::Exited(3));
        assert_eq!(
            WaitStatus::Execd("/bin/true".to_string()).normalize(),
            WaitStatus::Execd("/bin/true".to_string())
        );
    }

    #[test]
    fn test_exit_diagnostic_text()
    {
        assert_eq!(
            WaitStatus::Exited(1).exit_diagnostic().as_deref(),
            Some("\nChild exited with status 1\n")
        );
        let killed = WaitStatus::Signalled(Signal(libc::SIGKILL)).exit_diagnostic().unwrap();
        assert_eq!(killed, format!("\nChild terminated with signal = 0x{:x} (SIGKILL)\n", libc::SIGKILL));
        assert!(WaitStatus::Stopped(Signal::NONE).exit_diagnostic().is_none());
    }

    #[test]
    fn test_signal_names()
    {
        assert_eq!(Signal(libc::SIGTRAP).name(), "SIGTRAP");
        assert_eq!(Signal(9999).name(), "unknown");
        assert_eq!(Signal::NONE.to_string(), "0");
    }
}
