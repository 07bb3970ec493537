//! # Error Types
//!
//! Error handling for the dispatch layer.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::Address;

/// Main error type for dispatch operations
///
/// Each variant corresponds to a failure reported by the backend or a
/// condition detected by the dispatcher itself. The dispatcher never retries
/// and never masks a backend verdict: whatever the backend returns is what the
/// caller sees, except for the normalizations documented on the individual
/// operations.
///
/// ## Error Categories
///
/// 1. **Registry errors**: NoBackend
/// 2. **Backend failures**: MemoryFault, ResumeFailed, WaitFailed, KillFailed, NonStopFailed
/// 3. **Capability absence**: NonStopUnsupported
/// 4. **Argument errors**: InvalidArgument, InvalidConfig
/// 5. **I/O errors**: Io
#[derive(Error, Debug)]
pub enum TargetError
{
    /// No backend has been installed yet
    ///
    /// Every operation that delegates to the backend fails with this error
    /// until [`Dispatcher::install_backend`](crate::Dispatcher::install_backend)
    /// has been called.
    #[error("No execution backend installed")]
    NoBackend,

    /// The backend could not access target memory
    ///
    /// Typical causes are unmapped pages, protection faults, or a target that
    /// exited between the request and the access.
    #[error("Memory fault accessing {length} bytes at {address}")]
    MemoryFault
    {
        /// Start of the faulting access
        address: Address,
        /// Number of bytes requested
        length: usize,
    },

    /// The backend failed to resume (or stop) one or more threads
    #[error("Failed to resume target: {0}")]
    ResumeFailed(String),

    /// The backend's wait primitive failed
    #[error("Failed to wait for target: {0}")]
    WaitFailed(String),

    /// The backend failed to kill the process
    #[error("Failed to kill process {pid}: {reason}")]
    KillFailed
    {
        /// Process that should have been killed
        pid: i32,
        /// Backend-supplied reason
        reason: String,
    },

    /// Non-stop mode was requested but the backend has no non-stop support
    ///
    /// This is deliberately separate from [`TargetError::NonStopFailed`]:
    /// "not supported" and "failed while attempting" are different answers.
    #[error("Non-stop mode is not supported by this backend")]
    NonStopUnsupported,

    /// The backend supports non-stop mode but switching failed
    #[error("Failed to change non-stop mode: {0}")]
    NonStopFailed(String),

    /// Invalid argument passed to a dispatcher or shadow-table function
    ///
    /// Examples:
    /// - Trap and shadow byte sequences of different lengths
    /// - An address range that wraps around the address space
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A session configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (diagnostic sink, backend transport, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, TargetError>`
///
/// ```rust
/// use tether_core::error::TargetResult;
/// fn foo() -> TargetResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type TargetResult<T> = std::result::Result<T, TargetError>;
