//! # Backend Capability Set
//!
//! The interface a concrete execution backend implements.
//!
//! A backend knows how to talk to whatever is actually being debugged:
//!
//! - **Native process control**: `ptrace` on Linux, Mach on macOS
//! - **Simulators**: an instruction-set simulator running in-process
//! - **Other operating systems**: a kernel or hypervisor debug agent
//!
//! The dispatcher only ever sees this trait. It installs exactly one backend
//! at startup and routes every memory and execution request through it.
//!
//! ## Required vs optional capabilities
//!
//! Memory access, resume, wait and kill are required. Optional capabilities
//! are exposed through accessor methods returning `Option<&mut dyn ...>`, with
//! a default of `None`. That keeps "the backend does not support this"
//! distinguishable from "the backend tried and failed": the former is `None`,
//! the latter an `Err` from the capability itself.

use crate::error::TargetResult;
use crate::types::{Address, ResumeRequest, TargetId, WaitOptions, WaitStatus};

/// Execution backend interface
///
/// ## Thread Safety
///
/// Backends are driven from the single command-processing thread of the stub
/// and are not required to be `Send` or `Sync`. A backend may use OS threads or
/// signal handlers internally; that concurrency stays behind this trait.
pub trait Backend
{
    /// Short name used in log output
    fn name(&self) -> &str
    {
        "backend"
    }

    /// Fill `buf` with target memory starting at `addr`
    ///
    /// ## Errors
    ///
    /// - `MemoryFault`: some or all of the range could not be read
    fn read_memory(&mut self, addr: Address, buf: &mut [u8]) -> TargetResult<()>;

    /// Write `data` to target memory starting at `addr`
    ///
    /// ## Errors
    ///
    /// - `MemoryFault`: some or all of the range could not be written
    fn write_memory(&mut self, addr: Address, data: &[u8]) -> TargetResult<()>;

    /// Wait for a state change of `target`
    ///
    /// `target` may be a single thread, a whole process or
    /// [`TargetId::ALL_THREADS`]. `non_stop` carries the session's current
    /// execution mode: under all-stop semantics a backend reporting an event
    /// for one thread is expected to stop every other thread first.
    ///
    /// Returns the identifier of the thread that reported the event along with
    /// its raw status. The status may use backend-internal kinds such as
    /// [`WaitStatus::Loaded`]; the dispatcher normalizes those away.
    ///
    /// ## Errors
    ///
    /// - `WaitFailed`: the underlying wait primitive failed
    fn wait(&mut self, target: TargetId, options: WaitOptions, non_stop: bool) -> TargetResult<(TargetId, WaitStatus)>;

    /// Apply a batch of resume requests
    ///
    /// ## Errors
    ///
    /// - `ResumeFailed`: one or more threads could not be resumed or stopped
    fn resume(&mut self, requests: &[ResumeRequest]) -> TargetResult<()>;

    /// Kill process `pid`
    ///
    /// ## Errors
    ///
    /// - `KillFailed`: the process could not be killed
    fn kill(&mut self, pid: i32) -> TargetResult<()>;

    /// Optional non-stop mode support
    ///
    /// Backends without non-stop support keep the default `None`.
    fn non_stop(&mut self) -> Option<&mut dyn NonStopOps>
    {
        None
    }
}

/// Optional capability: switch between all-stop and non-stop execution
pub trait NonStopOps
{
    /// Enable (`true`) or disable (`false`) non-stop mode
    ///
    /// ## Errors
    ///
    /// - `NonStopFailed`: the backend could not switch modes
    fn start_non_stop(&mut self, enable: bool) -> TargetResult<()>;
}
