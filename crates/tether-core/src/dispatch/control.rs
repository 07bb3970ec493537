//! # Execution Control
//!
//! Resume/wait orchestration built on the backend's two primitives, plus
//! status normalization and execution-mode management.
//!
//! ## Status normalization
//!
//! Backends may report kinds that only make sense internally (currently
//! [`WaitStatus::Loaded`]). [`Dispatcher::wait_for_event`] runs every status
//! through [`WaitStatus::normalize`] before returning, so the protocol layer
//! only ever sees the public kinds.
//!
//! ## Execution mode
//!
//! The dispatcher tracks all-stop vs non-stop mode. [`Dispatcher::stop_and_wait_synchronously`]
//! temporarily forces non-stop so its wait only looks at the thread it
//! stopped, then restores whatever mode the session was in.

use std::io::Write;

use tracing::{debug, warn};

use super::guards::{FlagGuard, NonStopOverride};
use super::Dispatcher;
use crate::error::{TargetError, TargetResult};
use crate::types::{ResumeRequest, Signal, TargetId, WaitOptions, WaitStatus};

impl Dispatcher
{
    /// Wait for `target` to change state
    ///
    /// When `connected` is set, [`is_waiting`](Self::is_waiting) reports `true`
    /// for the duration of the backend call. The returned status has already
    /// been normalized (`Loaded` becomes `Stopped`, payload kept).
    ///
    /// Unless the session runs over stdio, an exit or fatal signal is also
    /// announced on the diagnostic sink, since the stub most likely owns its
    /// own console in that case.
    ///
    /// This is the only call in the dispatcher that may block indefinitely. It
    /// cannot be cancelled from here; an interrupt from the remote side makes
    /// the *next* wait return promptly instead.
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `WaitFailed`: the backend's wait failed
    pub fn wait_for_event(&mut self, target: TargetId, options: WaitOptions, connected: bool) -> TargetResult<(TargetId, WaitStatus)>
    {
        let non_stop = self.non_stop;
        let backend = match self.backend.as_deref_mut() {
            Some(backend) => backend,
            None => return Err(TargetError::NoBackend),
        };
        let _waiting = if connected { Some(FlagGuard::set(&mut self.waiting, true)) } else { None };

        let (id, raw) = backend.wait(target, options, non_stop)?;
        let status = raw.normalize();
        debug!("wait({target}) -> {id}: {status:?}");

        let Some(line) = status.exit_diagnostic().filter(|_| !self.config.transport.is_simple_stream()) else {
            return Ok((id, status));
        };
        if let Err(err) = self.diagnostics.write_all(line.as_bytes()).and_then(|()| self.diagnostics.flush()) {
            warn!("Failed to write exit diagnostic: {err}");
        }

        Ok((id, status))
    }

    /// Stop `target` and wait until the stop has been reported
    ///
    /// Issues a `Stop` request, then waits with the execution mode forced to
    /// non-stop so the wait does not look for "all threads" under all-stop
    /// semantics. The resulting status is discarded. The session's mode is
    /// restored afterwards on every path, including a failing wait.
    ///
    /// Must not be called re-entrantly (e.g. from inside a backend callback).
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `ResumeFailed`: the stop request failed (mode untouched)
    /// - `WaitFailed`: the wait failed (mode restored)
    pub fn stop_and_wait_synchronously(&mut self, target: TargetId) -> TargetResult<()>
    {
        debug!("Stopping {target} synchronously");
        self.backend_mut()?.resume(&[ResumeRequest::stop(target)])?;

        let mut scoped = NonStopOverride::new(self, true);
        scoped.wait_for_event(target, WaitOptions::NONE, false)?;
        Ok(())
    }

    /// Continue `target` without delivering a signal
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `ResumeFailed`: the backend could not resume `target`
    pub fn continue_without_signal(&mut self, target: TargetId) -> TargetResult<()>
    {
        self.backend_mut()?.resume(&[ResumeRequest::continue_with(target, Signal::NONE)])
    }

    /// Apply a batch of resume requests as-is
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `ResumeFailed`: the backend rejected the batch
    pub fn resume(&mut self, requests: &[ResumeRequest]) -> TargetResult<()>
    {
        self.backend_mut()?.resume(requests)
    }

    /// Switch between non-stop (`true`) and all-stop (`false`) mode
    ///
    /// Backends without non-stop support are always in all-stop mode, so
    /// disabling succeeds trivially while enabling fails with
    /// `NonStopUnsupported`. On success the dispatcher's mode follows.
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `NonStopUnsupported`: enabling on a backend without the capability
    /// - `NonStopFailed`: the backend tried and failed
    pub fn set_non_stop_mode(&mut self, enable: bool) -> TargetResult<()>
    {
        match self.backend_mut()?.non_stop() {
            Some(ops) => ops.start_non_stop(enable)?,
            None if enable => return Err(TargetError::NonStopUnsupported),
            None => {}
        }
        self.non_stop = enable;
        Ok(())
    }

    /// [`set_non_stop_mode`](Self::set_non_stop_mode) with the classic `0` / `-1` result
    pub fn set_non_stop_mode_raw(&mut self, enable: bool) -> i32
    {
        match self.set_non_stop_mode(enable) {
            Ok(()) => 0,
            Err(err) => {
                debug!("set_non_stop_mode({enable}) failed: {err}");
                -1
            }
        }
    }

    /// Kill process `pid`
    ///
    /// The agent hook is told the process is going away before the backend
    /// kills it.
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `KillFailed`: the backend could not kill the process
    pub fn terminate(&mut self, pid: i32) -> TargetResult<()>
    {
        let backend = match self.backend.as_deref_mut() {
            Some(backend) => backend,
            None => return Err(TargetError::NoBackend),
        };
        self.agent.notify_process_closing(pid);
        debug!("Killing process {pid}");
        backend.kill(pid)
    }

    /// Whether the target can single-step in hardware
    ///
    /// Every supported backend can; callers still go through this query so a
    /// backend-dependent answer can be introduced without touching them.
    #[must_use]
    pub fn supports_hardware_single_step(&self) -> bool
    {
        true
    }
}
