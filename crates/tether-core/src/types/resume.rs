//! Resume requests and wait options.

use std::ops::{BitOr, BitOrAssign};

use super::{Signal, TargetId};

/// How a thread should be resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeKind
{
    /// Stop the thread (non-stop mode interrupt)
    Stop,
    /// Continue until the next event
    Continue,
    /// Execute a single instruction
    Step,
}

/// One entry of a resume batch handed to [`Backend::resume`](crate::Backend::resume)
///
/// Requests are built per call and never stored by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResumeRequest
{
    /// Thread, process or wildcard the request applies to
    pub target: TargetId,
    /// What to do with it
    pub kind: ResumeKind,
    /// Signal to deliver on resume (`Signal::NONE` for none)
    pub signal: Signal,
}

impl ResumeRequest
{
    /// Request that `target` be stopped
    #[must_use]
    pub const fn stop(target: TargetId) -> Self
    {
        Self {
            target,
            kind: ResumeKind::Stop,
            signal: Signal::NONE,
        }
    }

    /// Request that `target` continue, delivering `signal`
    #[must_use]
    pub const fn continue_with(target: TargetId, signal: Signal) -> Self
    {
        Self {
            target,
            kind: ResumeKind::Continue,
            signal,
        }
    }

    /// Request that `target` single-step, delivering `signal`
    #[must_use]
    pub const fn step(target: TargetId, signal: Signal) -> Self
    {
        Self {
            target,
            kind: ResumeKind::Step,
            signal,
        }
    }
}

/// Option bits for [`Backend::wait`](crate::Backend::wait)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct WaitOptions(u32);

impl WaitOptions
{
    /// Block until an event arrives
    pub const NONE: Self = Self(0);
    /// Return immediately (with `WaitStatus::Ignore`) if nothing is pending
    pub const NO_HANG: Self = Self(1 << 0);

    /// Raw option bits
    #[must_use]
    pub const fn bits(self) -> u32
    {
        self.0
    }

    /// `true` if every bit of `other` is set in `self`
    #[must_use]
    pub const fn contains(self, other: Self) -> bool
    {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for WaitOptions
{
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output
    {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WaitOptions
{
    fn bitor_assign(&mut self, rhs: Self)
    {
        self.0 |= rhs.0;
    }
}
