//! Collaborator hooks consumed by the dispatcher.
//!
//! The dispatcher does not own breakpoint bookkeeping, thread bookkeeping or
//! the tracing agent. It reaches them through the traits in this module. Each
//! trait has a no-op implementation so a session can be built before (or
//! without) the real collaborator.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::{Address, TargetId, ThreadInfo};

/// Software-breakpoint shadow reconciliation
///
/// Software breakpoints replace program bytes with trap instructions. Every
/// memory access made through the dispatcher passes through these two hooks so
/// that neither side ever observes the injected traps.
pub trait ShadowMemory
{
    /// Patch freshly read bytes in place
    ///
    /// `buf` holds target memory starting at `addr`. Any byte currently covered
    /// by an inserted software breakpoint must be replaced with the original
    /// program byte the breakpoint is shadowing.
    fn on_memory_read(&mut self, addr: Address, buf: &mut [u8]);

    /// Patch outgoing bytes in place before they reach the target
    ///
    /// `new_bytes` starts as a copy of `original` (the caller's data). For any
    /// byte covered by an inserted software breakpoint, the hook records the
    /// caller's byte as the new shadow and writes the trap byte into
    /// `new_bytes`, so the breakpoint survives the write.
    fn on_memory_write(&mut self, addr: Address, new_bytes: &mut [u8], original: &[u8]);
}

/// Thread lookup
pub trait ThreadRegistry
{
    /// Find the thread with identifier `id`
    fn find_thread(&self, id: TargetId) -> Option<ThreadInfo>;
}

/// Tracing / in-process agent notifications
pub trait AgentHooks
{
    /// Process `pid` is about to be killed
    ///
    /// Best effort: called before the backend's kill, its outcome does not
    /// affect the kill.
    fn notify_process_closing(&mut self, pid: i32);
}

/// Collaborator that does nothing
///
/// Used as the default for every hook: no breakpoints to reconcile, no known
/// threads, no agent to notify.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl ShadowMemory for NoopHooks
{
    fn on_memory_read(&mut self, _addr: Address, _buf: &mut [u8]) {}

    fn on_memory_write(&mut self, _addr: Address, _new_bytes: &mut [u8], _original: &[u8]) {}
}

impl ThreadRegistry for NoopHooks
{
    fn find_thread(&self, _id: TargetId) -> Option<ThreadInfo>
    {
        None
    }
}

impl AgentHooks for NoopHooks
{
    fn notify_process_closing(&mut self, _pid: i32) {}
}

// Shared collaborators: the breakpoint layer keeps inserting into the same
// shadow table the dispatcher reconciles through, and the thread layer keeps
// updating the registry the dispatcher looks threads up in.

impl<T: ShadowMemory + ?Sized> ShadowMemory for Rc<RefCell<T>>
{
    fn on_memory_read(&mut self, addr: Address, buf: &mut [u8])
    {
        self.borrow_mut().on_memory_read(addr, buf);
    }

    fn on_memory_write(&mut self, addr: Address, new_bytes: &mut [u8], original: &[u8])
    {
        self.borrow_mut().on_memory_write(addr, new_bytes, original);
    }
}

impl<T: ThreadRegistry + ?Sized> ThreadRegistry for Rc<RefCell<T>>
{
    fn find_thread(&self, id: TargetId) -> Option<ThreadInfo>
    {
        self.borrow().find_thread(id)
    }
}

impl<T: AgentHooks + ?Sized> AgentHooks for Rc<RefCell<T>>
{
    fn notify_process_closing(&mut self, pid: i32)
    {
        self.borrow_mut().notify_process_closing(pid);
    }
}
