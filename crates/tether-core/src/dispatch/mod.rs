//! # Dispatcher
//!
//! The explicit context object every command handler works through.
//!
//! A stub processes one command to completion before reading the next, so the
//! dispatcher is driven through `&mut self` and holds no locks. It owns:
//!
//! - **The backend registry**: exactly one active [`Backend`], installed at startup
//! - **Collaborator hooks**: shadow memory, thread registry, agent notifications
//! - **Session state**: execution mode, waiting flag, general/continue threads,
//!   the currently selected thread, and the diagnostic sink
//!
//! The operations themselves live in the submodules:
//!
//! - [`memory`]: memory access façade with shadow reconciliation
//! - [`control`]: resume/wait orchestration and mode management

pub mod control;
mod guards;
pub mod memory;

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::config::SessionConfig;
use crate::error::{TargetError, TargetResult};
use crate::hooks::{AgentHooks, NoopHooks, ShadowMemory, ThreadRegistry};
use crate::types::{TargetId, ThreadInfo};

/// Execution-control dispatcher
///
/// ## Lifecycle
///
/// 1. Create: `Dispatcher::new(config)`
/// 2. Plug in collaborators: `with_shadow_memory`, `with_thread_registry`, `with_agent_hooks`
/// 3. Install the backend: `install_backend(...)`
/// 4. Hand `&mut dispatcher` to the command loop
///
/// ## Example
///
/// ```rust,no_run
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use tether_core::{Dispatcher, SessionConfig, ShadowTable, Transport};
///
/// # fn backend() -> Box<dyn tether_core::Backend> { unimplemented!() }
/// let shadows = Rc::new(RefCell::new(ShadowTable::new()));
/// let mut dispatcher = Dispatcher::new(SessionConfig::default().with_transport(Transport::Tcp))
///     .with_shadow_memory(Box::new(Rc::clone(&shadows)));
/// dispatcher.install_backend(backend());
/// ```
pub struct Dispatcher
{
    backend: Option<Box<dyn Backend>>,
    shadow: Box<dyn ShadowMemory>,
    threads: Box<dyn ThreadRegistry>,
    agent: Box<dyn AgentHooks>,
    config: SessionConfig,
    non_stop: bool,
    waiting: bool,
    general_thread: TargetId,
    cont_thread: TargetId,
    current_thread: Option<ThreadInfo>,
    diagnostics: Box<dyn Write>,
}

impl Dispatcher
{
    /// Create a dispatcher with no backend and no-op collaborators
    ///
    /// The execution mode starts at `config.non_stop`; diagnostics go to
    /// standard error.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self
    {
        Self {
            backend: None,
            shadow: Box::new(NoopHooks),
            threads: Box::new(NoopHooks),
            agent: Box::new(NoopHooks),
            config,
            non_stop: config.non_stop,
            waiting: false,
            general_thread: TargetId::NO_THREAD,
            cont_thread: TargetId::NO_THREAD,
            current_thread: None,
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Use `shadow` for breakpoint shadow reconciliation
    #[must_use]
    pub fn with_shadow_memory(mut self, shadow: Box<dyn ShadowMemory>) -> Self
    {
        self.shadow = shadow;
        self
    }

    /// Use `threads` for thread lookups
    #[must_use]
    pub fn with_thread_registry(mut self, threads: Box<dyn ThreadRegistry>) -> Self
    {
        self.threads = threads;
        self
    }

    /// Use `agent` for process-teardown notifications
    #[must_use]
    pub fn with_agent_hooks(mut self, agent: Box<dyn AgentHooks>) -> Self
    {
        self.agent = agent;
        self
    }

    /// Redirect exit/termination diagnostics (default: standard error)
    pub fn set_diagnostic_sink(&mut self, sink: Box<dyn Write>)
    {
        self.diagnostics = sink;
    }

    /// Install the active backend
    ///
    /// Meant to be called once at startup. Installing again drops the previous
    /// backend; hot-swapping under a live session is not supported.
    pub fn install_backend(&mut self, backend: Box<dyn Backend>)
    {
        if let Some(previous) = self.backend.replace(backend) {
            warn!("Replacing installed backend '{}'", previous.name());
        }
        if let Some(installed) = self.backend.as_deref() {
            debug!("Installed backend '{}'", installed.name());
        }
    }

    /// `true` once a backend has been installed
    #[must_use]
    pub fn has_backend(&self) -> bool
    {
        self.backend.is_some()
    }

    pub(crate) fn backend_mut(&mut self) -> TargetResult<&mut dyn Backend>
    {
        match self.backend.as_deref_mut() {
            Some(backend) => Ok(backend),
            None => Err(TargetError::NoBackend),
        }
    }

    /// Session configuration the dispatcher was built with
    #[must_use]
    pub fn config(&self) -> &SessionConfig
    {
        &self.config
    }

    /// `true` in non-stop mode, `false` in all-stop mode
    #[must_use]
    pub fn is_non_stop(&self) -> bool
    {
        self.non_stop
    }

    /// `true` while a connected wait is blocked inside the backend
    ///
    /// Surrounding I/O code uses this to decide whether to service other
    /// requests (e.g. an interrupt from the remote debugger).
    #[must_use]
    pub fn is_waiting(&self) -> bool
    {
        self.waiting
    }

    /// Thread the protocol layer selected for general operations (`Hg`)
    #[must_use]
    pub fn general_thread(&self) -> TargetId
    {
        self.general_thread
    }

    /// Record the thread selected for general operations
    pub fn set_general_thread(&mut self, id: TargetId)
    {
        self.general_thread = id;
    }

    /// Thread the protocol layer selected for continue/step (`Hc`)
    #[must_use]
    pub fn cont_thread(&self) -> TargetId
    {
        self.cont_thread
    }

    /// Record the thread selected for continue/step
    pub fn set_cont_thread(&mut self, id: TargetId)
    {
        self.cont_thread = id;
    }

    /// Thread made current by the last [`select_current_thread`](Self::select_current_thread)
    #[must_use]
    pub fn current_thread(&self) -> Option<&ThreadInfo>
    {
        self.current_thread.as_ref()
    }

    /// Make the general (`use_general = true`) or continue thread current
    ///
    /// Looks the selected id up in the thread registry and stores the result as
    /// the current thread, clearing it when the lookup fails. Returns whether a
    /// thread was found. Nothing is resumed or suspended.
    pub fn select_current_thread(&mut self, use_general: bool) -> bool
    {
        let wanted = if use_general { self.general_thread } else { self.cont_thread };
        self.current_thread = self.threads.find_thread(wanted);
        if self.current_thread.is_none() {
            debug!("No thread found for {wanted}");
        }
        self.current_thread.is_some()
    }
}

impl fmt::Debug for Dispatcher
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Dispatcher")
            .field("backend", &self.backend.as_deref().map(|backend| backend.name()))
            .field("config", &self.config)
            .field("non_stop", &self.non_stop)
            .field("waiting", &self.waiting)
            .field("general_thread", &self.general_thread)
            .field("cont_thread", &self.cont_thread)
            .field("current_thread", &self.current_thread)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    struct OneThread(TargetId);

    impl ThreadRegistry for OneThread
    {
        fn find_thread(&self, id: TargetId) -> Option<ThreadInfo>
        {
            (id == self.0).then(|| ThreadInfo::new(id))
        }
    }

    #[test]
    fn test_new_dispatcher_has_no_backend()
    {
        let mut dispatcher = Dispatcher::new(SessionConfig::default());
        assert!(!dispatcher.has_backend());
        assert!(matches!(dispatcher.backend_mut(), Err(TargetError::NoBackend)));
    }

    #[test]
    fn test_initial_mode_comes_from_config()
    {
        let dispatcher = Dispatcher::new(SessionConfig::default().with_non_stop(true));
        assert!(dispatcher.is_non_stop());
        assert!(!dispatcher.is_waiting());
    }

    #[test]
    fn test_select_current_thread_general_vs_cont()
    {
        let thread = TargetId::new(10, 11, 0);
        let mut dispatcher = Dispatcher::new(SessionConfig::default()).with_thread_registry(Box::new(OneThread(thread)));

        dispatcher.set_general_thread(thread);
        dispatcher.set_cont_thread(TargetId::new(10, 12, 0));

        assert!(dispatcher.select_current_thread(true));
        assert_eq!(dispatcher.current_thread().map(|t| t.id), Some(thread));

        // Failed lookup clears the current thread
        assert!(!dispatcher.select_current_thread(false));
        assert!(dispatcher.current_thread().is_none());
    }
}
