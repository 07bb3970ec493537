//! # tether-core
//!
//! Execution-control dispatch layer for the tether remote debugging stub.
//!
//! This crate sits between the protocol layer (which decodes commands from a
//! remote debugger) and a pluggable execution backend (native process control,
//! a simulator, another OS entirely). It provides:
//! - A uniform memory model with software-breakpoint shadow reconciliation
//! - Resume / wait orchestration with normalized wait statuses
//! - All-stop / non-stop mode management
//! - Current-thread selection and target termination
//!
//! ## Architecture
//!
//! Everything hangs off a single [`Dispatcher`] context object. It owns the one
//! active [`Backend`], the collaborator hooks ([`ShadowMemory`],
//! [`ThreadRegistry`], [`AgentHooks`]) and the session flags. The protocol
//! layer constructs it once at startup and hands it to every command handler
//! by `&mut` reference, so there is no hidden process-wide state.
//!
//! ```rust,no_run
//! use tether_core::{Address, Dispatcher, SessionConfig, TargetId};
//!
//! # fn backend() -> Box<dyn tether_core::Backend> { unimplemented!() }
//! let mut dispatcher = Dispatcher::new(SessionConfig::from_env()?);
//! dispatcher.install_backend(backend());
//!
//! let bytes = dispatcher.read_memory(Address::from(0x1000), 16)?;
//! dispatcher.continue_without_signal(TargetId::process(42))?;
//! # Ok::<(), tether_core::TargetError>(())
//! ```

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hooks;
pub mod prelude;
pub mod shadow;
pub mod types;

pub use backend::{Backend, NonStopOps};
pub use config::{SessionConfig, Transport};
pub use dispatch::Dispatcher;
// Re-export commonly used types
pub use error::{TargetError, TargetResult};
pub use hooks::{AgentHooks, ShadowMemory, ThreadRegistry};
pub use shadow::ShadowTable;
pub use types::{format_target_id, Address, ResumeKind, ResumeRequest, Signal, TargetId, ThreadInfo, WaitKind, WaitOptions, WaitStatus};
