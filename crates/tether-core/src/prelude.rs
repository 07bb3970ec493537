//! Common module for library exports

pub use crate::backend::{Backend, NonStopOps};
pub use crate::config::{SessionConfig, Transport};
pub use crate::dispatch::Dispatcher;
pub use crate::error::{TargetError, TargetResult};
pub use crate::hooks::{AgentHooks, NoopHooks, ShadowMemory, ThreadRegistry};
pub use crate::types::address::Address;
pub use crate::types::resume::{ResumeKind, ResumeRequest, WaitOptions};
pub use crate::types::status::{Signal, WaitKind, WaitStatus};
pub use crate::types::target_id::{TargetId, ThreadInfo};
