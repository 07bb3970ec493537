//! # Types
//!
//! Backend-agnostic types shared by the dispatcher, the backends and the
//! protocol layer.
//!
//! These types abstract away how a particular backend names processes,
//! reports state changes or encodes resume requests, so the rest of the stub
//! can reason about one model regardless of what is being debugged.

pub mod address;
pub mod resume;
pub mod status;
pub mod target_id;

// Re-export all public types
pub use address::Address;
pub use resume::{ResumeKind, ResumeRequest, WaitOptions};
pub use status::{Signal, WaitKind, WaitStatus};
pub use target_id::{format_target_id, TargetId, ThreadInfo};
