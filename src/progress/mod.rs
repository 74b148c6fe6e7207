//! Per-user row progress: the store interface the rendered checkboxes talk
//! to, and the HTTP-shaped handlers in front of it.

pub mod api;
pub mod store;

pub use api::{ApiResponse, Caller, ProgressApi, parse_route};
pub use store::{MemoryProgressStore, ProgressKey, ProgressStore, StoreError, StoreResult};
