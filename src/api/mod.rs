//! Remote service integration
//!
//! This module owns all network I/O: the REST client and the edit workflow
//! that turns a recalculated start instant into a PUT.

pub mod client;
pub mod edit;
pub mod requests;

// Re-export main types
pub use client::ApiClient;
pub use edit::{apply_edit, build_update};
pub use requests::{TimerCreationRequest, TimerUpdateRequest};
