//! Shared types for the pickup token system
//!
//! Wire-level types used by the token server and its clients: entity
//! models, status enums, the API response envelope and realtime message
//! payloads.

pub mod live;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use live::{JoinCommand, StatusUpdate};
pub use response::{ApiResponse, DataSource};
