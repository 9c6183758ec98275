//! API 统一响应结构
//!
//! Every JSON endpoint answers with the same envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "source": "cache",
//!   "count": 2,
//!   "data": [ ... ]
//! }
//! ```
//!
//! `source` and `count` only appear on list reads served through the
//! cache-aside layer; `message` only appears on errors and bare
//! confirmations.

use serde::{Deserialize, Serialize};

/// Where a cached read was actually served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Database,
}

/// Unified response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a single payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            source: None,
            count: None,
            data: Some(data),
        }
    }

    /// Error response with a client-facing message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            source: None,
            count: None,
            data: None,
        }
    }

    /// Confirmation without payload (e.g. delete)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            source: None,
            count: None,
            data: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Successful list response annotated with its data source
    pub fn listed(source: DataSource, items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            source: Some(source),
            count: Some(items.len()),
            data: Some(items),
        }
    }
}
