//! token-server — pickup token order service
//!
//! Issues sequential pickup tokens for orders against a product catalog,
//! serves reads through a cache-aside layer, and pushes order-status
//! changes to subscribed clients in real time.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod live;
pub mod orders;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
