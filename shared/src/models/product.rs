//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (商品)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Gate for purchase and for the public listing
    pub availability: bool,
    pub description: Option<String>,
    pub category: String,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    #[serde(default = "default_true")]
    pub availability: bool,
    pub description: Option<String>,
    pub category: String,
}

fn default_true() -> bool {
    true
}

/// Update product payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
    pub description: Option<String>,
    pub category: Option<String>,
}
