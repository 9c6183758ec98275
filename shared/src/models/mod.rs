//! Entity models
//!
//! Plain serde structs; `sqlx` row/type derives are gated behind the `db`
//! feature so client-side consumers stay free of database dependencies.

pub mod order;
pub mod product;
pub mod user;

pub use order::{
    Order, OrderCreate, OrderDetailRow, OrderStatus, OrderView, PaymentStatus, ProductRef, UserRef,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{User, UserRole};
