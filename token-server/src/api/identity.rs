//! Caller identity
//!
//! Authentication itself is external: the upstream gateway verifies the
//! session and injects `x-user-id`. This extractor resolves that id
//! against the user table; privileged handlers additionally call
//! [`CurrentUser::require_admin`].

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::models::UserRole;

use crate::db::repository::user as user_repo;
use crate::error::AppError;
use crate::state::AppState;

/// Header set by the upstream gateway
const USER_ID_HEADER: &str = "x-user-id";

/// Resolved caller identity
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Gate for the privileged routes
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != UserRole::Admin {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(AppError::Unauthorized)?;

        let user = user_repo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        })
    }
}
