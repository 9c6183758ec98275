//! User Repository
//!
//! Read side of the externally provisioned user table; `create` exists
//! for provisioning mirrors and test fixtures.

use super::RepoResult;
use shared::models::{User, UserRole};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, name, email, role, created_at, updated_at FROM user";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    role: UserRole,
) -> RepoResult<User> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, name, email, role, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        created_at: now,
        updated_at: now,
    })
}
