//! Token sequencer
//!
//! Pickup tokens are `T<n>`, strictly increasing in creation order across
//! all orders. The next token is derived from the most recently created
//! order; the very first order gets [`SEED_TOKEN`].
//!
//! Issuance is read-then-write and therefore not atomic: two concurrent
//! creators can both derive the same next token. The UNIQUE index on
//! `token_number` turns that race into an insert conflict, which the
//! lifecycle manager resolves by re-reading and retrying (bounded).

use super::OrderError;
use crate::db::repository::order as order_repo;
use sqlx::SqlitePool;

/// Token issued to the first order ever
pub const SEED_TOKEN: &str = "T1001";

/// Derive the next pickup token from the current order history
pub async fn next_token(pool: &SqlitePool) -> Result<String, OrderError> {
    match order_repo::find_last_created(pool).await? {
        None => Ok(SEED_TOKEN.to_string()),
        Some(last) => {
            let n = parse_token(&last.token_number)
                .ok_or_else(|| OrderError::MalformedSequence(last.token_number.clone()))?;
            Ok(format!("T{}", n + 1))
        }
    }
}

/// Parse the numeric suffix of a `T<digits>` token; `None` when the
/// stored value does not match that shape
fn parse_token(token: &str) -> Option<u64> {
    let digits = token.strip_prefix('T')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
