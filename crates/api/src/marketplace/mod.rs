//! Transactional marketplace workflows.
//!
//! Handlers stay thin and call into these functions. Every mutation runs in
//! a single transaction: lock the affected rows, validate with the pure
//! rules in `barter_core`, write, commit. Events are published only after
//! the commit succeeds.

pub mod exchanges;
pub mod interests;
pub mod items;
pub mod ratings;

use barter_core::error::CoreError;
use barter_core::types::DbId;
use barter_db::repositories::CategoryRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// Check that every referenced category exists.
async fn validate_categories(pool: &PgPool, ids: &[DbId]) -> AppResult<()> {
    let missing = CategoryRepo::find_missing(pool, ids).await?;
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!("Unknown category ids: {missing:?}")).into());
    }
    Ok(())
}
