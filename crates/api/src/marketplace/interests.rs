//! Customer interest workflows.

use barter_core::error::CoreError;
use barter_core::interest;
use barter_core::types::DbId;
use barter_db::models::interest::{EditInterests, UserInterest};
use barter_db::repositories::InterestRepo;
use sqlx::PgPool;

use super::validate_categories;
use crate::error::AppResult;

fn interests_not_found(user_id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Customer interest",
        id: user_id,
    }
}

/// Replace the user's interest list, creating it on first use.
pub async fn set(pool: &PgPool, user_id: DbId, category_ids: &[DbId]) -> AppResult<UserInterest> {
    interest::validate_ids(category_ids)?;
    let category_ids = interest::normalize(category_ids);
    validate_categories(pool, &category_ids).await?;

    let stored = InterestRepo::upsert(pool, user_id, &category_ids).await?;
    tracing::info!(user_id, categories = stored.category_ids.len(), "Customer interests saved");
    Ok(stored)
}

/// The user's interest list, or 404 if they never submitted one.
pub async fn get(pool: &PgPool, user_id: DbId) -> AppResult<UserInterest> {
    InterestRepo::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| interests_not_found(user_id).into())
}

/// Add and remove categories on an existing interest list.
pub async fn edit(pool: &PgPool, user_id: DbId, input: &EditInterests) -> AppResult<UserInterest> {
    interest::validate_ids(&input.add_category_ids)?;
    interest::validate_ids(&input.remove_category_ids)?;
    validate_categories(pool, &input.add_category_ids).await?;

    let mut tx = pool.begin().await?;
    let current = InterestRepo::lock_by_user(&mut *tx, user_id)
        .await?
        .ok_or_else(|| interests_not_found(user_id))?;

    let merged = interest::apply_changes(
        &current.category_ids,
        &input.add_category_ids,
        &input.remove_category_ids,
    );
    let stored = InterestRepo::upsert(&mut *tx, user_id, &merged).await?;
    tx.commit().await?;

    tracing::info!(
        user_id,
        added = input.add_category_ids.len(),
        removed = input.remove_category_ids.len(),
        "Customer interests edited",
    );
    Ok(stored)
}
