//! Item registry workflows.
//!
//! Items referenced by a `pending` or `exchanging` exchange are frozen: they
//! can be neither edited nor deleted until the exchange leaves those states.

use barter_core::error::CoreError;
use barter_core::types::DbId;
use barter_db::models::item::{CreateItem, Item, UpdateItem};
use barter_db::repositories::ItemRepo;
use sqlx::{PgConnection, PgPool};

use super::validate_categories;
use crate::error::AppResult;

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Item title must not be empty".into()));
    }
    Ok(())
}

/// List a new item owned by `owner_id`.
pub async fn create(pool: &PgPool, owner_id: DbId, input: &CreateItem) -> AppResult<Item> {
    validate_title(&input.title)?;

    let mut referenced = vec![input.category_id];
    referenced.extend_from_slice(&input.preferred_category_ids);
    validate_categories(pool, &referenced).await?;

    let item = ItemRepo::create(pool, owner_id, input).await?;
    tracing::info!(item_id = item.id, user_id = owner_id, "Item created");
    Ok(item)
}

/// Lock an item the caller owns and that no active exchange references.
async fn lock_mutable(conn: &mut PgConnection, owner_id: DbId, item_id: DbId) -> AppResult<Item> {
    let item = ItemRepo::lock_by_id(&mut *conn, item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;

    if item.owner_id != owner_id {
        return Err(CoreError::Forbidden("Only the owner can modify this item".into()).into());
    }

    if ItemRepo::has_active_exchange(conn, item_id).await? {
        return Err(CoreError::Conflict(format!(
            "Item {item_id} is part of an active exchange"
        ))
        .into());
    }

    Ok(item)
}

/// Update an item the caller owns.
pub async fn update(
    pool: &PgPool,
    owner_id: DbId,
    item_id: DbId,
    input: &UpdateItem,
) -> AppResult<Item> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    let mut referenced: Vec<DbId> = input.category_id.into_iter().collect();
    if let Some(preferred) = &input.preferred_category_ids {
        referenced.extend_from_slice(preferred);
    }
    validate_categories(pool, &referenced).await?;

    let mut tx = pool.begin().await?;
    lock_mutable(&mut *tx, owner_id, item_id).await?;
    let item = ItemRepo::update(&mut *tx, item_id, input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;
    tx.commit().await?;

    tracing::info!(item_id, user_id = owner_id, "Item updated");
    Ok(item)
}

/// Delete an item the caller owns.
pub async fn delete(pool: &PgPool, owner_id: DbId, item_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    lock_mutable(&mut *tx, owner_id, item_id).await?;
    ItemRepo::delete(&mut *tx, item_id).await?;
    tx.commit().await?;

    tracing::info!(item_id, user_id = owner_id, "Item deleted");
    Ok(())
}
