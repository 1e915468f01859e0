//! Rating submission.

use barter_core::error::CoreError;
use barter_core::rating::{self, RatingAggregate};
use barter_core::types::{DbId, Score};
use barter_db::repositories::{RatingRepo, UserRepo};
use sqlx::PgPool;

use crate::error::AppResult;

/// Record `rater_id`'s score for `rated_user_id` and return the recomputed
/// aggregate.
///
/// The rated user's row is locked so concurrent submissions recompute the
/// aggregate one after another.
pub async fn submit(
    pool: &PgPool,
    rated_user_id: DbId,
    rater_id: DbId,
    score: Score,
) -> AppResult<RatingAggregate> {
    rating::validate_rater(rated_user_id, rater_id)?;
    rating::validate_score(score)?;

    let mut tx = pool.begin().await?;

    UserRepo::lock_by_id(&mut *tx, rated_user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: rated_user_id,
        })?;

    RatingRepo::upsert(&mut *tx, rated_user_id, rater_id, score).await?;
    let scores = RatingRepo::scores_for_user(&mut *tx, rated_user_id).await?;
    let aggregate = RatingAggregate::from_scores(&scores);
    UserRepo::set_rating_aggregate(&mut *tx, rated_user_id, &aggregate).await?;

    tx.commit().await?;

    tracing::info!(
        user_id = rated_user_id,
        rater_id,
        score,
        rating = aggregate.rating,
        rating_count = aggregate.rating_count,
        "Rating submitted",
    );

    Ok(aggregate)
}
