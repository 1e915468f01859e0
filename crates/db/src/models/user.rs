//! User entity model and DTOs.

use barter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the email address -- serialize [`UserProfile`] or
/// [`UserSummary`] instead, or [`AccountView`] for the user themselves.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub rating: f64,
    pub rating_count: i32,
    pub exchange_complete_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public profile of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub name: String,
    pub rating: f64,
    pub rating_count: i32,
    pub exchange_complete_count: i32,
    pub created_at: Timestamp,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            rating: user.rating,
            rating_count: user.rating_count,
            exchange_complete_count: user.exchange_complete_count,
            created_at: user.created_at,
        }
    }
}

/// The caller's own account, including their email address.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub email: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl From<User> for AccountView {
    fn from(user: User) -> Self {
        Self {
            email: user.email.clone(),
            profile: UserProfile::from(user),
        }
    }
}

/// Minimal reference to a user embedded in other projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
}

/// DTO for provisioning a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}
