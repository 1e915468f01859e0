//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Read-only listings take `&PgPool`; methods that participate in a
//! transaction accept any [`sqlx::PgExecutor`] (a pool, or `&mut *tx`), and
//! row-locking methods require `&mut PgConnection` since `FOR UPDATE` is only
//! meaningful inside a transaction.

pub mod category_repo;
pub mod exchange_repo;
pub mod interest_repo;
pub mod item_repo;
pub mod rating_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use exchange_repo::ExchangeRepo;
pub use interest_repo::InterestRepo;
pub use item_repo::ItemRepo;
pub use rating_repo::RatingRepo;
pub use user_repo::UserRepo;
