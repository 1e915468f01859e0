//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and updates
//! - `Serialize` projections returned by the API

pub mod category;
pub mod exchange;
pub mod interest;
pub mod item;
pub mod rating;
pub mod user;
