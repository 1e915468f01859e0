//! Request handlers.
//!
//! Handlers extract the caller and request body, delegate to the
//! [`marketplace`](crate::marketplace) workflows or a repository in
//! `barter_db`, and wrap results in the `{ "data": ... }` envelope.

pub mod category;
pub mod exchange;
pub mod interest;
pub mod item;
pub mod user;
