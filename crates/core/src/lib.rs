//! Barter domain core.
//!
//! Pure business rules shared by the persistence and HTTP layers. Nothing in
//! this crate performs I/O.

pub mod eligibility;
pub mod error;
pub mod exchange;
pub mod handshake;
pub mod interest;
pub mod rating;
pub mod types;
