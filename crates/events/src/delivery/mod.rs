//! External delivery channels for exchange notifications.

pub mod email;
