//! Business logic behind the request handlers.

pub mod auth;
pub mod chat;
