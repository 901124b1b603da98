//! API module - HTTP routes, handlers, and models

pub mod chat_handlers;
pub mod handlers;
pub mod media_handlers;
pub mod models;
pub mod routes;
