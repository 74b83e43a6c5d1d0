//! HTTP request handlers for the Axum web server.
//!
//! Each submodule covers one API area. Handlers are thin: they check who is
//! calling and delegate to `AppCore`.

pub mod auth;
pub mod clients;
pub mod directions;
pub mod events;
pub mod maintenance;
pub mod me;
pub mod settings;
pub mod vendors;
