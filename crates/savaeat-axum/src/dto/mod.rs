//! Data Transfer Objects (DTOs) for the HTTP API contract.
//!
//! Query strings and request/response bodies that have no domain type of
//! their own. Domain types already serialize in camelCase and are returned
//! as-is.

pub mod auth;
pub mod queries;

pub use auth::{AuthResponse, LoginBody, RegisterResponse};
pub use queries::{DirectionsQuery, FavoritesQuery, NearbyQuery, ReviewBody, RouteDto};
