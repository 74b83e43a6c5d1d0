#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod models;

pub use client::{DefaultOsrmClient, OsrmClient};
pub use config::{DEFAULT_OSRM_URL, OsrmClientConfig};
pub use error::OsrmError;
