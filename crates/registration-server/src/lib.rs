//! DevChat registration server.
//!
//! Hosts the registration form over HTTP:
//! - `GET /v1/register` describes the blank form
//! - `POST /v1/register` validates and registers, returning the updated form
//! - `GET /health` reports liveness and the configured backend

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ServerError;
