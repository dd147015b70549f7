//! # FX Market server
//! This crate hosts the HTTP API for the currency exchange marketplace. It is responsible for:
//! * Authenticating users and issuing access tokens.
//! * Translating requests into calls on the `fx_engine` APIs, and engine errors into HTTP responses.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/...`: The marketplace API. See [routes](routes/index.html) for the full list.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
