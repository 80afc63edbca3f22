//! Server library module.
//!
//! Exposes the HTTP router so the binary and integration tests share it.

pub mod routes;
