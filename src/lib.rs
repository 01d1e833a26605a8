//! The `taskman` library crate.
//!
//! A task-management REST service: users register, authenticate with bearer
//! tokens, and manage their own to-do tasks. This crate holds the domain
//! models, the authentication stack (password hashing, token issuance and
//! the authorization gate), the persistence layer, routing, and error
//! handling. The binary in `main.rs` wires it all into an HTTP server.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
