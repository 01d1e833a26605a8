//! Persistence layer: explicit query functions over the connection pool.
//!
//! Handlers never build SQL themselves; everything the service does to a
//! row goes through one of these functions. Token-list changes are single
//! UPDATE statements, so their atomicity is the database's per-row write
//! atomicity and nothing more.

pub mod tasks;
pub mod users;
