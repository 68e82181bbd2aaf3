//! The `tasknest` library crate.
//!
//! Contains the domain models, the session-token lifecycle (issue, register,
//! revoke, authenticate), ownership-scoped task access, the account-deletion
//! cascade, routing configuration and error handling. The main binary
//! (`main.rs`) wires these together over a Postgres-backed store.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
