//! User accounts service
//!
//! CRUD over user records plus password login. Passwords only ever reach a
//! store as Argon2id hashes; responses carry the [`models::UserResponse`]
//! projection, which has no credential field.

pub mod accounts;
pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use accounts::AccountStore;
pub use config::{AppConfig, StorageBackend};
pub use error::{AccountError, AccountResult, AuthFailure};
pub use state::AppState;
