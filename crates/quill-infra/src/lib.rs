//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! PostgreSQL repositories via SeaORM, JWT token issuance, Argon2 password
//! hashing, and the HTTP client for the external media store.

pub mod auth;
pub mod database;
pub mod media;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, Db};
pub use media::{CloudinaryConfig, CloudinaryMediaStore};
