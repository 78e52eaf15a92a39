//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **media**: capability-scoped image storage on the local filesystem
//! - **export**: text and PDF shopping-list renderers
//! - **crypto**: Argon2 password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod crypto;
pub mod export;
pub mod media;
pub mod persistence;
