//! Migration framework
//!
//! - Embedded SQL migrations applied in order
//! - One transaction per migration, recorded with a SHA-256 checksum
//! - Idempotent; an edited migration that was already applied is rejected

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
