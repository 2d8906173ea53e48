//! LearnHub Store - SQLite persistence with soft deletion
//!
//! Provides:
//! - Connection management and embedded, checksummed migrations
//! - The soft-delete data access layer (`soft_delete`): active / all /
//!   deleted query surfaces, bulk soft delete and restore, and permanent
//!   removal behind the separately imported `purge::HardDelete` trait
//! - Table descriptors for every soft-deletable entity (`schema`)
//! - Entity repositories (`repo`)

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod schema;
pub mod soft_delete;

pub use errors::Result;
pub use soft_delete::{Query, Scope, SoftDeletable};
