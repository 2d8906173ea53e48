//! LearnHub Core - domain model of the training center
//!
//! - Accounts, profiles, courses/modules/lessons, enrollments and progress
//! - Record lifecycle for the soft-delete convention
//! - Slug generation and field validation
//! - Canonical error facility and structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod slug;

/// Re-exported for the logging macros
pub use learnhub_core_types as core_types;

pub use errors::{ExError, ExErrorKind, LearnHubError, Result};
pub use model::{Lifecycle, Record, RecordState};
