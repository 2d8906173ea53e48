//! LearnHub Engine - Orchestration layer
//!
//! Coordinates the domain model and the store into the operations the site
//! and the admin CLI perform: catalog browsing, enrollment and progress.

pub mod commands;
