//! Entity repositories
//!
//! Thin, stateless wrappers: every function takes the connection it works on.
//! Reads default to the active scope; trash and recovery paths go through
//! `SoftDeletable::all_query` / `deleted_query` directly.

mod accounts;
mod courses;
mod enrollments;
mod profiles;

pub use accounts::UserRepo;
pub use courses::{CourseCounts, CourseRepo, LessonRepo, ModuleRepo};
pub use enrollments::{EnrollmentRepo, LessonProgressRepo};
pub use profiles::{InstructorRepo, StudentRepo};
