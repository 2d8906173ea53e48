//! Enrollment commands

use learnhub_core::errors::{ExError, ExErrorKind, LearnHubError};
use learnhub_core::model::{Course, Enrollment, Progress, User};
use learnhub_store::errors::from_rusqlite;
use learnhub_store::repo::{CourseRepo, EnrollmentRepo, StudentRepo, UserRepo};
use learnhub_store::Result;
use rusqlite::Connection;
use serde::Serialize;

use super::logged;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollOutcome {
    pub enrollment: Enrollment,
    /// False when the user was already enrolled
    pub created: bool,
    /// True when the user got a student profile on the way
    pub student_created: bool,
}

/// Enroll a user in an active course
///
/// Creates the user's student profile when missing. Enrolling twice returns
/// the existing enrollment. A soft-deleted enrollment for the same pair is
/// not revived and fails with `ConstraintViolation`.
pub fn enroll_in_course(conn: &mut Connection, user_id: i64, course_slug: &str) -> Result<EnrollOutcome> {
    logged("enroll_in_course", || {
        let user = existing_user(conn, user_id)?;
        let course = active_course(conn, course_slug)?;

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let (student, student_created) = StudentRepo::get_or_create(&tx, user.id)?;
        let (enrollment, created) = EnrollmentRepo::get_or_create(&tx, student.id, course.id)?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::info!(
            component = module_path!(),
            op = "enroll_in_course",
            entity_id = enrollment.id,
            slug = course.slug.as_str(),
            created,
            student_created,
            "enrollment resolved"
        );

        Ok(EnrollOutcome {
            enrollment,
            created,
            student_created,
        })
    })
}

/// Progress of a user's active enrollment in an active course
pub fn enrollment_progress(conn: &Connection, user_id: i64, course_slug: &str) -> Result<Progress> {
    logged("enrollment_progress", || {
        let user = existing_user(conn, user_id)?;
        let course = active_course(conn, course_slug)?;

        let not_enrolled = || {
            ExError::from(LearnHubError::EnrollmentNotFound {
                username: user.username.clone(),
                slug: course.slug.clone(),
            })
        };
        let student = StudentRepo::for_user(conn, user.id)?.ok_or_else(not_enrolled)?;
        let enrollment = EnrollmentRepo::find(conn, student.id, course.id)?.ok_or_else(not_enrolled)?;

        EnrollmentRepo::progress(conn, &enrollment)
    })
}

fn existing_user(conn: &Connection, user_id: i64) -> Result<User> {
    UserRepo::get(conn, user_id)?.ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_entity_kind("accounts.User")
            .with_entity_id(user_id.to_string())
            .with_message("user does not exist")
    })
}

fn active_course(conn: &Connection, slug: &str) -> Result<Course> {
    CourseRepo::by_slug(conn, slug)?.ok_or_else(|| {
        ExError::from(LearnHubError::CourseNotFound {
            slug: slug.to_string(),
        })
    })
}
