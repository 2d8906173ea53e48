use learnhub_core::model::lifecycle::{now, to_millis, Lifecycle};
use learnhub_core::model::{Enrollment, LessonProgress, Progress};
use learnhub_core::{ExError, Record};
use rusqlite::{params, Connection};

use super::courses::LessonRepo;
use crate::errors::{from_rusqlite, record_missing, Result};
use crate::soft_delete::SoftDeletable;

pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Active enrollment of a student in a course
    pub fn find(conn: &Connection, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        Enrollment::active_query(conn)
            .filter_eq("student_id", student_id)
            .filter_eq("course_id", course_id)
            .first()
    }

    /// Active enrollment for the pair, created when missing
    ///
    /// The boolean is true when the enrollment was created. A soft-deleted
    /// enrollment for the same pair blocks creation with
    /// `ConstraintViolation`; restore it instead.
    pub fn get_or_create(
        conn: &Connection,
        student_id: i64,
        course_id: i64,
    ) -> Result<(Enrollment, bool)> {
        if let Some(enrollment) = Self::find(conn, student_id, course_id)? {
            return Ok((enrollment, false));
        }

        let lifecycle = Lifecycle::new(now());
        let enrolled_at = lifecycle.created_at;
        conn.execute(
            "INSERT INTO enrollments (student_id, course_id, enrolled_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                student_id,
                course_id,
                to_millis(enrolled_at),
                to_millis(lifecycle.created_at),
                to_millis(lifecycle.updated_at),
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_enrollment")
                .with_entity_kind(Enrollment::table().label)
        })?;

        Ok((
            Enrollment {
                id: conn.last_insert_rowid(),
                student_id,
                course_id,
                enrolled_at,
                lifecycle,
            },
            true,
        ))
    }

    /// Completed vs. total lessons
    ///
    /// Total counts active lessons of the course; completed counts active,
    /// completed progress rows of the enrollment.
    pub fn progress(conn: &Connection, enrollment: &Enrollment) -> Result<Progress> {
        let total = LessonRepo::active_in_course(conn, enrollment.course_id).count()?;
        let completed = LessonProgress::active_query(conn)
            .filter_eq("enrollment_id", enrollment.id)
            .filter_eq("is_completed", true)
            .count()?;
        Ok(Progress { completed, total })
    }
}

pub struct LessonProgressRepo;

impl LessonProgressRepo {
    /// Set the completion state of a lesson for an enrollment, creating the
    /// progress row on first use
    pub fn record(
        conn: &Connection,
        enrollment_id: i64,
        lesson_id: i64,
        completed: bool,
    ) -> Result<LessonProgress> {
        let existing = LessonProgress::active_query(conn)
            .filter_eq("enrollment_id", enrollment_id)
            .filter_eq("lesson_id", lesson_id)
            .first()?;

        match existing {
            Some(mut progress) => {
                progress.is_completed = completed;
                Self::save(conn, &mut progress)?;
                Ok(progress)
            }
            None => {
                let mut progress = LessonProgress {
                    id: 0,
                    enrollment_id,
                    lesson_id,
                    is_completed: completed,
                    completed_at: None,
                    lifecycle: Lifecycle::new(now()),
                };
                Self::insert(conn, &mut progress)?;
                Ok(progress)
            }
        }
    }

    /// Persist a loaded progress row, applying the completion rule
    pub fn save(conn: &Connection, progress: &mut LessonProgress) -> Result<()> {
        progress
            .check_lifecycle()
            .map_err(|e| ExError::from(e).with_op("save_lesson_progress"))?;

        let stamp = now();
        let mut updated_row = progress.clone();
        updated_row.apply_completion_rule(stamp);
        updated_row.lifecycle.touch(stamp);

        let updated = conn
            .execute(
                "UPDATE lesson_progress SET is_completed = ?1, completed_at = ?2,
                    is_deleted = ?3, deleted_at = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    updated_row.is_completed,
                    updated_row.completed_at.map(to_millis),
                    updated_row.lifecycle.is_deleted,
                    updated_row.lifecycle.deleted_at.map(to_millis),
                    to_millis(updated_row.lifecycle.updated_at),
                    updated_row.id,
                ],
            )
            .map_err(|e| {
                from_rusqlite(e)
                    .with_op("save_lesson_progress")
                    .with_entity_kind(LessonProgress::table().label)
            })?;
        if updated == 0 {
            return Err(record_missing(
                "save_lesson_progress",
                LessonProgress::table().label,
                progress.id,
            ));
        }

        *progress = updated_row;
        Ok(())
    }

    fn insert(conn: &Connection, progress: &mut LessonProgress) -> Result<()> {
        progress.apply_completion_rule(progress.lifecycle.created_at);
        conn.execute(
            "INSERT INTO lesson_progress (enrollment_id, lesson_id, is_completed, completed_at,
                                          created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                progress.enrollment_id,
                progress.lesson_id,
                progress.is_completed,
                progress.completed_at.map(to_millis),
                to_millis(progress.lifecycle.created_at),
                to_millis(progress.lifecycle.updated_at),
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_lesson_progress")
                .with_entity_kind(LessonProgress::table().label)
        })?;
        progress.id = conn.last_insert_rowid();
        Ok(())
    }
}
