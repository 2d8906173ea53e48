use learnhub_core::model::lifecycle::{now, to_millis, Lifecycle};
use learnhub_core::model::{Instructor, Student};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{from_rusqlite, Result};
use crate::soft_delete::SoftDeletable;

pub struct StudentRepo;

impl StudentRepo {
    /// Active student profile of a user
    pub fn for_user(conn: &Connection, user_id: i64) -> Result<Option<Student>> {
        Student::active_query(conn).filter_eq("user_id", user_id).first()
    }

    /// Active student profile of a user, created when missing
    ///
    /// The boolean is true when the profile was created. A soft-deleted
    /// profile still occupies the user's slot: creating over it fails with
    /// `ConstraintViolation`.
    pub fn get_or_create(conn: &Connection, user_id: i64) -> Result<(Student, bool)> {
        if let Some(student) = Self::for_user(conn, user_id)? {
            return Ok((student, false));
        }

        let lifecycle = Lifecycle::new(now());
        conn.execute(
            "INSERT INTO students (user_id, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![
                user_id,
                to_millis(lifecycle.created_at),
                to_millis(lifecycle.updated_at)
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_student")
                .with_entity_kind(Student::table().label)
        })?;

        Ok((
            Student {
                id: conn.last_insert_rowid(),
                user_id,
                lifecycle,
            },
            true,
        ))
    }
}

pub struct InstructorRepo;

impl InstructorRepo {
    pub fn create(conn: &Connection, user_id: i64, bio: &str) -> Result<Instructor> {
        let lifecycle = Lifecycle::new(now());
        conn.execute(
            "INSERT INTO instructors (user_id, bio, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                bio,
                to_millis(lifecycle.created_at),
                to_millis(lifecycle.updated_at)
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_instructor")
                .with_entity_kind(Instructor::table().label)
        })?;

        Ok(Instructor {
            id: conn.last_insert_rowid(),
            user_id,
            bio: bio.to_string(),
            lifecycle,
        })
    }

    pub fn for_user(conn: &Connection, user_id: i64) -> Result<Option<Instructor>> {
        Instructor::active_query(conn)
            .filter_eq("user_id", user_id)
            .first()
    }

    /// Username behind an instructor profile, deleted or not
    pub fn username(conn: &Connection, instructor_id: i64) -> Result<Option<String>> {
        conn.query_row(
            "SELECT u.username FROM instructors i JOIN users u ON u.id = i.user_id WHERE i.id = ?1",
            [instructor_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)
    }
}
