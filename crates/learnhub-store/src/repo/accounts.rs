use learnhub_core::model::lifecycle::{now, to_millis};
use learnhub_core::model::{NewUser, User};
use learnhub_core::ExError;
use learnhub_core_types::Sensitive;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::{from_rusqlite, Result};
use crate::soft_delete::timestamp_column;

const USER_COLUMNS: &str = "id, username, email, age, phone, date_joined";

/// Site accounts (not soft-deletable)
pub struct UserRepo;

impl UserRepo {
    /// Validate and insert a new user
    pub fn create(conn: &Connection, new_user: &NewUser) -> Result<User> {
        new_user
            .validate()
            .map_err(|e| ExError::from(e).with_op("create_user"))?;

        let date_joined = now();
        conn.execute(
            "INSERT INTO users (username, email, age, phone, date_joined)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_user.username.trim(),
                new_user.email,
                new_user.age,
                new_user.phone.as_ref().map(|p| p.expose().as_str()),
                to_millis(date_joined),
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_user")
                .with_entity_kind("accounts.User")
        })?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: new_user.username.trim().to_string(),
            email: new_user.email.clone(),
            age: new_user.age,
            phone: new_user.phone.clone(),
            date_joined,
        })
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            [id],
            user_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
            [username],
            user_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Remove a user; its profiles go with it
    ///
    /// Returns false when no such user exists. Fails with
    /// `ConstraintViolation` while the student profile has enrollments.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let removed = conn
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .map_err(|e| {
                from_rusqlite(e)
                    .with_op("delete_user")
                    .with_entity_kind("accounts.User")
                    .with_entity_id(id.to_string())
            })?;
        Ok(removed > 0)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        age: row.get("age")?,
        phone: row.get::<_, Option<String>>("phone")?.map(Sensitive::new),
        date_joined: timestamp_column(row, "date_joined")?,
    })
}
