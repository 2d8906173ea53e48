//! Enrollment and progress commands

use std::path::Path;

use clap::Args;
use learnhub_core::errors::{ExError, LearnHubError};
use learnhub_core::model::User;
use learnhub_engine::commands::enrollment::{enroll_in_course, enrollment_progress};
use learnhub_store::repo::UserRepo;
use rusqlite::Connection;

#[derive(Debug, Args)]
pub struct EnrollArgs {
    #[arg(long)]
    pub username: String,

    /// Course slug
    #[arg(long)]
    pub course: String,
}

#[derive(Debug, Args)]
pub struct ProgressArgs {
    #[arg(long)]
    pub username: String,

    /// Course slug
    #[arg(long)]
    pub course: String,
}

pub fn execute_enroll(db_path: &Path, args: EnrollArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = super::open_database(db_path)?;
    let user = user_by_name(&conn, &args.username)?;

    let outcome = enroll_in_course(&mut conn, user.id, &args.course)?;
    if outcome.created {
        println!("Enrolled {} in {}", user.username, args.course);
    } else {
        println!("{} is already enrolled in {}", user.username, args.course);
    }
    Ok(())
}

pub fn execute_progress(db_path: &Path, args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_database(db_path)?;
    let user = user_by_name(&conn, &args.username)?;

    let progress = enrollment_progress(&conn, user.id, &args.course)?;
    println!("{} in {}: {}", user.username, args.course, progress);
    Ok(())
}

fn user_by_name(conn: &Connection, username: &str) -> Result<User, ExError> {
    UserRepo::by_username(conn, username)?.ok_or_else(|| {
        ExError::from(LearnHubError::UserNotFound {
            username: username.to_string(),
        })
    })
}
