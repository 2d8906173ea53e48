//! Course administration: listing by scope, trash, restore and purge

use std::path::Path;

use clap::{Args, Subcommand};
use learnhub_core::model::Course;
use learnhub_store::repo::{CourseRepo, InstructorRepo};
use learnhub_store::soft_delete::purge::HardDelete;
use learnhub_store::{Query, Scope, SoftDeletable};
use rusqlite::Connection;

#[derive(Debug, Args)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub command: CoursesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoursesCommand {
    /// List courses with module, lesson and enrollment counts
    List {
        /// Which courses to show: active, all or deleted
        #[arg(long, default_value = "active")]
        scope: Scope,
    },
    /// Move active courses to the trash
    Trash {
        #[arg(required = true)]
        slugs: Vec<String>,
    },
    /// Bring trashed courses back
    Restore {
        #[arg(required = true)]
        slugs: Vec<String>,
    },
    /// Permanently delete courses with their modules and lessons
    Purge {
        #[arg(required = true)]
        slugs: Vec<String>,

        /// Required: purging cannot be undone
        #[arg(long)]
        confirm: bool,
    },
}

pub fn execute(db_path: &Path, args: CoursesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_database(db_path)?;

    match args.command {
        CoursesCommand::List { scope } => list(&conn, scope),
        CoursesCommand::Trash { slugs } => {
            let affected = scoped(&conn, Scope::Active)
                .filter_in("slug", slugs)
                .soft_delete()?;
            println!("Moved {} course(s) to the trash", affected);
            Ok(())
        }
        CoursesCommand::Restore { slugs } => {
            let affected = scoped(&conn, Scope::Deleted)
                .filter_in("slug", slugs)
                .restore()?;
            println!("Restored {} course(s)", affected);
            Ok(())
        }
        CoursesCommand::Purge { slugs, confirm } => {
            if !confirm {
                return Err("purge is permanent; pass --confirm to proceed".into());
            }
            let report = scoped(&conn, Scope::All)
                .filter_in("slug", slugs)
                .hard_delete()?;
            println!("Purged: {}", report);
            Ok(())
        }
    }
}

fn scoped(conn: &Connection, scope: Scope) -> Query<'_, Course> {
    match scope {
        Scope::Active => Course::active_query(conn),
        Scope::All => Course::all_query(conn),
        Scope::Deleted => Course::deleted_query(conn),
    }
}

fn list(conn: &Connection, scope: Scope) -> Result<(), Box<dyn std::error::Error>> {
    let rows = CourseRepo::with_full_counts(&scoped(conn, scope))?;
    if rows.is_empty() {
        println!("No {} courses", scope.as_str());
        return Ok(());
    }

    for (course, counts) in rows {
        let instructor = InstructorRepo::username(conn, course.instructor_id)?
            .unwrap_or_else(|| "-".to_string());
        let state = match course.lifecycle.deleted_at {
            Some(at) => format!("deleted {}", at.format("%Y-%m-%d %H:%M")),
            None => "active".to_string(),
        };
        println!(
            "{}\t{}\t{}\tby {}\tmodules={} lessons={} enrollments={}\t{}",
            course.id,
            course.slug,
            course.title,
            instructor,
            counts.modules,
            counts.lessons,
            counts.enrollments,
            state
        );
    }
    Ok(())
}
