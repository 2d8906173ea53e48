//! LearnHub CLI
//!
//! Administrative command-line interface for LearnHub

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use learnhub_core::logging_facility;
use learnhub_core::{ExError, ExErrorKind};
use learnhub_core_types::RequestContext;

mod commands;
mod settings;

use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "learnhub")]
#[command(about = "LearnHub - training center administration", long_about = None)]
struct Cli {
    /// SQLite database file (overrides settings)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// List, trash, restore or purge courses
    Courses(commands::courses::CoursesArgs),
    /// Enroll a user in a course
    Enroll(commands::enrollment::EnrollArgs),
    /// Show a user's progress in a course
    Progress(commands::enrollment::ProgressArgs),
}

fn main() {
    // A missing .env is fine
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load().map_err(|e| config_error(e.to_string()))?;
    logging_facility::init(settings.profile().map_err(config_error)?);

    let ctx = RequestContext::new().with_actor("cli");
    let span = tracing::info_span!(
        "learnhub",
        request_id = ctx.request_id.as_str(),
        actor = ctx.actor_or_anonymous()
    );
    let _entered = span.enter();

    let db_path = cli.db.unwrap_or(settings.database_path);
    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&db_path),
        Commands::Courses(args) => commands::courses::execute(&db_path, args),
        Commands::Enroll(args) => commands::enrollment::execute_enroll(&db_path, args),
        Commands::Progress(args) => commands::enrollment::execute_progress(&db_path, args),
    };

    // Structured failures carry the request id so they can be matched to logs
    result.map_err(|e| match e.downcast::<ExError>() {
        Ok(ex) => Box::new(ex.with_request_id(ctx.request_id.clone())) as Box<dyn std::error::Error>,
        Err(other) => other,
    })
}

fn config_error(message: String) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_settings")
        .with_message(message)
}
