//! Migrations are embedded at compile time using include_str!

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in application order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_accounts_and_profiles",
            sql: include_str!("../../migrations/001_accounts_and_profiles.sql"),
        },
        Migration {
            id: "002_courses",
            sql: include_str!("../../migrations/002_courses.sql"),
        },
        Migration {
            id: "003_enrollments",
            sql: include_str!("../../migrations/003_enrollments.sql"),
        },
    ]
}
