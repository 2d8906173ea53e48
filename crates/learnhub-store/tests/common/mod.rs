//! Shared fixtures for store integration tests

#![allow(dead_code)]

use learnhub_core::model::{
    Course, Enrollment, Instructor, Lesson, Module, NewCourse, NewLesson, NewModule, NewUser,
    Student,
};
use learnhub_store::db;
use learnhub_store::migrations::apply_migrations;
use learnhub_store::repo::{
    CourseRepo, EnrollmentRepo, InstructorRepo, LessonRepo, ModuleRepo, StudentRepo, UserRepo,
};
use rusqlite::Connection;

pub const SOFT_DELETE_TABLES: &[&str] = &[
    "students",
    "instructors",
    "courses",
    "modules",
    "lessons",
    "enrollments",
    "lesson_progress",
];

/// Migrated in-memory database
pub fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn
}

pub fn instructor(conn: &Connection, username: &str) -> Instructor {
    let user = UserRepo::create(conn, &NewUser::new(username, format!("{}@example.com", username)))
        .unwrap();
    InstructorRepo::create(conn, user.id, "Teaches things").unwrap()
}

pub fn student(conn: &Connection, username: &str) -> Student {
    let user = UserRepo::create(conn, &NewUser::new(username, format!("{}@example.com", username)))
        .unwrap();
    StudentRepo::get_or_create(conn, user.id).unwrap().0
}

pub fn course(conn: &Connection, instructor: &Instructor, title: &str) -> Course {
    CourseRepo::create(conn, &NewCourse::new(title, instructor.id)).unwrap()
}

/// A course with `modules` modules of `lessons_per_module` lessons each
pub fn course_tree(
    conn: &Connection,
    instructor: &Instructor,
    title: &str,
    modules: u32,
    lessons_per_module: u32,
) -> (Course, Vec<Module>, Vec<Lesson>) {
    let course = course(conn, instructor, title);
    let mut all_modules = Vec::new();
    let mut all_lessons = Vec::new();
    for m in 0..modules {
        let module = ModuleRepo::create(
            conn,
            &NewModule::new(course.id, format!("Module {}", m + 1), m),
        )
        .unwrap();
        for l in 0..lessons_per_module {
            let lesson = LessonRepo::create(
                conn,
                &NewLesson::new(module.id, format!("Lesson {}.{}", m + 1, l + 1), l)
                    .with_content("Body"),
            )
            .unwrap();
            all_lessons.push(lesson);
        }
        all_modules.push(module);
    }
    (course, all_modules, all_lessons)
}

pub fn enroll(conn: &Connection, student: &Student, course: &Course) -> Enrollment {
    EnrollmentRepo::get_or_create(conn, student.id, course.id)
        .unwrap()
        .0
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Assert that no row anywhere breaks the flag/timestamp pairing
pub fn assert_lifecycle_invariant(conn: &Connection) {
    for table in SOFT_DELETE_TABLES {
        let broken: i64 = conn
            .query_row(
                &format!(
                    "SELECT COUNT(*) FROM {} WHERE (is_deleted = 1 AND deleted_at IS NULL)
                        OR (is_deleted = 0 AND deleted_at IS NOT NULL)",
                    table
                ),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(broken, 0, "{} has rows breaking the lifecycle invariant", table);
    }
}

pub fn sorted(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids
}
