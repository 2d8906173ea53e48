//! Shared fixtures for engine tests

#![allow(dead_code)]

use learnhub_core::model::{Course, Instructor, Lesson, Module, NewCourse, NewLesson, NewModule, NewUser, User};
use learnhub_store::db;
use learnhub_store::migrations::apply_migrations;
use learnhub_store::repo::{CourseRepo, InstructorRepo, LessonRepo, ModuleRepo, UserRepo};
use rusqlite::Connection;

pub fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn
}

pub fn user(conn: &Connection, username: &str) -> User {
    UserRepo::create(conn, &NewUser::new(username, format!("{}@example.com", username))).unwrap()
}

pub fn instructor(conn: &Connection, username: &str) -> Instructor {
    let user = user(conn, username);
    InstructorRepo::create(conn, user.id, "").unwrap()
}

pub fn course(conn: &Connection, instructor: &Instructor, title: &str) -> Course {
    CourseRepo::create(conn, &NewCourse::new(title, instructor.id)).unwrap()
}

pub fn module(conn: &Connection, course: &Course, order: u32) -> Module {
    ModuleRepo::create(conn, &NewModule::new(course.id, format!("Module {}", order), order)).unwrap()
}

pub fn lesson(conn: &Connection, module: &Module, order: u32) -> Lesson {
    LessonRepo::create(
        conn,
        &NewLesson::new(module.id, format!("Lesson {}.{}", module.order, order), order),
    )
    .unwrap()
}
