//! Repositories: slugs, saves, per-record lifecycle, enrollment and progress

mod common;

use common::*;
use learnhub_core::model::{Course, Lesson, NewCourse, NewLesson, NewUser, Student};
use learnhub_core::{ExErrorKind, RecordState};
use learnhub_store::repo::{
    CourseRepo, EnrollmentRepo, LessonProgressRepo, LessonRepo, StudentRepo, UserRepo,
};
use learnhub_store::soft_delete::instance::{restore_record, soft_delete_record};
use learnhub_store::SoftDeletable;

#[test]
fn test_slugs_are_unique_across_deleted_rows() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");

    let first = course(&conn, &tutor, "Intro to Rust");
    assert_eq!(first.slug, "intro-to-rust");

    Course::active_query(&conn)
        .filter_ids(&[first.id])
        .soft_delete()
        .unwrap();

    let second = course(&conn, &tutor, "Intro to Rust");
    let third = course(&conn, &tutor, "Intro  to  Rust!");
    assert_eq!(second.slug, "intro-to-rust-2");
    assert_eq!(third.slug, "intro-to-rust-3");
}

#[test]
fn test_unsluggable_title_gets_random_slug() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "!!!");
    assert_eq!(course.slug.len(), 8);
}

#[test]
fn test_accented_title_slug_uses_base_letters() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Crème Brûlée Basics");
    assert_eq!(course.slug, "creme-brulee-basics");
}

#[test]
fn test_slug_survives_title_change() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let mut course = course(&conn, &tutor, "Old Title");
    let created = course.lifecycle.updated_at;

    course.title = "New Title".to_string();
    CourseRepo::save(&conn, &mut course).unwrap();

    let stored = CourseRepo::by_slug(&conn, "old-title").unwrap().unwrap();
    assert_eq!(stored.title, "New Title");
    assert!(stored.lifecycle.updated_at >= created);
    assert_eq!(stored.lifecycle.updated_at, course.lifecycle.updated_at);
}

#[test]
fn test_create_course_validates_title() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let err = CourseRepo::create(&conn, &NewCourse::new("  ", tutor.id)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTitle);
    assert_eq!(count_rows(&conn, "courses"), 0);
}

#[test]
fn test_oversized_video_is_rejected() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let (_, modules, _) = course_tree(&conn, &tutor, "Videos", 1, 0);

    let lesson = NewLesson::new(modules[0].id, "Huge", 0).with_video("huge.mp4", 600 * 1024 * 1024);
    let err = LessonRepo::create(&conn, &lesson).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::FileTooLarge);
    assert!(err.message().contains("500MB"));

    let ok = NewLesson::new(modules[0].id, "Fine", 0).with_video("fine.mp4", 10 * 1024 * 1024);
    let stored = LessonRepo::create(&conn, &ok).unwrap();
    let loaded = LessonRepo::for_module(&conn, modules[0].id).unwrap();
    assert_eq!(loaded, vec![stored]);
    assert!(loaded[0].has_video());
}

#[test]
fn test_per_record_soft_delete_and_restore_refresh_updated_at() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let mut course = course(&conn, &tutor, "Per record");
    let created = course.lifecycle.updated_at;

    soft_delete_record(&conn, &mut course).unwrap();
    assert_eq!(course.lifecycle.state(), RecordState::Deleted);
    let stored = Course::deleted_query(&conn).get(course.id).unwrap().unwrap();
    assert_eq!(stored, course);
    assert!(stored.lifecycle.updated_at >= created);

    restore_record(&conn, &mut course).unwrap();
    assert_eq!(course.lifecycle.state(), RecordState::Active);
    assert_eq!(course.lifecycle.deleted_at, None);
    let stored = Course::active_query(&conn).get(course.id).unwrap().unwrap();
    assert_eq!(stored, course);
    assert_lifecycle_invariant(&conn);
}

#[test]
fn test_per_record_operation_on_missing_row() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let mut course = course(&conn, &tutor, "Vanishing");
    conn.execute("DELETE FROM courses WHERE id = ?1", [course.id])
        .unwrap();

    let err = soft_delete_record(&conn, &mut course).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(course.lifecycle.is_active());
}

#[test]
fn test_enrollment_get_or_create_is_idempotent() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Enroll me");
    let learner = student(&conn, "learner");

    let (first, created) = EnrollmentRepo::get_or_create(&conn, learner.id, course.id).unwrap();
    assert!(created);
    let (again, created) = EnrollmentRepo::get_or_create(&conn, learner.id, course.id).unwrap();
    assert!(!created);
    assert_eq!(again, first);
}

#[test]
fn test_soft_deleted_enrollment_blocks_reenrollment() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Dropped");
    let learner = student(&conn, "learner");
    let mut enrollment = enroll(&conn, &learner, &course);
    soft_delete_record(&conn, &mut enrollment).unwrap();

    let err = EnrollmentRepo::get_or_create(&conn, learner.id, course.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);

    restore_record(&conn, &mut enrollment).unwrap();
    let (restored, created) = EnrollmentRepo::get_or_create(&conn, learner.id, course.id).unwrap();
    assert!(!created);
    assert_eq!(restored.id, enrollment.id);
}

#[test]
fn test_progress_counts_active_lessons_and_completions() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let (course, _, lessons) = course_tree(&conn, &tutor, "Progress", 1, 3);
    let learner = student(&conn, "learner");
    let enrollment = enroll(&conn, &learner, &course);

    assert_eq!(
        EnrollmentRepo::progress(&conn, &enrollment).unwrap().to_string(),
        "0/3 (0%)"
    );

    LessonProgressRepo::record(&conn, enrollment.id, lessons[0].id, true).unwrap();
    LessonProgressRepo::record(&conn, enrollment.id, lessons[1].id, false).unwrap();
    assert_eq!(
        EnrollmentRepo::progress(&conn, &enrollment).unwrap().to_string(),
        "1/3 (33%)"
    );

    // A trashed lesson leaves the total
    Lesson::active_query(&conn)
        .filter_ids(&[lessons[2].id])
        .soft_delete()
        .unwrap();
    assert_eq!(
        EnrollmentRepo::progress(&conn, &enrollment).unwrap().to_string(),
        "1/2 (50%)"
    );
}

#[test]
fn test_progress_of_course_without_lessons() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Empty");
    let learner = student(&conn, "learner");
    let enrollment = enroll(&conn, &learner, &course);

    let progress = EnrollmentRepo::progress(&conn, &enrollment).unwrap();
    assert_eq!(progress.to_string(), "0/0 (0%)");
}

#[test]
fn test_completion_timestamp_rule() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let (course, _, lessons) = course_tree(&conn, &tutor, "Completion", 1, 1);
    let learner = student(&conn, "learner");
    let enrollment = enroll(&conn, &learner, &course);

    let done = LessonProgressRepo::record(&conn, enrollment.id, lessons[0].id, true).unwrap();
    let stamped = done.completed_at.unwrap();

    let still_done = LessonProgressRepo::record(&conn, enrollment.id, lessons[0].id, true).unwrap();
    assert_eq!(still_done.id, done.id);
    assert_eq!(still_done.completed_at, Some(stamped));

    let undone = LessonProgressRepo::record(&conn, enrollment.id, lessons[0].id, false).unwrap();
    assert!(!undone.is_completed);
    assert_eq!(undone.completed_at, None);

    let mut loaded = undone.clone();
    loaded.is_completed = true;
    LessonProgressRepo::save(&conn, &mut loaded).unwrap();
    assert!(loaded.completed_at.is_some());
}

#[test]
fn test_student_get_or_create_and_user_cascade() {
    let conn = setup();
    let user = UserRepo::create(&conn, &NewUser::new("sam", "sam@example.com").with_age(30)).unwrap();

    let (student, created) = StudentRepo::get_or_create(&conn, user.id).unwrap();
    assert!(created);
    let (same, created) = StudentRepo::get_or_create(&conn, user.id).unwrap();
    assert!(!created);
    assert_eq!(same, student);

    assert!(UserRepo::delete(&conn, user.id).unwrap());
    assert_eq!(Student::all_query(&conn).count().unwrap(), 0);
    assert!(UserRepo::by_username(&conn, "sam").unwrap().is_none());
}

#[test]
fn test_duplicate_username_is_constraint_violation() {
    let conn = setup();
    UserRepo::create(&conn, &NewUser::new("dup", "a@example.com")).unwrap();
    let err = UserRepo::create(&conn, &NewUser::new("dup", "b@example.com")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
}

#[test]
fn test_user_phone_round_trips_but_stays_redacted() {
    let conn = setup();
    let user = UserRepo::create(
        &conn,
        &NewUser::new("phoned", "p@example.com").with_phone("+44 7700 900123"),
    )
    .unwrap();
    let loaded = UserRepo::get(&conn, user.id).unwrap().unwrap();
    assert_eq!(loaded.phone.as_ref().map(|p| p.expose().as_str()), Some("+44 7700 900123"));
    assert!(!format!("{:?}", loaded).contains("7700"));
}
