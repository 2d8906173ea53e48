//! Catalog commands

mod common;

use common::*;
use learnhub_core::model::{Course, Enrollment, Lesson, Module, Student};
use learnhub_core::ExErrorKind;
use learnhub_engine::commands::catalog::{
    course_detail, course_list_page, featured_courses, lesson_detail, COURSES_PER_PAGE,
};
use learnhub_engine::commands::enrollment::enroll_in_course;
use learnhub_store::SoftDeletable;

#[test]
fn test_course_list_pagination() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    for i in 0..30 {
        course(&conn, &tutor, &format!("Course {}", i));
    }

    let first = course_list_page(&conn, None).unwrap();
    assert_eq!(first.number, 1);
    assert_eq!(first.num_pages, 3);
    assert_eq!(first.count, 30);
    assert_eq!(first.items.len() as u64, COURSES_PER_PAGE);
    assert!(!first.has_previous());
    assert!(first.has_next());
    // Newest first
    assert_eq!(first.items[0].course.title, "Course 29");
    assert_eq!(first.items[0].instructor_username.as_deref(), Some("tutor"));

    let last = course_list_page(&conn, Some("3")).unwrap();
    assert_eq!(last.items.len(), 6);
    assert_eq!(last.items.last().unwrap().course.title, "Course 0");

    assert_eq!(course_list_page(&conn, Some("abc")).unwrap().number, 1);
    assert_eq!(course_list_page(&conn, Some("42")).unwrap().number, 3);
    assert_eq!(course_list_page(&conn, Some("0")).unwrap().number, 3);
}

#[test]
fn test_course_list_hides_deleted_and_handles_empty_catalog() {
    let conn = setup();
    let empty = course_list_page(&conn, Some("2")).unwrap();
    assert_eq!(empty.number, 1);
    assert_eq!(empty.num_pages, 1);
    assert!(empty.items.is_empty());

    let tutor = instructor(&conn, "tutor");
    let kept = course(&conn, &tutor, "Kept");
    let trashed = course(&conn, &tutor, "Trashed");
    Course::active_query(&conn)
        .filter_ids(&[trashed.id])
        .soft_delete()
        .unwrap();

    let page = course_list_page(&conn, None).unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].course.id, kept.id);
}

#[test]
fn test_featured_courses_carry_counts() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    for i in 0..6 {
        let c = course(&conn, &tutor, &format!("Course {}", i));
        let m = module(&conn, &c, 0);
        lesson(&conn, &m, 0);
        lesson(&conn, &m, 1);
    }

    let featured = featured_courses(&conn).unwrap();
    assert_eq!(featured.len(), 4);
    assert!(featured
        .iter()
        .all(|card| card.modules_count == 1 && card.lessons_count == 2 && card.enrollments_count == 0));
}

#[test]
fn test_course_detail_outline_and_enrollment_flag() {
    let mut conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Detailed");
    let m0 = module(&conn, &course, 0);
    let m1 = module(&conn, &course, 1);
    let first = lesson(&conn, &m0, 0);
    lesson(&conn, &m0, 1);
    lesson(&conn, &m1, 0);
    let learner = user(&conn, "learner");

    let anonymous = course_detail(&conn, "detailed", None).unwrap();
    assert_eq!(anonymous.modules_count, 2);
    assert_eq!(anonymous.lessons_count, 3);
    assert_eq!(anonymous.first_lesson.as_ref().map(|l| l.id), Some(first.id));
    assert!(!anonymous.is_enrolled);
    assert_eq!(anonymous.modules[0].lessons.len(), 2);

    assert!(!course_detail(&conn, "detailed", Some(learner.id)).unwrap().is_enrolled);
    enroll_in_course(&mut conn, learner.id, "detailed").unwrap();
    assert!(course_detail(&conn, "detailed", Some(learner.id)).unwrap().is_enrolled);
}

#[test]
fn test_enrollment_flag_survives_trashed_student_profile() {
    let mut conn = setup();
    let tutor = instructor(&conn, "tutor");
    course(&conn, &tutor, "Kept Seat");
    let learner = user(&conn, "learner");
    let outcome = enroll_in_course(&mut conn, learner.id, "kept-seat").unwrap();

    let student_id = outcome.enrollment.student_id;
    assert_eq!(
        Student::active_query(&conn)
            .filter_ids(&[student_id])
            .soft_delete()
            .unwrap(),
        1
    );

    let detail = course_detail(&conn, "kept-seat", Some(learner.id)).unwrap();
    assert!(detail.is_enrolled);

    // A trashed enrollment still reads as not enrolled
    Enrollment::active_query(&conn)
        .filter_ids(&[outcome.enrollment.id])
        .soft_delete()
        .unwrap();
    assert!(!course_detail(&conn, "kept-seat", Some(learner.id)).unwrap().is_enrolled);
}

#[test]
fn test_course_detail_skips_trashed_modules() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Pruned");
    let m0 = module(&conn, &course, 0);
    let m1 = module(&conn, &course, 1);
    lesson(&conn, &m0, 0);
    let later = lesson(&conn, &m1, 0);
    Module::active_query(&conn)
        .filter_ids(&[m0.id])
        .soft_delete()
        .unwrap();

    let detail = course_detail(&conn, "pruned", None).unwrap();
    assert_eq!(detail.modules_count, 1);
    assert_eq!(detail.first_lesson.map(|l| l.id), Some(later.id));
}

#[test]
fn test_course_detail_unknown_or_deleted_slug() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let c = course(&conn, &tutor, "Hidden");
    Course::active_query(&conn)
        .filter_ids(&[c.id])
        .soft_delete()
        .unwrap();

    assert_eq!(
        course_detail(&conn, "hidden", None).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
    assert_eq!(
        course_detail(&conn, "nope", None).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_lesson_navigation_crosses_modules() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let course = course(&conn, &tutor, "Navigation");
    let m0 = module(&conn, &course, 0);
    let m1 = module(&conn, &course, 1);
    let a = lesson(&conn, &m0, 0);
    let b = lesson(&conn, &m0, 1);
    let c = lesson(&conn, &m1, 0);

    let first = lesson_detail(&conn, "navigation", a.id).unwrap();
    assert!(first.previous_lesson.is_none());
    assert_eq!(first.next_lesson.map(|l| l.id), Some(b.id));

    let middle = lesson_detail(&conn, "navigation", b.id).unwrap();
    assert_eq!(middle.previous_lesson.map(|l| l.id), Some(a.id));
    assert_eq!(middle.next_lesson.map(|l| l.id), Some(c.id));

    let last = lesson_detail(&conn, "navigation", c.id).unwrap();
    assert_eq!(last.previous_lesson.map(|l| l.id), Some(b.id));
    assert!(last.next_lesson.is_none());
    assert_eq!(last.modules.len(), 2);
}

#[test]
fn test_lesson_detail_requires_matching_active_course_and_lesson() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    let one = course(&conn, &tutor, "One");
    let two = course(&conn, &tutor, "Two");
    let m = module(&conn, &one, 0);
    let l = lesson(&conn, &m, 0);
    module(&conn, &two, 0);

    assert_eq!(
        lesson_detail(&conn, "two", l.id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );

    Lesson::active_query(&conn)
        .filter_ids(&[l.id])
        .soft_delete()
        .unwrap();
    assert_eq!(
        lesson_detail(&conn, "one", l.id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_detail_serializes_for_outer_layers() {
    let conn = setup();
    let tutor = instructor(&conn, "tutor");
    course(&conn, &tutor, "Serialized");

    let detail = course_detail(&conn, "serialized", None).unwrap();
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["course"]["slug"], "serialized");
    assert_eq!(json["modules_count"], 0);
}
