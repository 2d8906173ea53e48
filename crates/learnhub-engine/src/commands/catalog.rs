//! Catalog read surface: course list, featured courses, course and lesson
//! detail.
//!
//! Everything here reads through the active scope; soft-deleted courses,
//! modules and lessons never show up. Relation counts on cards follow the
//! store's counting rule and include soft-deleted children.

use std::num::IntErrorKind;

use learnhub_core::errors::{ExError, LearnHubError};
use learnhub_core::model::{Course, Lesson, Module, Student};
use learnhub_store::repo::{
    CourseRepo, EnrollmentRepo, InstructorRepo, LessonRepo, ModuleRepo,
};
use learnhub_store::{Query, Result, SoftDeletable};
use rusqlite::Connection;
use serde::Serialize;

use super::logged;

/// Courses per catalog page
pub const COURSES_PER_PAGE: u64 = 12;

/// Courses shown on the home page
pub const FEATURED_COURSES: u64 = 4;

/// A course as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCard {
    pub course: Course,
    pub instructor_username: Option<String>,
    pub modules_count: u64,
    pub lessons_count: u64,
    pub enrollments_count: u64,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub number: u64,
    pub num_pages: u64,
    /// Items across all pages
    pub count: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }
}

/// Page number to show for a raw `page` parameter
///
/// Anything that is not an integer selects the first page; integers outside
/// `1..=num_pages` select the last page, however large they are. There is
/// always at least one page.
pub fn resolve_page_number(raw: Option<&str>, count: u64, per_page: u64) -> u64 {
    let num_pages = num_pages(count, per_page);
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(n)) if n >= 1 && (n as u64) <= num_pages => n as u64,
        Some(Ok(_)) => num_pages,
        Some(Err(e))
            if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) =>
        {
            num_pages
        }
        Some(Err(_)) | None => 1,
    }
}

fn num_pages(count: u64, per_page: u64) -> u64 {
    count.div_ceil(per_page.max(1)).max(1)
}

/// A module on the course page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleOutline {
    pub module: Module,
    pub lessons_count: u64,
    /// Active lessons in order
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    pub course: Course,
    pub instructor_username: Option<String>,
    pub modules: Vec<ModuleOutline>,
    pub modules_count: u64,
    pub lessons_count: u64,
    pub is_enrolled: bool,
    /// First lesson of the first module, the "continue learning" target
    pub first_lesson: Option<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonDetail {
    pub lesson: Lesson,
    pub course: Course,
    /// Sidebar: the course's active modules and lessons in order
    pub modules: Vec<ModuleOutline>,
    pub previous_lesson: Option<Lesson>,
    pub next_lesson: Option<Lesson>,
}

/// Active courses with counts, newest first, one page at a time
pub fn course_list_page(conn: &Connection, page: Option<&str>) -> Result<Page<CourseCard>> {
    logged("course_list_page", || {
        let count = Course::active_query(conn).count()?;
        let number = resolve_page_number(page, count, COURSES_PER_PAGE);

        let query = Course::active_query(conn)
            .limit(COURSES_PER_PAGE)
            .offset((number - 1) * COURSES_PER_PAGE);
        Ok(Page {
            items: course_cards(conn, &query)?,
            number,
            num_pages: num_pages(count, COURSES_PER_PAGE),
            count,
        })
    })
}

/// Newest active courses for the home page
pub fn featured_courses(conn: &Connection) -> Result<Vec<CourseCard>> {
    logged("featured_courses", || {
        course_cards(conn, &Course::active_query(conn).limit(FEATURED_COURSES))
    })
}

/// Active course by slug with its outline
///
/// `viewer_user_id` is the signed-in user, if any; `is_enrolled` is true when
/// their student profile has an active enrollment in the course. The profile
/// lookup ignores the profile's own trash state.
pub fn course_detail(
    conn: &Connection,
    slug: &str,
    viewer_user_id: Option<i64>,
) -> Result<CourseDetail> {
    logged("course_detail", || {
        let course = active_course(conn, slug)?;
        let modules = course_outline(conn, &course)?;

        let lessons_count = modules.iter().map(|m| m.lessons_count).sum();
        let first_lesson = modules
            .first()
            .and_then(|m| m.lessons.first())
            .cloned();

        let viewer_student = match viewer_user_id {
            Some(user_id) => Student::all_query(conn)
                .filter_eq("user_id", user_id)
                .first()?,
            None => None,
        };
        let is_enrolled = match viewer_student {
            Some(student) => EnrollmentRepo::find(conn, student.id, course.id)?.is_some(),
            None => false,
        };

        Ok(CourseDetail {
            instructor_username: InstructorRepo::username(conn, course.instructor_id)?,
            modules_count: modules.len() as u64,
            lessons_count,
            is_enrolled,
            first_lesson,
            modules,
            course,
        })
    })
}

/// An active lesson of an active course with its neighbours
///
/// Previous and next walk the course's active modules in order and, within
/// each, the active lessons in order. A lesson whose module is trashed is
/// still shown but has no neighbours.
pub fn lesson_detail(conn: &Connection, course_slug: &str, lesson_id: i64) -> Result<LessonDetail> {
    logged("lesson_detail", || {
        let course = active_course(conn, course_slug)?;

        let lesson = LessonRepo::active_in_course(conn, course.id)
            .get(lesson_id)?
            .ok_or_else(|| {
                ExError::from(LearnHubError::LessonNotFound {
                    course_slug: course_slug.to_string(),
                    lesson_id,
                })
            })?;

        let modules = course_outline(conn, &course)?;
        let sequence: Vec<&Lesson> = modules.iter().flat_map(|m| m.lessons.iter()).collect();
        let position = sequence.iter().position(|l| l.id == lesson.id);

        let previous_lesson = match position {
            Some(i) if i > 0 => Some(sequence[i - 1].clone()),
            _ => None,
        };
        let next_lesson = position
            .and_then(|i| sequence.get(i + 1))
            .map(|l| (*l).clone());

        Ok(LessonDetail {
            lesson,
            course,
            modules,
            previous_lesson,
            next_lesson,
        })
    })
}

fn active_course(conn: &Connection, slug: &str) -> Result<Course> {
    CourseRepo::by_slug(conn, slug)?.ok_or_else(|| {
        ExError::from(LearnHubError::CourseNotFound {
            slug: slug.to_string(),
        })
    })
}

fn course_cards(conn: &Connection, query: &Query<'_, Course>) -> Result<Vec<CourseCard>> {
    CourseRepo::with_full_counts(query)?
        .into_iter()
        .map(|(course, counts)| {
            Ok(CourseCard {
                instructor_username: InstructorRepo::username(conn, course.instructor_id)?,
                modules_count: counts.modules,
                lessons_count: counts.lessons,
                enrollments_count: counts.enrollments,
                course,
            })
        })
        .collect()
}

fn course_outline(conn: &Connection, course: &Course) -> Result<Vec<ModuleOutline>> {
    let query = Module::active_query(conn).filter_eq("course_id", course.id);
    ModuleRepo::with_lessons_count(&query)?
        .into_iter()
        .map(|(module, lessons_count)| {
            Ok(ModuleOutline {
                lessons: LessonRepo::for_module(conn, module.id)?,
                lessons_count,
                module,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_resolution() {
        // 30 items, 12 per page: 3 pages
        assert_eq!(resolve_page_number(None, 30, 12), 1);
        assert_eq!(resolve_page_number(Some("2"), 30, 12), 2);
        assert_eq!(resolve_page_number(Some(" 3 "), 30, 12), 3);
        assert_eq!(resolve_page_number(Some("abc"), 30, 12), 1);
        assert_eq!(resolve_page_number(Some("2.5"), 30, 12), 1);
        assert_eq!(resolve_page_number(Some("99"), 30, 12), 3);
        assert_eq!(resolve_page_number(Some("0"), 30, 12), 3);
        assert_eq!(resolve_page_number(Some("-1"), 30, 12), 3);
        assert_eq!(resolve_page_number(Some("99999999999999999999"), 30, 12), 3);
        assert_eq!(resolve_page_number(Some("-99999999999999999999"), 30, 12), 3);
        assert_eq!(resolve_page_number(Some("+2"), 30, 12), 2);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        assert_eq!(resolve_page_number(Some("5"), 0, 12), 1);
        assert_eq!(num_pages(0, 12), 1);
        assert_eq!(num_pages(12, 12), 1);
        assert_eq!(num_pages(13, 12), 2);
    }

    #[test]
    fn test_page_navigation_flags() {
        let page: Page<()> = Page {
            items: vec![],
            number: 2,
            num_pages: 3,
            count: 30,
        };
        assert!(page.has_previous());
        assert!(page.has_next());
    }
}
