use learnhub_core::model::lifecycle::{now, to_millis, Lifecycle};
use learnhub_core::model::{Course, Lesson, Module, NewCourse, NewLesson, NewModule};
use learnhub_core::rules::validation;
use learnhub_core::slug;
use learnhub_core::{ExError, LearnHubError, Record};
use rusqlite::{params, Connection};

use crate::errors::{from_rusqlite, record_missing, Result};
use crate::soft_delete::{Annotated, Query, SoftDeletable};

/// Module, lesson and enrollment counts of a course
///
/// Like every relation count these include soft-deleted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseCounts {
    pub modules: u64,
    pub lessons: u64,
    pub enrollments: u64,
}

pub struct CourseRepo;

impl CourseRepo {
    /// Validate and insert a course under a fresh unique slug
    pub fn create(conn: &Connection, new_course: &NewCourse) -> Result<Course> {
        new_course
            .validate()
            .map_err(|e| ExError::from(e).with_op("create_course"))?;

        let slug = Self::unique_slug(conn, &new_course.title)?;
        let lifecycle = Lifecycle::new(now());
        conn.execute(
            "INSERT INTO courses (slug, title, description, instructor_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                slug,
                new_course.title,
                new_course.description,
                new_course.instructor_id,
                to_millis(lifecycle.created_at),
                to_millis(lifecycle.updated_at),
            ],
        )
        .map_err(|e| insert_error(e, "create_course", Course::table().label))?;

        Ok(Course {
            id: conn.last_insert_rowid(),
            slug,
            title: new_course.title.clone(),
            description: new_course.description.clone(),
            instructor_id: new_course.instructor_id,
            lifecycle,
        })
    }

    /// First free slug derived from `title`, checked against every row
    /// including soft-deleted ones
    pub fn unique_slug(conn: &Connection, title: &str) -> Result<String> {
        let base = slug::base_slug(title);
        for candidate in slug::candidates(&base) {
            let taken = Course::all_query(conn)
                .filter_eq("slug", candidate.clone())
                .exists()?;
            if !taken {
                return Ok(candidate);
            }
        }
        Err(LearnHubError::Internal {
            message: format!("no free slug for '{}'", base),
        }
        .into())
    }

    /// Persist edits to a loaded course; the slug is never rewritten
    pub fn save(conn: &Connection, course: &mut Course) -> Result<()> {
        validation::validate_title(&course.title)
            .map_err(|e| ExError::from(e).with_op("save_course"))?;
        course
            .check_lifecycle()
            .map_err(|e| ExError::from(e).with_op("save_course"))?;

        let mut lifecycle = course.lifecycle.clone();
        lifecycle.touch(now());
        let updated = conn
            .execute(
                "UPDATE courses SET title = ?1, description = ?2, instructor_id = ?3,
                    is_deleted = ?4, deleted_at = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    course.title,
                    course.description,
                    course.instructor_id,
                    lifecycle.is_deleted,
                    lifecycle.deleted_at.map(to_millis),
                    to_millis(lifecycle.updated_at),
                    course.id,
                ],
            )
            .map_err(|e| insert_error(e, "save_course", Course::table().label))?;
        if updated == 0 {
            return Err(record_missing("save_course", Course::table().label, course.id));
        }

        course.lifecycle = lifecycle;
        Ok(())
    }

    /// Active course with this slug
    pub fn by_slug(conn: &Connection, slug: &str) -> Result<Option<Course>> {
        Course::active_query(conn)
            .filter_eq("slug", slug.to_string())
            .first()
    }

    /// Courses of `query` with module, lesson and enrollment counts
    pub fn with_full_counts(query: &Query<'_, Course>) -> Result<Vec<(Course, CourseCounts)>> {
        let annotated = query.with_counts(&["modules", "modules__lessons", "enrollments"])?;
        Ok(annotated
            .into_iter()
            .map(|a| {
                let counts = CourseCounts {
                    modules: a.count("modules_count"),
                    lessons: a.count("modules_lessons_count"),
                    enrollments: a.count("enrollments_count"),
                };
                (a.record, counts)
            })
            .collect())
    }
}

pub struct ModuleRepo;

impl ModuleRepo {
    pub fn create(conn: &Connection, new_module: &NewModule) -> Result<Module> {
        new_module
            .validate()
            .map_err(|e| ExError::from(e).with_op("create_module"))?;

        let lifecycle = Lifecycle::new(now());
        conn.execute(
            "INSERT INTO modules (course_id, title, sort_order, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_module.course_id,
                new_module.title,
                new_module.order,
                to_millis(lifecycle.created_at),
                to_millis(lifecycle.updated_at),
            ],
        )
        .map_err(|e| insert_error(e, "create_module", Module::table().label))?;

        Ok(Module {
            id: conn.last_insert_rowid(),
            course_id: new_module.course_id,
            title: new_module.title.clone(),
            order: new_module.order,
            lifecycle,
        })
    }

    pub fn save(conn: &Connection, module: &mut Module) -> Result<()> {
        validation::validate_title(&module.title)
            .map_err(|e| ExError::from(e).with_op("save_module"))?;
        module
            .check_lifecycle()
            .map_err(|e| ExError::from(e).with_op("save_module"))?;

        let mut lifecycle = module.lifecycle.clone();
        lifecycle.touch(now());
        let updated = conn
            .execute(
                "UPDATE modules SET course_id = ?1, title = ?2, sort_order = ?3,
                    is_deleted = ?4, deleted_at = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    module.course_id,
                    module.title,
                    module.order,
                    lifecycle.is_deleted,
                    lifecycle.deleted_at.map(to_millis),
                    to_millis(lifecycle.updated_at),
                    module.id,
                ],
            )
            .map_err(|e| insert_error(e, "save_module", Module::table().label))?;
        if updated == 0 {
            return Err(record_missing("save_module", Module::table().label, module.id));
        }

        module.lifecycle = lifecycle;
        Ok(())
    }

    /// Active modules of a course in order
    pub fn for_course(conn: &Connection, course_id: i64) -> Result<Vec<Module>> {
        Module::active_query(conn)
            .filter_eq("course_id", course_id)
            .fetch()
    }

    /// Modules of `query` with their lesson counts
    pub fn with_lessons_count(query: &Query<'_, Module>) -> Result<Vec<(Module, u64)>> {
        let annotated: Vec<Annotated<Module>> = query.with_counts(&["lessons"])?;
        Ok(annotated
            .into_iter()
            .map(|a| {
                let lessons = a.count("lessons_count");
                (a.record, lessons)
            })
            .collect())
    }
}

pub struct LessonRepo;

impl LessonRepo {
    pub fn create(conn: &Connection, new_lesson: &NewLesson) -> Result<Lesson> {
        new_lesson
            .validate()
            .map_err(|e| ExError::from(e).with_op("create_lesson"))?;

        let lifecycle = Lifecycle::new(now());
        conn.execute(
            "INSERT INTO lessons (module_id, title, content, sort_order, video_path, video_size_bytes,
                                  created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new_lesson.module_id,
                new_lesson.title,
                new_lesson.content,
                new_lesson.order,
                new_lesson.video.as_ref().map(|v| v.path.as_str()),
                new_lesson.video.as_ref().map(|v| size_column(v.size_bytes)),
                to_millis(lifecycle.created_at),
                to_millis(lifecycle.updated_at),
            ],
        )
        .map_err(|e| insert_error(e, "create_lesson", Lesson::table().label))?;

        Ok(Lesson {
            id: conn.last_insert_rowid(),
            module_id: new_lesson.module_id,
            title: new_lesson.title.clone(),
            content: new_lesson.content.clone(),
            order: new_lesson.order,
            video: new_lesson.video.clone(),
            lifecycle,
        })
    }

    pub fn save(conn: &Connection, lesson: &mut Lesson) -> Result<()> {
        validation::validate_title(&lesson.title)
            .map_err(|e| ExError::from(e).with_op("save_lesson"))?;
        if let Some(video) = &lesson.video {
            validation::validate_video_file_size(video.size_bytes)
                .map_err(|e| ExError::from(e).with_op("save_lesson"))?;
        }
        lesson
            .check_lifecycle()
            .map_err(|e| ExError::from(e).with_op("save_lesson"))?;

        let mut lifecycle = lesson.lifecycle.clone();
        lifecycle.touch(now());
        let updated = conn
            .execute(
                "UPDATE lessons SET module_id = ?1, title = ?2, content = ?3, sort_order = ?4,
                    video_path = ?5, video_size_bytes = ?6,
                    is_deleted = ?7, deleted_at = ?8, updated_at = ?9
                 WHERE id = ?10",
                params![
                    lesson.module_id,
                    lesson.title,
                    lesson.content,
                    lesson.order,
                    lesson.video.as_ref().map(|v| v.path.as_str()),
                    lesson.video.as_ref().map(|v| size_column(v.size_bytes)),
                    lifecycle.is_deleted,
                    lifecycle.deleted_at.map(to_millis),
                    to_millis(lifecycle.updated_at),
                    lesson.id,
                ],
            )
            .map_err(|e| insert_error(e, "save_lesson", Lesson::table().label))?;
        if updated == 0 {
            return Err(record_missing("save_lesson", Lesson::table().label, lesson.id));
        }

        lesson.lifecycle = lifecycle;
        Ok(())
    }

    /// Active lessons of a module in order
    pub fn for_module(conn: &Connection, module_id: i64) -> Result<Vec<Lesson>> {
        Lesson::active_query(conn)
            .filter_eq("module_id", module_id)
            .fetch()
    }

    /// Active lessons whose module belongs to the course, whether or not the
    /// module itself is deleted
    pub fn active_in_course(conn: &Connection, course_id: i64) -> Query<'_, Lesson> {
        Lesson::active_query(conn).filter_raw(
            "module_id IN (SELECT id FROM modules WHERE course_id = ?)",
            vec![course_id.into()],
        )
    }
}

fn size_column(size_bytes: u64) -> i64 {
    i64::try_from(size_bytes).unwrap_or(i64::MAX)
}

fn insert_error(err: rusqlite::Error, op: &str, label: &str) -> ExError {
    from_rusqlite(err)
        .with_op(op.to_string())
        .with_entity_kind(label.to_string())
}
