//! Table descriptors for the soft-deletable entities
//!
//! Relations mirror the foreign keys in `migrations/`: `Cascade` where the
//! schema says `ON DELETE CASCADE`, `Protect` where it says `RESTRICT`.

use learnhub_core::model::{Course, Enrollment, Instructor, Lesson, LessonProgress, Module, Student, VideoFile};
use rusqlite::Row;

use crate::soft_delete::{
    lifecycle_from_row, optional_timestamp_column, timestamp_column, OnDelete, Relation,
    SoftDeletable, TableDef,
};

pub static STUDENTS: TableDef = TableDef {
    name: "students",
    label: "profiles.Student",
    columns: &["id", "user_id", "created_at", "updated_at", "is_deleted", "deleted_at"],
    default_order: "id",
    relations: &[Relation {
        name: "enrollments",
        table: &ENROLLMENTS,
        fk_column: "student_id",
        on_delete: OnDelete::Protect,
    }],
};

pub static INSTRUCTORS: TableDef = TableDef {
    name: "instructors",
    label: "profiles.Instructor",
    columns: &["id", "user_id", "bio", "created_at", "updated_at", "is_deleted", "deleted_at"],
    default_order: "id",
    relations: &[Relation {
        name: "courses",
        table: &COURSES,
        fk_column: "instructor_id",
        on_delete: OnDelete::Cascade,
    }],
};

pub static COURSES: TableDef = TableDef {
    name: "courses",
    label: "courses.Course",
    columns: &[
        "id",
        "slug",
        "title",
        "description",
        "instructor_id",
        "created_at",
        "updated_at",
        "is_deleted",
        "deleted_at",
    ],
    default_order: "created_at DESC, id DESC",
    relations: &[
        Relation {
            name: "modules",
            table: &MODULES,
            fk_column: "course_id",
            on_delete: OnDelete::Cascade,
        },
        Relation {
            name: "enrollments",
            table: &ENROLLMENTS,
            fk_column: "course_id",
            on_delete: OnDelete::Protect,
        },
    ],
};

pub static MODULES: TableDef = TableDef {
    name: "modules",
    label: "courses.Module",
    columns: &[
        "id",
        "course_id",
        "title",
        "sort_order",
        "created_at",
        "updated_at",
        "is_deleted",
        "deleted_at",
    ],
    default_order: "sort_order, id",
    relations: &[Relation {
        name: "lessons",
        table: &LESSONS,
        fk_column: "module_id",
        on_delete: OnDelete::Cascade,
    }],
};

pub static LESSONS: TableDef = TableDef {
    name: "lessons",
    label: "courses.Lesson",
    columns: &[
        "id",
        "module_id",
        "title",
        "content",
        "sort_order",
        "video_path",
        "video_size_bytes",
        "created_at",
        "updated_at",
        "is_deleted",
        "deleted_at",
    ],
    default_order: "sort_order, id",
    relations: &[Relation {
        name: "progress",
        table: &LESSON_PROGRESS,
        fk_column: "lesson_id",
        on_delete: OnDelete::Protect,
    }],
};

pub static ENROLLMENTS: TableDef = TableDef {
    name: "enrollments",
    label: "enrollments.Enrollment",
    columns: &[
        "id",
        "student_id",
        "course_id",
        "enrolled_at",
        "created_at",
        "updated_at",
        "is_deleted",
        "deleted_at",
    ],
    default_order: "enrolled_at DESC, id DESC",
    relations: &[Relation {
        name: "progress",
        table: &LESSON_PROGRESS,
        fk_column: "enrollment_id",
        on_delete: OnDelete::Cascade,
    }],
};

pub static LESSON_PROGRESS: TableDef = TableDef {
    name: "lesson_progress",
    label: "enrollments.LessonProgress",
    columns: &[
        "id",
        "enrollment_id",
        "lesson_id",
        "is_completed",
        "completed_at",
        "created_at",
        "updated_at",
        "is_deleted",
        "deleted_at",
    ],
    default_order: "completed_at DESC, id DESC",
    relations: &[],
};

impl SoftDeletable for Student {
    fn table() -> &'static TableDef {
        &STUDENTS
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Student {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}

impl SoftDeletable for Instructor {
    fn table() -> &'static TableDef {
        &INSTRUCTORS
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Instructor {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            bio: row.get("bio")?,
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}

impl SoftDeletable for Course {
    fn table() -> &'static TableDef {
        &COURSES
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Course {
            id: row.get("id")?,
            slug: row.get("slug")?,
            title: row.get("title")?,
            description: row.get("description")?,
            instructor_id: row.get("instructor_id")?,
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}

impl SoftDeletable for Module {
    fn table() -> &'static TableDef {
        &MODULES
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Module {
            id: row.get("id")?,
            course_id: row.get("course_id")?,
            title: row.get("title")?,
            order: row.get("sort_order")?,
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}

impl SoftDeletable for Lesson {
    fn table() -> &'static TableDef {
        &LESSONS
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let path: Option<String> = row.get("video_path")?;
        let size: Option<i64> = row.get("video_size_bytes")?;
        Ok(Lesson {
            id: row.get("id")?,
            module_id: row.get("module_id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            order: row.get("sort_order")?,
            video: path.map(|path| VideoFile {
                path,
                size_bytes: size.unwrap_or(0).max(0) as u64,
            }),
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}

impl SoftDeletable for Enrollment {
    fn table() -> &'static TableDef {
        &ENROLLMENTS
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Enrollment {
            id: row.get("id")?,
            student_id: row.get("student_id")?,
            course_id: row.get("course_id")?,
            enrolled_at: timestamp_column(row, "enrolled_at")?,
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}

impl SoftDeletable for LessonProgress {
    fn table() -> &'static TableDef {
        &LESSON_PROGRESS
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(LessonProgress {
            id: row.get("id")?,
            enrollment_id: row.get("enrollment_id")?,
            lesson_id: row.get("lesson_id")?,
            is_completed: row.get("is_completed")?,
            completed_at: optional_timestamp_column(row, "completed_at")?,
            lifecycle: lifecycle_from_row(row)?,
        })
    }
}
