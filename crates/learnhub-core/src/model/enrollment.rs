use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::Lifecycle;

/// A student's enrollment in a course; unique per (student, course)
///
/// Students and courses with enrollments cannot be hard-deleted until the
/// enrollments are removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Progress of one enrollment on one lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub id: i64,
    pub enrollment_id: i64,
    pub lesson_id: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub lifecycle: Lifecycle,
}

impl LessonProgress {
    /// Mark completion state, keeping `completed_at` consistent with it
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.is_completed = completed;
        self.apply_completion_rule(now);
    }

    /// Stamp `completed_at` on first completion and clear it when not
    /// completed; runs on every direct save.
    pub fn apply_completion_rule(&mut self, now: DateTime<Utc>) {
        if self.is_completed && self.completed_at.is_none() {
            self.completed_at = Some(now);
        } else if !self.is_completed {
            self.completed_at = None;
        }
    }
}

impl_record!(Enrollment, "enrollments.Enrollment");
impl_record!(LessonProgress, "enrollments.LessonProgress");

/// Completed vs. total lessons of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
}

impl Progress {
    /// Whole percentage, rounded down; 0 when the course has no lessons
    pub fn percentage(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }
}

/// Renders as `completed/total (pct%)`
impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percentage())
    }
}
