use serde::{Deserialize, Serialize};

use super::lifecycle::Lifecycle;
use crate::errors::Result;
use crate::rules::validation;

/// Top of the content hierarchy: Course → Module → Lesson
///
/// The slug is generated from the title on first insert and never changes
/// afterwards, even when the title does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub instructor_id: i64,
    pub lifecycle: Lifecycle,
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub instructor_id: i64,
}

impl NewCourse {
    pub fn new(title: impl Into<String>, instructor_id: i64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            instructor_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidTitle` for blank or over-long titles.
    pub fn validate(&self) -> Result<()> {
        validation::validate_title(&self.title)
    }
}

/// Chapter of a course; `order` is unique within the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub order: u32,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewModule {
    pub course_id: i64,
    pub title: String,
    pub order: u32,
}

impl NewModule {
    pub fn new(course_id: i64, title: impl Into<String>, order: u32) -> Self {
        Self {
            course_id,
            title: title.into(),
            order,
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidTitle` for blank or over-long titles.
    pub fn validate(&self) -> Result<()> {
        validation::validate_title(&self.title)
    }
}

/// Reference to an uploaded lesson video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
    pub path: String,
    pub size_bytes: u64,
}

/// Atomic unit of content; `order` is unique within the module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub content: String,
    pub order: u32,
    pub video: Option<VideoFile>,
    pub lifecycle: Lifecycle,
}

impl Lesson {
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLesson {
    pub module_id: i64,
    pub title: String,
    pub content: String,
    pub order: u32,
    pub video: Option<VideoFile>,
}

impl NewLesson {
    pub fn new(module_id: i64, title: impl Into<String>, order: u32) -> Self {
        Self {
            module_id,
            title: title.into(),
            content: String::new(),
            order,
            video: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_video(mut self, path: impl Into<String>, size_bytes: u64) -> Self {
        self.video = Some(VideoFile {
            path: path.into(),
            size_bytes,
        });
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidTitle`, or `VideoTooLarge` when the attached video
    /// exceeds the upload limit.
    pub fn validate(&self) -> Result<()> {
        validation::validate_title(&self.title)?;
        if let Some(video) = &self.video {
            validation::validate_video_file_size(video.size_bytes)?;
        }
        Ok(())
    }
}

impl_record!(Course, "courses.Course");
impl_record!(Module, "courses.Module");
impl_record!(Lesson, "courses.Lesson");
