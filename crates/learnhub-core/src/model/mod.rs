//! Domain models
//!
//! Every entity except `User` follows the soft-delete convention and carries
//! a [`Lifecycle`].

/// Implement [`Record`] for a struct with `id: i64` and `lifecycle: Lifecycle`
macro_rules! impl_record {
    ($ty:ty, $label:literal) => {
        impl $crate::model::lifecycle::Record for $ty {
            const LABEL: &'static str = $label;

            fn id(&self) -> i64 {
                self.id
            }

            fn lifecycle(&self) -> &$crate::model::lifecycle::Lifecycle {
                &self.lifecycle
            }

            fn lifecycle_mut(&mut self) -> &mut $crate::model::lifecycle::Lifecycle {
                &mut self.lifecycle
            }
        }
    };
}

pub mod account;
pub mod course;
pub mod enrollment;
pub mod lifecycle;
pub mod profile;

pub use account::{NewUser, User};
pub use course::{Course, Lesson, Module, NewCourse, NewLesson, NewModule, VideoFile};
pub use enrollment::{Enrollment, LessonProgress, Progress};
pub use lifecycle::{Lifecycle, Record, RecordState};
pub use profile::{Instructor, Student};
