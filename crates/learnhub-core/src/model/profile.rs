use serde::{Deserialize, Serialize};

use super::lifecycle::Lifecycle;

/// Learner profile attached one-to-one to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub lifecycle: Lifecycle,
}

/// Teaching profile attached one-to-one to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: i64,
    pub user_id: i64,
    /// Biography shown on course pages
    pub bio: String,
    pub lifecycle: Lifecycle,
}

impl_record!(Student, "profiles.Student");
impl_record!(Instructor, "profiles.Instructor");
