use learnhub_core_types::RequestId;
use thiserror::Error;

/// Result type alias using LearnHubError
pub type Result<T> = std::result::Result<T, LearnHubError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code usable by callers, tests and any outer
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    InvalidTitle,
    FileTooLarge,

    // Lookup
    NotFound,

    // Integrity
    ConstraintViolation,
    /// A row violates the `is_deleted`/`deleted_at` pairing
    InvariantViolation,

    // Integration/IO
    Io,
    Persistence,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidTitle => "ERR_INVALID_TITLE",
            ExErrorKind::FileTooLarge => "ERR_FILE_TOO_LARGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Storage failures travel through this type unchanged in
/// meaning: the data access layer only attaches the operation and table.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_kind: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_kind: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the entity kind (a table label such as `courses.Course`)
    pub fn with_entity_kind(mut self, kind: impl Into<String>) -> Self {
        self.entity_kind = Some(kind.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_kind(&self) -> Option<&str> {
        self.entity_kind.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        match (&self.entity_kind, &self.entity_id) {
            (Some(kind), Some(id)) => write!(f, " ({} {})", kind, id)?,
            (Some(kind), None) => write!(f, " ({})", kind)?,
            (None, Some(id)) => write!(f, " (entity_id: {})", id)?,
            (None, None) => {}
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " [request {}]", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for LearnHub
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LearnHubError {
    // ===== Validation =====
    #[error("Invalid title: {reason}")]
    InvalidTitle { reason: String },

    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Invalid phone number: {reason}")]
    InvalidPhone { reason: String },

    /// Uploaded lesson video exceeds the size limit
    #[error(
        "Video file size cannot exceed {max_mb}MB. Your file is {:.1}MB.",
        megabytes(.size_bytes)
    )]
    VideoTooLarge { size_bytes: u64, max_mb: u64 },

    // ===== Lookup =====
    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("Course not found: {slug}")]
    CourseNotFound { slug: String },

    #[error("Lesson {lesson_id} not found in course {course_slug}")]
    LessonNotFound { course_slug: String, lesson_id: i64 },

    #[error("No enrollment of {username} in course {slug}")]
    EnrollmentNotFound { username: String, slug: String },

    // ===== Lifecycle =====
    /// Per-record soft delete flag and timestamp disagree
    #[error("{label} {id} violates soft-delete invariant: {reason}")]
    LifecycleInvariant {
        label: String,
        id: i64,
        reason: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

/// Conversion from LearnHubError to the canonical ExError
impl From<LearnHubError> for ExError {
    fn from(err: LearnHubError) -> Self {
        let message = err.to_string();
        match err {
            LearnHubError::InvalidTitle { .. } => {
                ExError::new(ExErrorKind::InvalidTitle).with_message(message)
            }
            LearnHubError::InvalidUsername { .. } | LearnHubError::InvalidPhone { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            LearnHubError::VideoTooLarge { .. } => ExError::new(ExErrorKind::FileTooLarge)
                .with_op("validate_video_file_size")
                .with_message(message),
            LearnHubError::UserNotFound { username } => ExError::new(ExErrorKind::NotFound)
                .with_entity_kind("accounts.User")
                .with_entity_id(username)
                .with_message(message),
            LearnHubError::CourseNotFound { slug } => ExError::new(ExErrorKind::NotFound)
                .with_entity_kind("courses.Course")
                .with_entity_id(slug)
                .with_message(message),
            LearnHubError::LessonNotFound { lesson_id, .. } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_kind("courses.Lesson")
                    .with_entity_id(lesson_id.to_string())
                    .with_message(message)
            }
            LearnHubError::EnrollmentNotFound { .. } => ExError::new(ExErrorKind::NotFound)
                .with_entity_kind("enrollments.Enrollment")
                .with_message(message),
            LearnHubError::LifecycleInvariant { label, id, .. } => {
                ExError::new(ExErrorKind::InvariantViolation)
                    .with_entity_kind(label)
                    .with_entity_id(id.to_string())
                    .with_message(message)
            }
            LearnHubError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
