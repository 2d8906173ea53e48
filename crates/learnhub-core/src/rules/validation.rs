use crate::errors::{LearnHubError, Result};

/// Maximum characters in course, module and lesson titles
pub const MAX_TITLE_CHARS: usize = 200;

pub const MAX_USERNAME_CHARS: usize = 150;

pub const MAX_PHONE_CHARS: usize = 17;

/// Upload limit for lesson videos, in megabytes
pub const MAX_VIDEO_MB: u64 = 500;

/// Validate a course, module or lesson title
///
/// # Errors
///
/// Returns `InvalidTitle` when the title is blank or longer than
/// [`MAX_TITLE_CHARS`] characters.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(LearnHubError::InvalidTitle {
            reason: "title cannot be empty".to_string(),
        });
    }
    let len = title.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(LearnHubError::InvalidTitle {
            reason: format!("title has {} characters, maximum is {}", len, MAX_TITLE_CHARS),
        });
    }
    Ok(())
}

/// # Errors
///
/// Returns `InvalidUsername` when blank or too long.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(LearnHubError::InvalidUsername {
            reason: "username cannot be empty".to_string(),
        });
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(LearnHubError::InvalidUsername {
            reason: format!("username exceeds {} characters", MAX_USERNAME_CHARS),
        });
    }
    Ok(())
}

/// # Errors
///
/// Returns `InvalidPhone` when longer than [`MAX_PHONE_CHARS`].
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.chars().count() > MAX_PHONE_CHARS {
        return Err(LearnHubError::InvalidPhone {
            reason: format!("phone number exceeds {} characters", MAX_PHONE_CHARS),
        });
    }
    Ok(())
}

/// Validate the size of an uploaded lesson video
///
/// The file has already been received when this runs; a hard limit on the
/// request body belongs in the web server in front of the application.
///
/// # Errors
///
/// Returns `VideoTooLarge` when the file exceeds [`MAX_VIDEO_MB`].
pub fn validate_video_file_size(size_bytes: u64) -> Result<()> {
    let max_bytes = MAX_VIDEO_MB * 1024 * 1024;
    if size_bytes > max_bytes {
        return Err(LearnHubError::VideoTooLarge {
            size_bytes,
            max_mb: MAX_VIDEO_MB,
        });
    }
    Ok(())
}
