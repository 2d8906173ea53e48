//! Redaction wrapper for personal data
//!
//! Account fields such as phone numbers are wrapped in `Sensitive<T>` so that
//! `Debug`/`Display` output (and therefore log lines) never contain them.

use std::fmt;

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use learnhub_core_types::Sensitive;
///
/// let phone = Sensitive::new("+44 20 7946 0000");
/// assert_eq!(format!("{:?}", phone), "***REDACTED***");
/// assert_eq!(phone.expose(), &"+44 20 7946 0000");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Access the underlying value (persistence, outbound messages)
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: PartialEq> PartialEq for Sensitive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq> Eq for Sensitive<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_redact() {
        let phone = Sensitive::new("0123456789");
        assert_eq!(format!("{:?}", phone), "***REDACTED***");
        assert_eq!(format!("{}", phone), "***REDACTED***");
    }

    #[test]
    fn test_equality_compares_inner_values() {
        assert_eq!(Sensitive::new(1), Sensitive::new(1));
        assert_ne!(Sensitive::new(1), Sensitive::new(2));
    }

    #[test]
    fn test_redacted_inside_struct_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Account {
            username: String,
            phone: Option<Sensitive<String>>,
        }

        let account = Account {
            username: "alice".to_string(),
            phone: Some("555-0100".to_string().into()),
        };

        let debug_str = format!("{:?}", account);
        assert!(debug_str.contains("alice"));
        assert!(!debug_str.contains("555-0100"));
    }
}
