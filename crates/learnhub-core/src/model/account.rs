use chrono::{DateTime, Utc};
use learnhub_core_types::Sensitive;

use crate::errors::Result;
use crate::rules::validation;

/// Site account
///
/// Accounts are not soft-deletable: removing a user removes its profiles
/// through the database cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: Option<u32>,
    pub phone: Option<Sensitive<String>>,
    pub date_joined: DateTime<Utc>,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

/// Fields of a user about to be created
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub age: Option<u32>,
    pub phone: Option<Sensitive<String>>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(Sensitive::new(phone.into()));
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidUsername` or `InvalidPhone` when a field is out of bounds.
    pub fn validate(&self) -> Result<()> {
        validation::validate_username(&self.username)?;
        if let Some(phone) = &self.phone {
            validation::validate_phone(phone.expose())?;
        }
        Ok(())
    }
}
