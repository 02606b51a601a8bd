//! Marketplace users
//!
//! The stored record carries an argon2 `passwordHash`. It is never part of a
//! response: reads go through [`UserContact`] or [`UserProfile`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::error::ValidationError;

pub mod fields {
    pub const NATIONAL_ID: &str = "nationalId";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const PASSWORD: &str = "password";
}

/// Stored user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub national_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password_hash: String,
}

/// Registration request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[schema(example = "12345678A")]
    pub national_id: Option<String>,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub password: Option<String>,
}

/// Merge-patch for a user. A supplied `password` is re-hashed before storage.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub national_id: Option<String>,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub password: Option<String>,
}

/// Stored form of a [`UserPatch`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// Public contact card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Everything about a user except credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub national_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            national_id: record.national_id,
            name: record.name,
            email: record.email,
            phone: record.phone,
        }
    }
}

impl From<UserRecord> for UserContact {
    fn from(record: UserRecord) -> Self {
        Self {
            name: record.name,
            email: record.email,
            phone: record.phone,
        }
    }
}

/// Collapse validator output into the first offending field (alphabetical)
pub(crate) fn first_violation(errors: &ValidationErrors) -> ValidationError {
    let mut violations: Vec<_> = errors.field_errors().into_iter().collect();
    violations.sort_by(|a, b| a.0.cmp(&b.0));

    let Some((field, details)) = violations.into_iter().next() else {
        return ValidationError::MalformedBody(errors.to_string());
    };
    let reason = details
        .first()
        .map(|d| match &d.message {
            Some(message) => message.to_string(),
            None => d.code.to_string(),
        })
        .unwrap_or_else(|| "invalid".to_string());
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason,
    }
}

fn non_empty_national_id(value: Option<String>) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField {
            field: fields::NATIONAL_ID,
        }),
        Some(id) if id.trim().is_empty() => Err(ValidationError::EmptyField {
            field: fields::NATIONAL_ID,
        }),
        Some(id) => Ok(id),
    }
}

/// Registration fields that passed validation; the password is still plain
#[derive(Debug, Clone)]
pub struct CheckedUser {
    pub national_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
}

impl CheckedUser {
    pub fn into_record(self, password_hash: String) -> UserRecord {
        UserRecord {
            national_id: self.national_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash,
        }
    }
}

impl NewUser {
    pub fn check(self) -> Result<CheckedUser, ValidationError> {
        let national_id = non_empty_national_id(self.national_id.clone())?;
        let Some(password) = self.password.clone() else {
            return Err(ValidationError::MissingField {
                field: fields::PASSWORD,
            });
        };
        self.validate().map_err(|e| first_violation(&e))?;
        Ok(CheckedUser {
            national_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            password,
        })
    }
}

impl UserPatch {
    /// Validate supplied fields; `national_id`, when present, must not be blank
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.national_id.is_some() {
            non_empty_national_id(self.national_id.clone())?;
        }
        self.validate().map_err(|e| first_violation(&e))
    }
}
