//! Client-side todo form validation.
//!
//! Runs synchronously before submission so that invalid input never reaches
//! the network. Lengths are counted in characters, not bytes.

use thiserror::Error;

use crate::error::{ApiError, FieldError, VALIDATION_ERROR_CODE};
use crate::types::{CreateTodo, UpdateTodo};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

const TITLE_REQUIRED: &str = "Title is required";
const TITLE_TOO_LONG: &str = "Title cannot exceed 200 characters";
const DESCRIPTION_TOO_LONG: &str = "Description cannot exceed 2000 characters";

/// One or more per-field failures. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input")]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation {
            status: 0,
            code: VALIDATION_ERROR_CODE.to_string(),
            message: errors.to_string(),
            details: errors.fields,
        }
    }
}

fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", TITLE_REQUIRED));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(FieldError::new("title", TITLE_TOO_LONG));
    }
}

fn check_description(description: &str, errors: &mut Vec<FieldError>) {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.push(FieldError::new("description", DESCRIPTION_TOO_LONG));
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Validate the add-todo form and produce the request payload.
///
/// The title is trimmed and an empty description becomes `None`.
pub fn validate_new_todo(title: &str, description: Option<&str>) -> Result<CreateTodo, ValidationErrors> {
    let mut errors = Vec::new();
    check_title(title, &mut errors);
    if let Some(description) = description {
        check_description(description, &mut errors);
    }
    if !errors.is_empty() {
        return Err(ValidationErrors { fields: errors });
    }
    Ok(CreateTodo {
        title: title.trim().to_string(),
        description: normalize_description(description),
    })
}

/// Validate an edit. Only the fields present are checked.
pub fn validate_update(input: &UpdateTodo) -> Result<UpdateTodo, ValidationErrors> {
    let mut errors = Vec::new();
    if let Some(title) = &input.title {
        check_title(title, &mut errors);
    }
    if let Some(description) = &input.description {
        check_description(description, &mut errors);
    }
    if !errors.is_empty() {
        return Err(ValidationErrors { fields: errors });
    }
    Ok(UpdateTodo {
        title: input.title.as_deref().map(|t| t.trim().to_string()),
        // Empty string clears the stored description.
        description: input.description.as_deref().map(|d| d.trim().to_string()),
    })
}

impl CreateTodo {
    pub fn validate(&self) -> Result<CreateTodo, ValidationErrors> {
        validate_new_todo(&self.title, self.description.as_deref())
    }
}

impl UpdateTodo {
    pub fn validate(&self) -> Result<UpdateTodo, ValidationErrors> {
        validate_update(self)
    }
}
