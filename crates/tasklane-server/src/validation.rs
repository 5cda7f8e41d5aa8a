//! Request validation.
//!
//! Validators check an incoming JSON body and yield either the validated
//! attributes (known fields only) or per-field error messages.

use std::fmt;

use serde_json::Value;
use tasklane_core::{Attributes, TaskStatus};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// Field name to error messages, in the order fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error message to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    /// Builder form of `add`.
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// First message recorded for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }
}

impl FromIterator<(String, Vec<String>)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, messages) in iter {
            for message in messages {
                errors.add(field.clone(), message);
            }
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields.iter().map(|(field, _)| field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Validation rules for task create and update bodies.
pub struct TaskRequest;

impl TaskRequest {
    /// Rules for creating a task: `title` is required.
    pub fn store(body: &Value) -> Result<Attributes, FieldErrors> {
        Self::validate(body, true)
    }

    /// Rules for updating a task: every field is optional.
    pub fn update(body: &Value) -> Result<Attributes, FieldErrors> {
        Self::validate(body, false)
    }

    fn validate(body: &Value, title_required: bool) -> Result<Attributes, FieldErrors> {
        let Value::Object(fields) = body else {
            return Err(FieldErrors::new().with("body", "The request body must be a JSON object."));
        };

        let mut errors = FieldErrors::new();
        let mut validated = Attributes::new();

        match fields.get("title") {
            None | Some(Value::Null) if title_required => {
                errors.add("title", "The title field is required.");
            }
            None => {}
            Some(Value::String(title)) => {
                if title.trim().is_empty() {
                    errors.add("title", "The title field is required.");
                } else if title.chars().count() > TITLE_MAX_CHARS {
                    errors.add(
                        "title",
                        format!(
                            "The title field must not be greater than {} characters.",
                            TITLE_MAX_CHARS
                        ),
                    );
                } else {
                    validated.insert("title", title.clone());
                }
            }
            Some(_) => errors.add("title", "The title field must be a string."),
        }

        match fields.get("description") {
            None => {}
            Some(Value::Null) => {
                validated.insert("description", Value::Null);
            }
            Some(Value::String(description)) => {
                validated.insert("description", description.clone());
            }
            Some(_) => errors.add("description", "The description field must be a string."),
        }

        match fields.get("status") {
            None | Some(Value::Null) => {}
            Some(Value::Number(code)) => match code.as_i64().map(TaskStatus::try_from) {
                Some(Ok(status)) => {
                    validated.insert("status", status);
                }
                Some(Err(_)) => errors.add("status", "The selected status is invalid."),
                None => errors.add("status", "The status field must be an integer."),
            },
            Some(_) => errors.add("status", "The status field must be an integer."),
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_errors_keep_insertion_order() {
        let errors = FieldErrors::new()
            .with("name", "required")
            .with("email", "invalid")
            .with("email", "taken");

        let collected: Vec<(&str, usize)> = errors.iter().map(|(f, m)| (f, m.len())).collect();
        assert_eq!(collected, vec![("name", 1), ("email", 2)]);
        assert_eq!(errors.first("email"), Some("invalid"));
        assert_eq!(errors.to_string(), "invalid fields: name, email");
    }

    #[test]
    fn test_store_requires_title() {
        let errors = TaskRequest::store(&json!({})).unwrap_err();
        assert_eq!(errors.first("title"), Some("The title field is required."));

        let errors = TaskRequest::store(&json!({"title": "   "})).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_store_reports_every_invalid_field() {
        let errors = TaskRequest::store(&json!({
            "title": 5,
            "description": ["x"],
            "status": 9,
        }))
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["title", "description", "status"]);
        assert_eq!(errors.first("status"), Some("The selected status is invalid."));
    }

    #[test]
    fn test_store_keeps_only_known_fields() {
        let attrs = TaskRequest::store(&json!({
            "title": "Write docs",
            "status": 1,
            "owner": "someone",
        }))
        .unwrap();

        assert_eq!(attrs.get("title"), Some(&json!("Write docs")));
        assert_eq!(attrs.get("status"), Some(&json!(1)));
        assert!(!attrs.contains("owner"));
    }

    #[test]
    fn test_title_length_limit() {
        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(TaskRequest::store(&json!({ "title": long })).is_err());

        let exact = "x".repeat(TITLE_MAX_CHARS);
        assert!(TaskRequest::store(&json!({ "title": exact })).is_ok());
    }

    #[test]
    fn test_update_allows_partial_bodies() {
        let attrs = TaskRequest::update(&json!({"status": 2})).unwrap();
        assert_eq!(attrs.len(), 1);

        assert!(TaskRequest::update(&json!({"status": 1.5})).is_err());
        assert!(TaskRequest::update(&json!([1])).unwrap_err().first("body").is_some());
    }
}
