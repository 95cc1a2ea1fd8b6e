use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

lazy_static! {
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// A single field failure, reported back to the client in the `details`
/// array of a 400 response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug, Clone)]
#[error("Validation failed")]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            details: vec![FieldError {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }
}

/// Inputs that sanitize and validate themselves before touching the store.
/// Validation mutates: string fields come out HTML-stripped and trimmed.
pub trait Validate {
    fn validate(&mut self) -> Result<(), ValidationError>;
}

/// Strip HTML tags and trim surrounding whitespace. Never trust user input.
pub fn sanitize(value: &str) -> String {
    HTML_TAG_REGEX.replace_all(value, "").trim().to_string()
}

pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::single(field, "Invalid ID format"))
}

/// Accumulates field errors so a request reports everything wrong at once.
#[derive(Default)]
pub struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Sanitize in place, then enforce presence and the length cap.
    pub fn required_text(&mut self, field: &str, value: &mut String, max: usize) {
        *value = sanitize(value);
        if value.is_empty() {
            self.push(field, format!("{field} is required"));
        } else if value.chars().count() > max {
            self.push(field, format!("Maximum {max} characters allowed"));
        }
    }

    pub fn optional_text(&mut self, field: &str, value: &mut Option<String>, max: usize) {
        if let Some(v) = value {
            *v = sanitize(v);
            if v.chars().count() > max {
                self.push(field, format!("Maximum {max} characters allowed"));
            }
        }
    }

    /// Length bounds without sanitization, for secrets that must round-trip
    /// exactly as typed.
    pub fn password(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.push(field, format!("Password must be at least {min} characters"));
        } else if len > max {
            self.push(field, format!("Maximum {max} characters allowed"));
        }
    }

    pub fn list(&mut self, field: &str, values: &mut Vec<String>, max_items: usize, max_len: usize) {
        if values.len() > max_items {
            self.push(field, format!("Maximum {max_items} {field} items"));
        }
        for v in values.iter_mut() {
            *v = sanitize(v);
            if v.chars().count() > max_len {
                self.push(field, format!("Maximum {max_len} characters allowed"));
            }
        }
    }

    pub fn optional_list(
        &mut self,
        field: &str,
        values: &mut Option<Vec<String>>,
        max_items: usize,
        max_len: usize,
    ) {
        if let Some(vs) = values {
            self.list(field, vs, max_items, max_len);
        }
    }

    /// Empty strings are allowed (the original treats '' as "unset").
    pub fn url(&mut self, field: &str, value: &Option<String>) {
        if let Some(v) = value {
            if v.is_empty() {
                return;
            }
            match Url::parse(v) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                _ => self.push(field, "Invalid url"),
            }
        }
    }

    pub fn hex_color(&mut self, field: &str, value: &Option<String>) {
        if let Some(v) = value {
            if !HEX_COLOR_REGEX.is_match(v) {
                self.push(field, "Invalid hex color");
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &mut String) {
        *value = value.trim().to_string();
        if !EMAIL_REGEX.is_match(value) {
            self.push(field, "Invalid email address");
        }
    }

    pub fn range(&mut self, field: &str, value: Option<i32>, min: i32, max: i32) {
        if let Some(v) = value {
            if v < min || v > max {
                self.push(field, format!("Must be between {min} and {max}"));
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                details: self.errors,
            })
        }
    }
}
