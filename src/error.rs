//! Error types for every stage of the pipeline.
//!
//! Validation failures are per-field and never block each other. Encoding
//! failures are terminal for a single generation attempt and never come with a
//! partial image.

use std::fmt;

use thiserror::Error;

/// The form field a [`ValidationError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Text,
    Url,
    FirstName,
    LastName,
    Phone,
    Email,
    Website,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Text => "text",
            Field::Url => "url",
            Field::FirstName => "first name",
            Field::LastName => "last name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Website => "website",
        };
        f.write_str(name)
    }
}

/// What was wrong with a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationKind {
    #[error("Required")]
    Required,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Please enter a valid URL")]
    InvalidUrl,

    #[error("Please enter a valid website URL")]
    InvalidWebsite,
}

/// A single field that failed the input-shape heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind}")]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationKind,
}

impl ValidationError {
    pub fn new(field: Field, kind: ValidationKind) -> Self {
        Self { field, kind }
    }
}

/// Failure to turn a payload into a raster image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("payload of {bytes} bytes exceeds the symbol capacity")]
    DataTooLong { bytes: usize },

    #[error("symbol needs {required} pixels per side but only {available} are available")]
    GridTooSmall { required: u32, available: u32 },

    #[error("symbology engine failed: {0}")]
    Engine(String),
}

/// Failure to hand a finished image to the outside world.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure to load or accept generator settings.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid config value for '{key}': {message}")]
    Invalid { key: String, message: String },
}

/// Failure of a full format-then-encode request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("input validation failed ({} field(s))", .0.len())]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_field() {
        let err = ValidationError::new(Field::Email, ValidationKind::InvalidEmail);
        assert_eq!(err.to_string(), "email: Please enter a valid email address");
    }

    #[test]
    fn website_message_differs_from_url_message() {
        let url = ValidationError::new(Field::Url, ValidationKind::InvalidUrl);
        let website = ValidationError::new(Field::Website, ValidationKind::InvalidWebsite);
        assert_eq!(url.to_string(), "url: Please enter a valid URL");
        assert_eq!(website.to_string(), "website: Please enter a valid website URL");
    }

    #[test]
    fn grid_too_small_reports_both_sizes() {
        let err = EncodeError::GridTooSmall { required: 29, available: 20 };
        let msg = err.to_string();
        assert!(msg.contains("29"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn encode_error_is_transparent_inside_generate_error() {
        let err: GenerateError = EncodeError::EmptyPayload.into();
        assert_eq!(err.to_string(), "payload is empty");
    }
}
