//! Input-shape heuristics for form fields.
//!
//! These checks help a form flag obvious typos inline. They are not
//! RFC-complete and the encoder never depends on them.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Field, ValidationError, ValidationKind};
use crate::payload::{format_url, is_blank, ContactFields, Request};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern should be valid regex")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[0-9\s\-()]{10,}$").expect("phone pattern should be valid regex")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[-a-zA-Z0-9+&@#/%?=~_|!:,.;]*[-a-zA-Z0-9+&@#/%=~_|]$")
        .expect("url pattern should be valid regex")
});

type FieldResult = Result<(), ValidationError>;

/// Checks an email address. Blank input is accepted.
pub fn validate_email(email: &str) -> FieldResult {
    if is_blank(email) || EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::new(Field::Email, ValidationKind::InvalidEmail))
    }
}

/// Checks a phone number: optional leading `+`, then at least ten digits,
/// spaces, dashes or parentheses. Blank input is accepted.
pub fn validate_phone(phone: &str) -> FieldResult {
    if is_blank(phone) || PHONE_PATTERN.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new(Field::Phone, ValidationKind::InvalidPhone))
    }
}

/// Checks a URL after scheme normalization. Blank input is accepted.
pub fn validate_url(url: &str) -> FieldResult {
    check_url(url, Field::Url, ValidationKind::InvalidUrl)
}

/// Same check as [`validate_url`], reported against the contact website field
/// with its own message.
pub fn validate_website(website: &str) -> FieldResult {
    check_url(website, Field::Website, ValidationKind::InvalidWebsite)
}

fn check_url(url: &str, field: Field, kind: ValidationKind) -> FieldResult {
    if is_blank(url) || URL_PATTERN.is_match(format_url(url).as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new(field, kind))
    }
}

fn require(value: &str, field: Field) -> FieldResult {
    if is_blank(value) {
        Err(ValidationError::new(field, ValidationKind::Required))
    } else {
        Ok(())
    }
}

/// Validates every contact field and collects all failures.
///
/// First name, last name and phone are required; email and website are
/// shape-checked only when present.
pub fn validate_contact(fields: &ContactFields) -> Result<(), Vec<ValidationError>> {
    let phone = require(&fields.phone, Field::Phone).and_then(|_| validate_phone(&fields.phone));
    let errors: Vec<ValidationError> = [
        require(&fields.first_name, Field::FirstName),
        require(&fields.last_name, Field::LastName),
        phone,
        validate_email(&fields.email),
        validate_website(&fields.website),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Request {
    /// Runs the checks appropriate for this request shape.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        match self {
            Request::Text(text) => require(text, Field::Text).map_err(|err| vec![err]),
            Request::Url(url) => require(url, Field::Url)
                .and_then(|_| validate_url(url))
                .map_err(|err| vec![err]),
            Request::Contact(fields) => validate_contact(fields),
        }
    }
}
