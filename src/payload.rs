//! Payload formatting.
//!
//! Turns the three supported input shapes (free text, a website URL, a contact
//! card) into the one canonical string that gets encoded into the symbol. All
//! functions here are pure: the same input always yields byte-identical output.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The canonical text encoded into a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload(String);

impl Payload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in bytes of the UTF-8 encoding.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Payload> for String {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// Contact card fields as collected by a form.
///
/// Every field defaults to the empty string. Name and phone are required by
/// form convention only; the formatter accepts any combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub birthday: String,
    pub website: String,
    pub organization: String,
    pub job_title: String,
}

/// One generation request, passed by value and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Request {
    Text(String),
    Url(String),
    Contact(ContactFields),
}

impl Request {
    /// Formats the request into its payload.
    pub fn to_payload(&self) -> Payload {
        let payload = match self {
            Request::Text(text) => format_text(text),
            Request::Url(url) => format_url(url),
            Request::Contact(fields) => format_contact(fields),
        };
        debug!(kind = self.kind(), bytes = payload.len(), "Payload formatted");
        payload
    }

    /// Short lowercase name of the request shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Text(_) => "text",
            Request::Url(_) => "url",
            Request::Contact(_) => "contact",
        }
    }
}

/// Plain text is encoded as-is.
pub fn format_text(text: &str) -> Payload {
    Payload::new(text)
}

/// Normalizes a website address to an absolute URL.
///
/// `https://` is prepended unless the input already starts with `http://` or
/// `https://`. Only the prefix is inspected; nothing else is rewritten.
///
/// # Example
///
/// ```
/// use qrbuilder::payload::format_url;
///
/// assert_eq!(format_url("example.com").as_str(), "https://example.com");
/// assert_eq!(format_url("http://example.com").as_str(), "http://example.com");
/// ```
pub fn format_url(url: &str) -> Payload {
    if url.starts_with("http://") || url.starts_with("https://") {
        Payload::new(url)
    } else {
        Payload::new(format!("https://{url}"))
    }
}

/// Serializes contact fields as a vCard 3.0 record.
///
/// Line order is fixed. Blank fields are omitted entirely, and the `FN`/`N`
/// pair is only written when the combined name is non-blank. Values are
/// written verbatim: `;`, `,`, `\` and newlines are not escaped.
///
/// # Example
///
/// ```
/// use qrbuilder::payload::{format_contact, ContactFields};
///
/// let fields = ContactFields {
///     first_name: "John".into(),
///     last_name: "Doe".into(),
///     phone: "+15551234567".into(),
///     ..Default::default()
/// };
/// assert_eq!(
///     format_contact(&fields).as_str(),
///     "BEGIN:VCARD\nVERSION:3.0\nFN:John Doe\nN:Doe;John;;;\nTEL:+15551234567\nEND:VCARD"
/// );
/// ```
pub fn format_contact(fields: &ContactFields) -> Payload {
    let mut lines: Vec<String> = vec!["BEGIN:VCARD".into(), "VERSION:3.0".into()];

    let full_name = format!("{} {}", fields.first_name, fields.last_name);
    let full_name = full_name.trim();
    if !full_name.is_empty() {
        lines.push(format!("FN:{full_name}"));
        lines.push(format!("N:{};{};;;", fields.last_name, fields.first_name));
    }

    let optional = [
        ("TEL", &fields.phone),
        ("EMAIL", &fields.email),
        ("BDAY", &fields.birthday),
        ("URL", &fields.website),
        ("ORG", &fields.organization),
        ("TITLE", &fields.job_title),
    ];
    for (tag, value) in optional {
        if !is_blank(value) {
            lines.push(format!("{tag}:{value}"));
        }
    }

    lines.push("END:VCARD".into());
    Payload::new(lines.join("\n"))
}

/// Empty or whitespace only.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
