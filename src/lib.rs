//! # qrbuilder
//!
//! Turn form input into scannable QR codes.
//!
//! `qrbuilder` formats one of three inputs (free text, a website URL, a contact
//! card) into a canonical payload and encodes that payload into a fixed-size
//! black and white image. Every call is synchronous and independent: nothing is
//! cached, and the result is owned by the caller.
//!
//! ## Features
//!
//! - Normalize website addresses to absolute `https://` URLs.
//! - Serialize contact cards as vCard 3.0 records.
//! - Encode UTF-8 payloads into QR codes of an exact pixel size.
//! - Typed failures when a payload does not fit, never a blank image.
//! - PNG, SVG and terminal output, plus a share bundle carrying the payload text.
//! - Heuristic field checks for forms (email, phone, URL).
//!
//! ## Example
//!
//! ```rust
//! use qrbuilder::{ContactFields, Generator, Request};
//!
//! let contact = ContactFields {
//!     first_name: "John".into(),
//!     last_name: "Doe".into(),
//!     phone: "+15551234567".into(),
//!     ..Default::default()
//! };
//! let generated = Generator::default().generate(&Request::Contact(contact)).unwrap();
//!
//! assert!(generated.payload().as_str().starts_with("BEGIN:VCARD"));
//! assert_eq!(generated.image().width(), 512);
//! ```
//!
//! ## Modules
//!
//! - [`payload`]: Payload formatting for text, URLs and contact cards.
//! - [`raster`]: Symbol encoding and rasterization.
//! - [`generator`]: The format-then-encode pipeline.
//! - [`validate`]: Input-shape heuristics for form fields.
//! - [`render`]: SVG and terminal renderings.
//! - [`export`]: PNG encoding, saving and sharing.
//! - [`config`]: Generator settings.
//! - [`error`]: Error types.

pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod payload;
pub mod raster;
pub mod render;
pub mod validate;

pub use config::{ErrorCorrection, GeneratorConfig};
pub use error::{EncodeError, GenerateError, ValidationError};
pub use generator::{Generated, Generator};
pub use payload::{ContactFields, Payload, Request};
pub use raster::{RasterEncoder, RasterImage};
