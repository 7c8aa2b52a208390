//! Hand-off of finished images to the outside world.
//!
//! Display, save and share are owned by the host platform. This module only
//! produces the lossless PNG container and the bundle a share sheet needs, plus
//! a filesystem implementation usable on desktop hosts and in tests.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::ImageFormat;
use tracing::{debug, info, instrument};

use crate::error::ExportError;
use crate::generator::Generated;
use crate::raster::RasterImage;

/// Directory used by [`save_png`] when none is given.
pub const DEFAULT_DIRECTORY: &str = "generated";

/// File name of the image attached to a share request.
pub const SHARE_FILE_NAME: &str = "qr_code_share.png";

/// Encodes the image as PNG bytes.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image
        .as_image()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    debug!(bytes = bytes.len(), "PNG encoded");
    Ok(bytes)
}

/// Saves the image as a PNG file and returns its path.
///
/// # Arguments
///
/// * `image` - The raster to save.
/// * `directory` - Optional. Target directory, created if missing. Defaults to `generated`.
/// * `filename` - Optional. File name with or without the `.png` extension. Defaults to the
///   current UNIX time in milliseconds.
///
/// # Example
///
/// ```no_run
/// use qrbuilder::{export::save_png, raster::RasterEncoder};
///
/// let image = RasterEncoder::default().encode("Hello, World!", 512, 512).unwrap();
/// let path = save_png(&image, Some("images".as_ref()), Some("qr_code")).unwrap();
/// assert!(path.ends_with("qr_code.png"));
/// ```
#[instrument(skip_all, fields(directory = ?directory, filename = ?filename))]
pub fn save_png(
    image: &RasterImage,
    directory: Option<&Path>,
    filename: Option<&str>,
) -> Result<PathBuf, ExportError> {
    let directory = directory.unwrap_or_else(|| Path::new(DEFAULT_DIRECTORY));
    let stem = match filename {
        Some(name) => name.strip_suffix(".png").unwrap_or(name).to_string(),
        None => timestamp_name(),
    };

    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }

    let path = directory.join(format!("{stem}.png"));
    image.as_image().save_with_format(&path, ImageFormat::Png)?;
    info!(path = %path.display(), "QR code saved");
    Ok(path)
}

fn timestamp_name() -> String {
    let since_the_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    since_the_epoch.as_millis().to_string()
}

/// Everything a share sheet needs: the image and the text sent alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePackage {
    pub png: Vec<u8>,
    pub text: String,
    pub file_name: String,
}

impl SharePackage {
    /// Bundles a generation result, captioned with the exact encoded payload.
    pub fn new(generated: &Generated) -> Result<Self, ExportError> {
        Ok(Self {
            png: encode_png(generated.image())?,
            text: format!("QR Code Content: {}", generated.payload()),
            file_name: SHARE_FILE_NAME.to_string(),
        })
    }
}

/// A platform share facility.
pub trait ShareTarget {
    fn share(&self, package: &SharePackage) -> Result<(), ExportError>;
}

/// Shares by writing the PNG and a sibling `.txt` caption into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryShareTarget {
    directory: PathBuf,
}

impl DirectoryShareTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ShareTarget for DirectoryShareTarget {
    fn share(&self, package: &SharePackage) -> Result<(), ExportError> {
        fs::create_dir_all(&self.directory)?;
        let image_path = self.directory.join(&package.file_name);
        fs::write(&image_path, &package.png)?;
        fs::write(image_path.with_extension("txt"), &package.text)?;
        info!(path = %image_path.display(), "QR code shared");
        Ok(())
    }
}
