//! Raster encoding.
//!
//! A payload becomes a [`Symbol`] (the module matrix) through a
//! [`SymbologyEngine`], and the symbol becomes a fixed-size black and white
//! [`RasterImage`] through [`RasterEncoder`]. The bit-level QR algorithm is
//! delegated to the `qrcode` crate via [`QrCodeEngine`].

use image::{GrayImage, ImageBuffer, Luma};
use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use tracing::{info, warn};

use crate::config::{ErrorCorrection, GeneratorConfig};
use crate::error::EncodeError;

/// Luma value of a dark module.
pub const BLACK: u8 = 0;
/// Luma value of a light module or padding.
pub const WHITE: u8 = 255;

/// ECI assignment number for UTF-8.
const ECI_UTF8: u32 = 26;

/// A square grid of dark and light modules. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    width: usize,
    version: i16,
    modules: Vec<bool>,
}

impl Symbol {
    /// Builds a symbol from row-major module colors (`true` is dark).
    ///
    /// Returns `None` when `width` is zero or `modules.len()` is not `width * width`.
    pub fn from_modules(width: usize, version: i16, modules: Vec<bool>) -> Option<Self> {
        (width > 0 && modules.len() == width * width).then_some(Self {
            width,
            version,
            modules,
        })
    }

    /// Width and height in modules, between 21 and 177 for normal QR codes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Symbol version, 1 to 40.
    pub fn version(&self) -> i16 {
        self.version
    }

    /// Returns the color of the module at the given coordinates. Coordinates
    /// outside the symbol are light, which lets callers draw a quiet zone by
    /// iterating past the edges.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let width = self.width as i64;
        if (0..width).contains(&x) && (0..width).contains(&y) {
            self.modules[(y * width + x) as usize]
        } else {
            false
        }
    }
}

/// Something that can lay out text as a QR module matrix.
pub trait SymbologyEngine {
    /// Encodes the UTF-8 bytes of `payload` into the smallest symbol that holds
    /// them at the given error correction level.
    fn encode(&self, payload: &str, ecc: ErrorCorrection) -> Result<Symbol, EncodeError>;
}

/// [`SymbologyEngine`] backed by the `qrcode` crate.
///
/// ASCII payloads are encoded with optimal segmentation. Any other payload is
/// written as byte data behind an ECI designator declaring UTF-8, so decoders
/// do not fall back to ISO-8859-1.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEngine;

impl SymbologyEngine for QrCodeEngine {
    fn encode(&self, payload: &str, ecc: ErrorCorrection) -> Result<Symbol, EncodeError> {
        let level = ec_level(ecc);
        let bytes = payload.as_bytes();
        let encoded = if payload.is_ascii() {
            QrCode::with_error_correction_level(bytes, level)
        } else {
            encode_utf8(bytes, level)
        };
        let code = encoded.map_err(|err| match err {
            QrError::DataTooLong => EncodeError::DataTooLong { bytes: bytes.len() },
            other => EncodeError::Engine(other.to_string()),
        })?;

        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };
        let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Symbol::from_modules(code.width(), version, modules)
            .ok_or_else(|| EncodeError::Engine("module matrix is not square".to_string()))
    }
}

fn ec_level(ecc: ErrorCorrection) -> EcLevel {
    match ecc {
        ErrorCorrection::Low => EcLevel::L,
        ErrorCorrection::Medium => EcLevel::M,
        ErrorCorrection::Quartile => EcLevel::Q,
        ErrorCorrection::High => EcLevel::H,
    }
}

/// Tries each version in turn until the ECI segment plus byte data fit.
fn encode_utf8(bytes: &[u8], level: EcLevel) -> Result<QrCode, QrError> {
    for version in 1..=40 {
        let mut bits = Bits::new(Version::Normal(version));
        match push_utf8(&mut bits, bytes, level) {
            Ok(()) => return QrCode::with_bits(bits, level),
            Err(QrError::DataTooLong) => continue,
            Err(err) => return Err(err),
        }
    }
    Err(QrError::DataTooLong)
}

fn push_utf8(bits: &mut Bits, bytes: &[u8], level: EcLevel) -> Result<(), QrError> {
    bits.push_eci_designator(ECI_UTF8)?;
    bits.push_byte_data(bytes)?;
    bits.push_terminator(level)
}

/// A width×height grid of pure black or white pixels, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    image: GrayImage,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the pixel at `(x, y)` is black. Out-of-range pixels are not.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .is_some_and(|pixel| pixel.0[0] == BLACK)
    }

    /// Borrow the underlying grayscale buffer, e.g. for display.
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }
}

/// Encodes payloads into fixed-size raster images.
#[derive(Debug, Clone)]
pub struct RasterEncoder<E = QrCodeEngine> {
    engine: E,
    quiet_zone: u32,
    error_correction: ErrorCorrection,
}

impl Default for RasterEncoder {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl RasterEncoder {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self::with_engine(QrCodeEngine, config)
    }
}

impl<E: SymbologyEngine> RasterEncoder<E> {
    /// Builds an encoder around a specific symbology engine.
    pub fn with_engine(engine: E, config: &GeneratorConfig) -> Self {
        Self {
            engine,
            quiet_zone: config.quiet_zone,
            error_correction: config.error_correction,
        }
    }

    /// Encodes the payload into its module matrix without rasterizing it.
    pub fn symbol(&self, payload: &str) -> Result<Symbol, EncodeError> {
        if payload.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }
        self.engine.encode(payload, self.error_correction)
    }

    /// Encodes the payload into a `width`×`height` image.
    ///
    /// The symbol and its quiet zone are scaled by the largest whole factor
    /// that fits both axes and centred on a white canvas. Fails with
    /// [`EncodeError::GridTooSmall`] when even one pixel per module does not
    /// fit, rather than producing a cropped image.
    ///
    /// # Example
    ///
    /// ```
    /// use qrbuilder::raster::RasterEncoder;
    ///
    /// let image = RasterEncoder::default().encode("Hello, World!", 256, 256).unwrap();
    /// assert_eq!((image.width(), image.height()), (256, 256));
    /// ```
    pub fn encode(
        &self,
        payload: &str,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, EncodeError> {
        let result = self.encode_inner(payload, width, height);
        match &result {
            Ok(image) => info!(width = image.width(), height = image.height(), "Raster encoded"),
            Err(err) => warn!(error = %err, bytes = payload.len(), "Raster encoding failed"),
        }
        result
    }

    fn encode_inner(
        &self,
        payload: &str,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, EncodeError> {
        if width == 0 || height == 0 {
            return Err(EncodeError::InvalidDimensions { width, height });
        }
        let symbol = self.symbol(payload)?;

        let required = u32::try_from(symbol.width())
            .ok()
            .and_then(|w| w.checked_add(self.quiet_zone.checked_mul(2)?))
            .filter(|&required| required > 0)
            .ok_or_else(|| EncodeError::Engine("symbol width out of range".to_string()))?;
        let available = width.min(height);
        if required > available {
            return Err(EncodeError::GridTooSmall { required, available });
        }

        let scale = (width / required).min(height / required);
        let extent = required * scale;
        let left = (width - extent) / 2;
        let top = (height - extent) / 2;
        let border = i64::from(self.quiet_zone);

        let mut img: GrayImage = ImageBuffer::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let dark = x >= left
                && y >= top
                && symbol.is_dark(
                    i64::from((x - left) / scale) - border,
                    i64::from((y - top) / scale) - border,
                );
            *pixel = if dark { Luma([BLACK]) } else { Luma([WHITE]) };
        }

        info!(version = symbol.version(), modules = symbol.width(), scale, "Symbol placed");
        Ok(RasterImage { image: img })
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine(Symbol);

    impl SymbologyEngine for FixedEngine {
        fn encode(&self, _payload: &str, _ecc: ErrorCorrection) -> Result<Symbol, EncodeError> {
            Ok(self.0.clone())
        }
    }

    fn checkerboard(width: usize) -> Symbol {
        let modules = (0..width * width).map(|i| (i / width + i % width) % 2 == 0).collect();
        Symbol::from_modules(width, 1, modules).unwrap()
    }

    #[test]
    fn hello_world_is_version_one() {
        let symbol = QrCodeEngine.encode("Hello, world!", ErrorCorrection::Low).unwrap();
        assert_eq!(symbol.width(), 21);
        assert_eq!(symbol.version(), 1);
    }

    #[test]
    fn utf8_payload_encodes() {
        let symbol = QrCodeEngine.encode("Grüße, 世界", ErrorCorrection::Medium).unwrap();
        assert!(symbol.width() >= 21);
    }

    #[test]
    fn higher_ecc_never_shrinks_the_symbol() {
        let text = "https://example.com/some/longer/path?with=query&and=more";
        let low = QrCodeEngine.encode(text, ErrorCorrection::Low).unwrap();
        let high = QrCodeEngine.encode(text, ErrorCorrection::High).unwrap();
        assert!(high.width() >= low.width());
    }

    #[test]
    fn symbol_outside_is_light() {
        let symbol = checkerboard(3);
        assert!(symbol.is_dark(0, 0));
        assert!(!symbol.is_dark(-1, 0));
        assert!(!symbol.is_dark(0, 3));
    }

    #[test]
    fn from_modules_rejects_non_square() {
        assert!(Symbol::from_modules(3, 1, vec![false; 8]).is_none());
    }

    #[test]
    fn from_modules_rejects_empty_symbol() {
        assert!(Symbol::from_modules(0, 1, vec![]).is_none());
    }

    #[test]
    fn single_module_without_quiet_zone_fills_the_canvas() {
        let config = GeneratorConfig { quiet_zone: 0, ..Default::default() };
        let symbol = Symbol::from_modules(1, 1, vec![true]).unwrap();
        let encoder = RasterEncoder::with_engine(FixedEngine(symbol), &config);
        let image = encoder.encode("x", 10, 10).unwrap();
        assert!(image.as_image().pixels().all(|p| p.0[0] == BLACK));
    }

    #[test]
    fn exact_fit_uses_one_pixel_per_module() {
        // 21 modules + 2 * 4 quiet = 29.
        let image = RasterEncoder::default().encode("Hello, world!", 29, 29).unwrap();
        assert_eq!((image.width(), image.height()), (29, 29));
        assert!(!image.is_black(3, 3));
        assert!(image.is_black(4, 4));
        assert!(image.is_black(10, 10));
        assert!(!image.is_black(11, 11));
    }

    #[test]
    fn one_pixel_short_of_exact_fit_is_grid_too_small() {
        let err = RasterEncoder::default().encode("Hello, world!", 28, 28).unwrap_err();
        assert_eq!(err, EncodeError::GridTooSmall { required: 29, available: 28 });
    }

    #[test]
    fn image_has_requested_size_and_is_binary() {
        let image = RasterEncoder::default().encode("Hello, world!", 300, 200).unwrap();
        assert_eq!((image.width(), image.height()), (300, 200));
        assert!(image.as_image().pixels().all(|p| p.0[0] == BLACK || p.0[0] == WHITE));
        assert!(image.as_image().pixels().any(|p| p.0[0] == BLACK));
    }

    #[test]
    fn quiet_zone_and_padding_are_white() {
        // 21 modules + 8 quiet = 29; 512 / 29 = 17; extent 493; padding 9.
        let image = RasterEncoder::default().encode("Hello, world!", 512, 512).unwrap();
        let first_dark = 9 + 4 * 17;
        assert!(!image.is_black(first_dark - 1, first_dark - 1));
        // Top-left finder pattern corner.
        assert!(image.is_black(first_dark, first_dark));
        assert!(!image.is_black(511, 511));
    }

    #[test]
    fn scaling_is_exact_with_fixed_symbol() {
        let config = GeneratorConfig { quiet_zone: 1, ..Default::default() };
        let encoder = RasterEncoder::with_engine(FixedEngine(checkerboard(3)), &config);
        // 3 + 2 = 5 modules, scale 2, extent 10, padding 0.
        let image = encoder.encode("x", 10, 10).unwrap();
        assert!(!image.is_black(1, 1));
        assert!(image.is_black(2, 2));
        assert!(image.is_black(3, 3));
        assert!(!image.is_black(4, 2));
        assert!(image.is_black(6, 2));
        assert!(!image.is_black(8, 8));
    }

    #[test]
    fn empty_payload_is_rejected() {
        let err = RasterEncoder::default().encode("", 512, 512).unwrap_err();
        assert_eq!(err, EncodeError::EmptyPayload);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = RasterEncoder::default().encode("x", 0, 512).unwrap_err();
        assert_eq!(err, EncodeError::InvalidDimensions { width: 0, height: 512 });
    }

    #[test]
    fn over_capacity_payload_is_data_too_long() {
        let payload = "x".repeat(3000);
        let err = RasterEncoder::default().encode(&payload, 512, 512).unwrap_err();
        assert_eq!(err, EncodeError::DataTooLong { bytes: 3000 });
    }

    #[test]
    fn over_capacity_utf8_payload_is_data_too_long() {
        let payload = "é".repeat(1500);
        let err = RasterEncoder::default().encode(&payload, 512, 512).unwrap_err();
        assert_eq!(err, EncodeError::DataTooLong { bytes: 3000 });
    }

    #[test]
    fn symbol_larger_than_grid_is_grid_too_small() {
        let err = RasterEncoder::default().encode("Hello, world!", 20, 40).unwrap_err();
        assert_eq!(err, EncodeError::GridTooSmall { required: 29, available: 20 });
    }
}
