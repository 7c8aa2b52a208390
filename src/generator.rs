//! One-call pipeline: request → payload → image.

use tracing::instrument;

use crate::config::GeneratorConfig;
use crate::error::{ConfigError, GenerateError};
use crate::payload::{Payload, Request};
use crate::raster::{QrCodeEngine, RasterEncoder, RasterImage, SymbologyEngine};

/// The result of a generation request: the exact encoded payload and its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    payload: Payload,
    image: RasterImage,
}

impl Generated {
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn into_parts(self) -> (Payload, RasterImage) {
        (self.payload, self.image)
    }
}

/// Formats requests and encodes them at the configured size.
///
/// Holds no per-request state; a single generator can serve any number of
/// independent requests, from any thread.
#[derive(Debug, Clone)]
pub struct Generator<E = QrCodeEngine> {
    config: GeneratorConfig,
    encoder: RasterEncoder<E>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator {
    /// Builds a generator from settings as given.
    ///
    /// The settings are not checked here; configs parsed from TOML are
    /// validated on load, and [`Generator::try_new`] validates a config built
    /// in code.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_engine(QrCodeEngine, config)
    }

    /// Validates the settings, then builds a generator.
    pub fn try_new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl<E: SymbologyEngine> Generator<E> {
    pub fn with_engine(engine: E, config: GeneratorConfig) -> Self {
        let encoder = RasterEncoder::with_engine(engine, &config);
        Self { config, encoder }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Formats the request and encodes the payload.
    ///
    /// Field validation is not applied here; see [`Generator::generate_checked`].
    ///
    /// # Example
    ///
    /// ```
    /// use qrbuilder::{Generator, Request};
    ///
    /// let generated = Generator::default()
    ///     .generate(&Request::Url("example.com".into()))
    ///     .unwrap();
    /// assert_eq!(generated.payload().as_str(), "https://example.com");
    /// assert_eq!(generated.image().width(), 512);
    /// ```
    #[instrument(skip_all, fields(kind = request.kind()))]
    pub fn generate(&self, request: &Request) -> Result<Generated, GenerateError> {
        let payload = request.to_payload();
        let image = self
            .encoder
            .encode(payload.as_str(), self.config.width, self.config.height)?;
        Ok(Generated { payload, image })
    }

    /// Like [`Generator::generate`], but rejects input that fails the field checks first.
    pub fn generate_checked(&self, request: &Request) -> Result<Generated, GenerateError> {
        request.validate().map_err(GenerateError::Validation)?;
        self.generate(request)
    }
}
