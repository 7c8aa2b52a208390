//! End-to-end pipeline tests: format, encode, then decode with an independent reader.

use qrbuilder::export::{DirectoryShareTarget, SharePackage, ShareTarget, SHARE_FILE_NAME};
use qrbuilder::{
    ContactFields, EncodeError, ErrorCorrection, GenerateError, Generator, GeneratorConfig,
    RasterImage, Request,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("qrbuilder=debug")
        .with_test_writer()
        .try_init();
}

fn decode(image: &RasterImage) -> String {
    let gray = image.as_image();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        gray.width() as usize,
        gray.height() as usize,
        |x, y| gray.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code in the image");
    let (_meta, content) = grids[0].decode().expect("QR code should decode");
    content
}

fn round_trip(request: Request) -> String {
    let generated = Generator::default().generate(&request).expect("generation should succeed");
    let decoded = decode(generated.image());
    assert_eq!(decoded, generated.payload().as_str());
    decoded
}

#[test]
fn text_round_trips() {
    init_tracing();
    assert_eq!(round_trip(Request::Text("Hello, World!".into())), "Hello, World!");
}

#[test]
fn numeric_text_round_trips() {
    assert_eq!(round_trip(Request::Text("0123456789".into())), "0123456789");
}

#[test]
fn multiline_text_round_trips() {
    let text = "line one\nline two\n\ttabbed";
    assert_eq!(round_trip(Request::Text(text.into())), text);
}

#[test]
fn non_ascii_text_round_trips() {
    let text = "Grüße aus München, 東京 🚀";
    assert_eq!(round_trip(Request::Text(text.into())), text);
}

#[test]
fn url_round_trips_with_scheme_added() {
    assert_eq!(
        round_trip(Request::Url("example.com/path?q=1".into())),
        "https://example.com/path?q=1"
    );
}

#[test]
fn contact_round_trips_as_vcard() {
    let contact = ContactFields {
        first_name: "John".into(),
        last_name: "Doe".into(),
        phone: "+15551234567".into(),
        ..Default::default()
    };
    assert_eq!(
        round_trip(Request::Contact(contact)),
        "BEGIN:VCARD\nVERSION:3.0\nFN:John Doe\nN:Doe;John;;;\nTEL:+15551234567\nEND:VCARD"
    );
}

#[test]
fn high_error_correction_round_trips() {
    let config = GeneratorConfig { error_correction: ErrorCorrection::High, ..Default::default() };
    let generated = Generator::new(config)
        .generate(&Request::Text("resilient".into()))
        .unwrap();
    assert_eq!(decode(generated.image()), "resilient");
}

#[test]
fn long_payload_in_small_grid_fails_instead_of_cropping() {
    let config = GeneratorConfig { width: 64, height: 64, ..Default::default() };
    let err = Generator::new(config)
        .generate(&Request::Text("a".repeat(500)))
        .unwrap_err();
    assert!(matches!(err, GenerateError::Encode(EncodeError::GridTooSmall { available: 64, .. })));
}

#[test]
fn over_capacity_payload_fails() {
    let err = Generator::default()
        .generate(&Request::Text("z".repeat(4000)))
        .unwrap_err();
    assert_eq!(err, GenerateError::Encode(EncodeError::DataTooLong { bytes: 4000 }));
}

#[test]
fn share_bundle_carries_payload_text() {
    let generated = Generator::default()
        .generate(&Request::Url("example.com".into()))
        .unwrap();
    let package = SharePackage::new(&generated).unwrap();
    assert_eq!(package.text, "QR Code Content: https://example.com");

    let dir = tempfile::tempdir().unwrap();
    let target = DirectoryShareTarget::new(dir.path());
    target.share(&package).unwrap();

    let image_path = dir.path().join(SHARE_FILE_NAME);
    let restored = image::open(&image_path).unwrap().to_luma8();
    assert_eq!(&restored, generated.image().as_image());
    let caption = std::fs::read_to_string(image_path.with_extension("txt")).unwrap();
    assert_eq!(caption, package.text);
}

#[test]
fn identical_requests_yield_identical_results() {
    let generator = Generator::default();
    let request = Request::Text("same".into());
    assert_eq!(generator.generate(&request).unwrap(), generator.generate(&request).unwrap());
}
