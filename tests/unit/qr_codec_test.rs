//! Unit tests for generation, upload decoding and the camera path through
//! `App`, using the real `qrcode` and `rqrr` backends.

use std::fs;

use qrdesk::app::{App, NO_CODE_STATUS};
use qrdesk::database::Database;
use qrdesk::managers::history_log::HistoryLogTrait;
use qrdesk::services::camera::ImageSequenceCamera;
use qrdesk::services::qr_decoder::{decode_raster, RqrrDecoder};
use qrdesk::services::qr_generator::{download_file_name, QrGenerator};
use qrdesk::services::upload::UploadSource;
use qrdesk::types::errors::{CodecError, ScanError};
use qrdesk::types::qr::InversionPolicy;
use qrdesk::types::scan::{ScanState, TickOutcome};
use qrdesk::types::settings::{AppConfig, QrSettings};
use rstest::rstest;
use tempfile::TempDir;

fn app() -> App {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let mut app = App::with_config(db, AppConfig::default());
    app.startup();
    app.settings.set_size(300).unwrap();
    app.settings.set_background("#ffffff");
    app.settings.set_foreground("#000000");
    app
}

fn blank_png() -> Vec<u8> {
    let blank = image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]));
    let mut png = Vec::new();
    blank
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

#[rstest]
#[case("https://example.com/x", "example.com_QR.png")]
#[case("http://sub.example.org:8080/a?b=c", "sub.example.org_QR.png")]
#[case("hello world!", "helloworld_QR.png")]
#[case("Order #42 / ready", "Order42ready_QR.png")]
fn test_download_file_name(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(download_file_name(text), expected);
}

#[rstest]
#[case(InversionPolicy::DontInvert, "dontInvert")]
#[case(InversionPolicy::OnlyInvert, "onlyInvert")]
#[case(InversionPolicy::AttemptBoth, "attemptBoth")]
#[case(InversionPolicy::InvertFirst, "invertFirst")]
fn test_inversion_policy_names(#[case] policy: InversionPolicy, #[case] name: &str) {
    assert_eq!(policy.as_str(), name);
    assert_eq!(name.parse::<InversionPolicy>().unwrap(), policy);
}

#[test]
fn test_generate_uses_working_settings() {
    let mut app = app();
    let code = app.generate("https://example.com/page").unwrap();

    assert_eq!((code.width, code.height), (300, 300));
    assert!(code.data_url.starts_with("data:image/png;base64,"));
    assert_eq!(code.file_name, "example.com_QR.png");

    let raster = image::load_from_memory(&code.png).unwrap().to_rgba8();
    assert_eq!(raster.dimensions(), (300, 300));
    assert_eq!(*raster.get_pixel(0, 0), image::Rgba([255, 255, 255, 255]));

    let entries = app.history.load_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry, "Generated: https://example.com/page");
}

#[test]
fn test_generate_rejects_blank_text_without_logging() {
    let mut app = app();
    assert_eq!(app.generate("   ").unwrap_err(), CodecError::EmptyInput);
    assert!(app.history.load_all().is_empty());
}

#[test]
fn test_generated_code_decodes_back() {
    let code = QrGenerator::default()
        .generate("round trip", &QrSettings { size: 200, ..QrSettings::default() })
        .unwrap();
    let raster = image::load_from_memory(&code.png).unwrap().to_rgba8();
    assert_eq!(
        decode_raster(&RqrrDecoder::new(), &raster, InversionPolicy::DontInvert),
        Some("round trip".to_string())
    );
}

#[test]
fn test_inverted_code_needs_inversion_pass() {
    let settings = QrSettings {
        size: 300,
        background_color: "#000000".to_string(),
        foreground_color: "#ffffff".to_string(),
    };
    let code = QrGenerator::default().generate("light on dark", &settings).unwrap();
    let raster = image::load_from_memory(&code.png).unwrap().to_rgba8();
    let decoder = RqrrDecoder::new();

    assert_eq!(decode_raster(&decoder, &raster, InversionPolicy::AttemptBoth).as_deref(), Some("light on dark"));
    assert_eq!(decode_raster(&decoder, &raster, InversionPolicy::OnlyInvert).as_deref(), Some("light on dark"));
}

#[test]
fn test_upload_of_generated_code_is_logged() {
    let mut app = app();
    let code = app.generate("upload me").unwrap();

    let outcome = app
        .decode_upload(&UploadSource::DataUrl(code.data_url.clone()))
        .unwrap();
    assert_eq!(outcome.payload.as_deref(), Some("upload me"));
    assert_eq!(outcome.status, "QR Code Data: upload me");
    assert_eq!(app.scan_result(), Some("QR Code Data: upload me"));

    let entries = app.history.load_all();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entry, "Scanned (upload): upload me");
    assert_eq!(entries[1].entry, "Generated: upload me");
}

#[test]
fn test_upload_from_path() {
    let dir = TempDir::new().unwrap();
    let mut app = app();
    let code = app.generate("from disk").unwrap();
    let path = dir.path().join("code.png");
    fs::write(&path, &code.png).unwrap();

    let outcome = app.decode_upload(&UploadSource::Path(path)).unwrap();
    assert_eq!(outcome.payload.as_deref(), Some("from disk"));
}

#[test]
fn test_upload_without_code_reports_miss() {
    let mut app = app();
    let url = format!(
        "data:image/png;base64,{}",
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, blank_png())
    );
    let outcome = app.decode_upload(&UploadSource::DataUrl(url)).unwrap();

    assert_eq!(outcome.payload, None);
    assert_eq!(outcome.status, NO_CODE_STATUS);
    assert!(app.history.load_all().is_empty());
}

#[test]
fn test_upload_of_missing_file_is_an_error() {
    let mut app = app();
    let err = app
        .decode_upload(&UploadSource::Path("/nonexistent/qrdesk/code.png".into()))
        .unwrap_err();
    assert!(matches!(err, ScanError::Upload(_)));
}

#[test]
fn test_upload_refused_while_camera_scanning() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("frame.png"), blank_png()).unwrap();

    let mut app = app();
    let mut camera = ImageSequenceCamera::new(dir.path()).looping(true);
    app.start_scan(&mut camera).unwrap();

    let err = app
        .decode_upload(&UploadSource::Path(dir.path().join("frame.png")))
        .unwrap_err();
    assert_eq!(err, ScanError::Busy);

    app.stop_scan();
    assert!(app
        .decode_upload(&UploadSource::Path(dir.path().join("frame.png")))
        .is_ok());
}

#[test]
fn test_camera_scan_finds_code_among_frames() {
    let dir = TempDir::new().unwrap();
    let mut app = app();
    let code = app.generate("ABC123").unwrap();
    fs::write(dir.path().join("frame_000.png"), blank_png()).unwrap();
    fs::write(dir.path().join("frame_001.png"), blank_png()).unwrap();
    fs::write(dir.path().join("frame_002.png"), &code.png).unwrap();
    app.history.clear().unwrap();

    let mut camera = ImageSequenceCamera::new(dir.path());
    let outcome = app.run_scan(&mut camera, Some(10)).unwrap();

    assert_eq!(outcome, TickOutcome::Decoded("ABC123".to_string()));
    assert_eq!(app.scanner.state(), ScanState::Stopped);
    assert_eq!(app.scanner.attempts(), 3);
    assert_eq!(app.scan_result(), Some("QR Code Data: ABC123"));
    let entries = app.history.load_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry, "Scanned: ABC123");
}

#[test]
fn test_missing_camera_source_leaves_scanner_idle() {
    let mut app = app();
    let mut camera = ImageSequenceCamera::new("/nonexistent/qrdesk/frames");
    let err = app.start_scan(&mut camera).unwrap_err();

    assert!(matches!(err, ScanError::CameraUnavailable(_)));
    assert_eq!(app.scanner.state(), ScanState::Idle);
}
