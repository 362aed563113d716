//! QRDesk — QR code generator, scanner and history log.
//!
//! Entry point: runs an interactive console demo of every component against
//! an in-memory database. The JSON-RPC host lives in the `qrdesk-rpc` binary.

use qrdesk::app::App;
use qrdesk::database::Database;
use qrdesk::managers::history_log::HistoryLogTrait;
use qrdesk::types::settings::AppConfig;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 QRDesk v{} — Demo Mode                   ║", env!("CARGO_PKG_VERSION"));
    println!("║       Generate, scan, and remember QR codes                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let db = match Database::open_in_memory() {
        Ok(db) => db,
        Err(e) => {
            eprintln!("  ✗ could not open database: {}", e);
            return;
        }
    };
    let mut app = App::with_config(db, AppConfig::default());

    demo_settings(&mut app);
    let data_url = demo_generate(&mut app);
    if let Some(url) = data_url {
        demo_upload(&mut app, &url);
    }
    demo_scan(&mut app);
    demo_history(&mut app);

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated.");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_settings(app: &mut App) {
    section("Settings Store");

    match app.save_settings(240, "#ffffff", "#1f2328") {
        Ok(notice) => println!("  save → {:?}", notice),
        Err(e) => println!("  ✗ save failed: {}", e),
    }
    app.startup();
    let current = app.settings.current();
    println!(
        "  Working defaults: size={} bg={} fg={}",
        current.size, current.background_color, current.foreground_color
    );
    println!();
}

fn demo_generate(app: &mut App) -> Option<String> {
    section("Generator");

    match app.generate("https://github.com/rust-lang") {
        Ok(code) => {
            println!("  {}x{} PNG, {} bytes", code.width, code.height, code.png.len());
            println!("  Download as: {}", code.file_name);
            println!("  ✓ Generate OK");
            println!();
            Some(code.data_url)
        }
        Err(e) => {
            println!("  ✗ generate failed: {}", e);
            println!();
            None
        }
    }
}

fn demo_upload(app: &mut App, data_url: &str) {
    use qrdesk::services::upload::UploadSource;
    section("Upload Decode");

    match app.decode_upload(&UploadSource::DataUrl(data_url.to_string())) {
        Ok(outcome) => println!("  {}", outcome.status),
        Err(e) => println!("  ✗ upload failed: {}", e),
    }
    println!();
}

fn demo_scan(app: &mut App) {
    use qrdesk::services::camera::ImageSequenceCamera;
    section("Scan Loop");

    let dir = std::env::temp_dir().join("qrdesk-demo-frames");
    let _ = std::fs::create_dir_all(&dir);
    let blank = image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]));
    let _ = blank.save(dir.join("frame_000.png"));

    let mut camera = ImageSequenceCamera::new(&dir);
    match app.run_scan(&mut camera, Some(5)) {
        Ok(outcome) => println!(
            "  {:?} after {} attempt(s), state {:?}",
            outcome,
            app.scanner.attempts(),
            app.scanner.state()
        ),
        Err(e) => println!("  {}", e),
    }
    let _ = std::fs::remove_dir_all(&dir);
    println!();
}

fn demo_history(app: &mut App) {
    section("History Log");

    for row in app.history.rows() {
        println!("  {}", row);
    }
    if let Err(e) = app.history.clear() {
        println!("  ✗ clear failed: {}", e);
    }
    println!("  After clear: {} entries", app.history.load_all().len());
    println!();
}
