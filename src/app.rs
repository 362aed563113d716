//! App Core for QRDesk.
//!
//! Central struct wiring storage, the history log, saved defaults, the
//! generator, the decoder, and the camera scan loop together. Every
//! user-facing action (generate, scan, upload, save settings, clear
//! history) goes through here.

use std::sync::Arc;
use std::time::Duration;

use crate::database::{Database, LocalStorage};
use crate::managers::history_log::{HistoryLog, HistoryLogTrait};
use crate::managers::scan_loop::{result_status, CancellationToken, IntervalClock, ScanLoop};
use crate::managers::settings_store::{SettingsContext, SettingsStore, SettingsStoreTrait};
use crate::services::camera::Camera;
use crate::services::config_engine::{ConfigEngine, ConfigEngineTrait};
use crate::services::qr_decoder::RqrrDecoder;
use crate::services::qr_generator::QrGenerator;
use crate::services::upload::{decode_upload_bytes, read_upload, UploadSource};
use crate::types::errors::{CodecError, ScanError, SettingsError};
use crate::types::history::{HistoryEntry, HistoryLabel};
use crate::types::qr::GeneratedCode;
use crate::types::scan::{Notice, TickOutcome, UploadOutcome};
use crate::types::settings::{AppConfig, SavedDefaults};

/// Status shown when an upload holds no readable code.
pub const NO_CODE_STATUS: &str = "No QR code found.";

/// Central application struct.
pub struct App {
    pub db: Arc<Database>,
    pub config: AppConfig,
    pub settings: SettingsContext,
    pub history: HistoryLog<LocalStorage>,
    pub settings_store: SettingsStore<LocalStorage>,
    pub scanner: ScanLoop,
    generator: QrGenerator,
    decoder: RqrrDecoder,
    scan_result: Option<String>,
}

impl App {
    /// Opens the database at `db_path` with `config.json` from the platform
    /// config dir.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open(db_path, None)
    }

    /// Like [`App::new`] with an explicit config file. A missing file gives
    /// the defaults; a malformed one is an error.
    pub fn open(
        db_path: &str,
        config_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config_engine = ConfigEngine::new(config_path);
        let config = config_engine.load().map_err(|e| {
            log::error!("config {}: {}", config_engine.get_config_path(), e);
            e
        })?;
        let db = Database::open(db_path)?;
        Ok(Self::with_config(db, config))
    }

    /// Builds an app over an already-open database.
    pub fn with_config(db: Database, config: AppConfig) -> Self {
        let db = Arc::new(db);
        let storage = LocalStorage::new(db.clone(), &config.origin);
        Self {
            history: HistoryLog::new(storage.clone()),
            settings_store: SettingsStore::new(storage),
            scanner: ScanLoop::new(config.scan_inversion),
            settings: SettingsContext::default(),
            generator: QrGenerator::default(),
            decoder: RqrrDecoder::new(),
            scan_result: None,
            db,
            config,
        }
    }

    /// Startup sequence: reset working settings, layer saved defaults on
    /// top, and load the history list.
    pub fn startup(&mut self) -> Vec<HistoryEntry> {
        let saved = self.settings_store.load_defaults();
        self.settings.reset_with(&saved);
        self.scan_result = None;
        let entries = self.history.load_all();
        log::info!(
            "startup: size={} history={}",
            self.settings.current().size,
            entries.len()
        );
        entries
    }

    /// Renders `text` with the working settings and logs it.
    pub fn generate(&mut self, text: &str) -> Result<GeneratedCode, CodecError> {
        let code = self.generator.generate(text, self.settings.current())?;
        if let Err(e) = self.history.append(&HistoryLabel::Generated(text.to_string()).to_string()) {
            log::warn!("generate not recorded: {}", e);
        }
        Ok(code)
    }

    /// One-shot decode of an uploaded image. Refused while the camera loop
    /// is scanning.
    pub fn decode_upload(&mut self, source: &UploadSource) -> Result<UploadOutcome, ScanError> {
        if self.scanner.is_scanning() {
            return Err(ScanError::Busy);
        }
        let bytes = read_upload(source)?;
        let payload = decode_upload_bytes(&self.decoder, &bytes, self.config.upload_inversion)?;
        let status = match &payload {
            Some(text) => {
                if let Err(e) = self
                    .history
                    .append(&HistoryLabel::ScannedUpload(text.clone()).to_string())
                {
                    log::warn!("upload result not recorded: {}", e);
                }
                result_status(text)
            }
            None => NO_CODE_STATUS.to_string(),
        };
        self.scan_result = Some(status.clone());
        Ok(UploadOutcome { payload, status })
    }

    pub fn save_settings(
        &mut self,
        size: u32,
        background: &str,
        foreground: &str,
    ) -> Result<Notice, SettingsError> {
        self.settings_store.save(size, background, foreground)
    }

    pub fn saved_defaults(&self) -> SavedDefaults {
        self.settings_store.load_defaults()
    }

    pub fn start_scan(&mut self, camera: &mut dyn Camera) -> Result<CancellationToken, ScanError> {
        let token = self.scanner.start(camera)?;
        self.scan_result = None;
        Ok(token)
    }

    pub fn scan_tick(&mut self) -> TickOutcome {
        let outcome = self.scanner.tick(&self.decoder, &mut self.history);
        self.sync_scan_result();
        outcome
    }

    pub fn stop_scan(&mut self) {
        self.scanner.stop();
    }

    /// Starts a session and drives it at the configured frame interval
    /// until a decode or `max_frames` frames.
    pub fn run_scan(
        &mut self,
        camera: &mut dyn Camera,
        max_frames: Option<u32>,
    ) -> Result<TickOutcome, ScanError> {
        self.start_scan(camera)?;
        let mut clock = IntervalClock::new(Duration::from_millis(self.config.frame_interval_ms));
        let budget = max_frames.unwrap_or(self.config.max_scan_frames).max(1);
        let outcome = self
            .scanner
            .run(&self.decoder, &mut self.history, &mut clock, budget);
        self.sync_scan_result();
        Ok(outcome)
    }

    /// The text under the scanner: last decode, "Scanning...", or the
    /// upload miss message.
    pub fn scan_result(&self) -> Option<&str> {
        self.scan_result.as_deref()
    }

    fn sync_scan_result(&mut self) {
        if let Some(status) = self.scanner.status() {
            self.scan_result = Some(status.to_string());
        }
    }
}
