//! Scan Loop for QRDesk.
//!
//! An explicit `Idle -> Scanning -> Stopped` state machine over a camera
//! stream. Each [`ScanLoop::tick`] examines at most one frame and tells the
//! driver whether to schedule another. Cancellation is cooperative through a
//! [`CancellationToken`] checked before every reschedule, so a token
//! cancelled from elsewhere lets at most one more frame through.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::managers::history_log::HistoryLogTrait;
use crate::services::camera::{Camera, VideoStream};
use crate::services::qr_decoder::{decode_raster, QrDecoder};
use crate::types::errors::ScanError;
use crate::types::history::HistoryLabel;
use crate::types::qr::InversionPolicy;
use crate::types::scan::{ScanState, StreamConstraints, TickOutcome};

/// Status shown while frames are being examined without a hit.
pub const SCANNING_STATUS: &str = "Scanning...";

/// Status shown for a decoded payload.
pub fn result_status(payload: &str) -> String {
    format!("QR Code Data: {}", payload)
}

/// Shared continuation flag for one capture session.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Paces a self-driven scan, one wait per rendered frame.
pub trait FrameClock {
    fn wait_for_frame(&mut self);
}

/// Sleeps a fixed interval between frames.
pub struct IntervalClock {
    interval: Duration,
}

impl IntervalClock {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl FrameClock for IntervalClock {
    fn wait_for_frame(&mut self) {
        thread::sleep(self.interval);
    }
}

/// Never waits.
pub struct ImmediateClock;

impl FrameClock for ImmediateClock {
    fn wait_for_frame(&mut self) {}
}

/// Single-session camera scanner.
pub struct ScanLoop {
    state: ScanState,
    stream: Option<Box<dyn VideoStream>>,
    token: CancellationToken,
    inversion: InversionPolicy,
    status: Option<String>,
    attempts: u64,
    last_payload: Option<String>,
}

impl ScanLoop {
    pub fn new(inversion: InversionPolicy) -> Self {
        Self {
            state: ScanState::Idle,
            stream: None,
            token: CancellationToken::new(),
            inversion,
            status: None,
            attempts: 0,
            last_payload: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Decode attempts made in the current (or last) session.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Opens the camera and enters `Scanning`.
    ///
    /// Refused while a session is running. If the camera cannot be opened
    /// the state is left as it was.
    pub fn start(&mut self, camera: &mut dyn Camera) -> Result<CancellationToken, ScanError> {
        if self.state == ScanState::Scanning {
            return Err(ScanError::AlreadyScanning);
        }
        let stream = camera
            .request_stream(&StreamConstraints::default())
            .map_err(|e| {
                log::warn!("camera unavailable: {}", e);
                ScanError::CameraUnavailable(e)
            })?;

        self.token = CancellationToken::new();
        self.stream = Some(stream);
        self.state = ScanState::Scanning;
        self.status = None;
        self.attempts = 0;
        self.last_payload = None;
        log::info!("scan started");
        Ok(self.token.clone())
    }

    /// One display-refresh worth of work.
    pub fn tick<D, H>(&mut self, decoder: &D, history: &mut H) -> TickOutcome
    where
        D: QrDecoder + ?Sized,
        H: HistoryLogTrait + ?Sized,
    {
        if self.state != ScanState::Scanning {
            return TickOutcome::Quiesced;
        }

        let frame = self
            .stream
            .as_mut()
            .filter(|s| s.has_enough_data())
            .and_then(|s| s.capture_frame());

        if let Some(frame) = frame {
            self.attempts += 1;
            log::debug!("scan attempt {} on {}x{}", self.attempts, frame.width(), frame.height());
            match decode_raster(decoder, &frame, self.inversion) {
                Some(payload) => {
                    self.release_stream();
                    self.state = ScanState::Stopped;
                    self.status = Some(result_status(&payload));
                    if let Err(e) = history.append(&HistoryLabel::Scanned(payload.clone()).to_string()) {
                        log::warn!("scan result not recorded: {}", e);
                    }
                    log::info!("scan decoded after {} attempts", self.attempts);
                    self.last_payload = Some(payload.clone());
                    return TickOutcome::Decoded(payload);
                }
                None => self.status = Some(SCANNING_STATUS.to_string()),
            }
        }

        if self.token.is_cancelled() {
            self.release_stream();
            self.state = ScanState::Stopped;
            log::debug!("scan quiesced after cancellation");
            return TickOutcome::Quiesced;
        }
        TickOutcome::Reschedule
    }

    /// Cancels the session and releases the camera immediately.
    pub fn stop(&mut self) {
        self.token.cancel();
        self.release_stream();
        if self.state == ScanState::Scanning {
            self.state = ScanState::Stopped;
            log::info!("scan stopped after {} attempts", self.attempts);
        }
    }

    /// Drives ticks until a decode, a cancellation, or `max_frames`
    /// rescheduled frames, whichever comes first.
    pub fn run<D, H, C>(
        &mut self,
        decoder: &D,
        history: &mut H,
        clock: &mut C,
        max_frames: u32,
    ) -> TickOutcome
    where
        D: QrDecoder + ?Sized,
        H: HistoryLogTrait + ?Sized,
        C: FrameClock + ?Sized,
    {
        let mut frames = 0u32;
        loop {
            match self.tick(decoder, history) {
                TickOutcome::Reschedule => {
                    frames += 1;
                    if frames >= max_frames {
                        log::info!("scan gave up after {} frames", frames);
                        self.stop();
                        return TickOutcome::Quiesced;
                    }
                    clock.wait_for_frame();
                }
                outcome => return outcome,
            }
        }
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }
    }
}

impl Drop for ScanLoop {
    fn drop(&mut self) {
        self.release_stream();
    }
}
