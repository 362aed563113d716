//! Unit tests for the ScanLoop state machine.
//!
//! A scripted camera and decoder stand in for the device and `rqrr`, so each
//! test controls exactly which frame decodes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use qrdesk::database::MemoryStorage;
use qrdesk::managers::history_log::{HistoryLog, HistoryLogTrait};
use qrdesk::managers::scan_loop::{ImmediateClock, ScanLoop, SCANNING_STATUS};
use qrdesk::services::camera::{Camera, VideoStream};
use qrdesk::services::qr_decoder::QrDecoder;
use qrdesk::types::errors::ScanError;
use qrdesk::types::qr::{DecodeRequest, InversionPolicy};
use qrdesk::types::scan::{FacingMode, ScanState, StreamConstraints, TickOutcome};

/// Camera whose streams always have a frame and report when stopped.
#[derive(Default)]
struct FakeCamera {
    tracks_stopped: Rc<Cell<bool>>,
    requested: Rc<Cell<Option<FacingMode>>>,
}

struct FakeStream {
    tracks_stopped: Rc<Cell<bool>>,
}

impl Camera for FakeCamera {
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, String> {
        self.requested.set(Some(constraints.facing_mode));
        self.tracks_stopped.set(false);
        Ok(Box::new(FakeStream {
            tracks_stopped: self.tracks_stopped.clone(),
        }))
    }
}

impl VideoStream for FakeStream {
    fn has_enough_data(&self) -> bool {
        !self.tracks_stopped.get()
    }

    fn capture_frame(&mut self) -> Option<RgbaImage> {
        Some(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])))
    }

    fn stop_tracks(&mut self) {
        self.tracks_stopped.set(true);
    }
}

/// Decoder that answers from a script and counts attempts.
struct ScriptedDecoder {
    script: RefCell<VecDeque<Option<String>>>,
    calls: Cell<usize>,
    policies: RefCell<Vec<InversionPolicy>>,
}

impl ScriptedDecoder {
    fn new(script: Vec<Option<&str>>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().map(|s| s.map(String::from)).collect()),
            calls: Cell::new(0),
            policies: RefCell::new(Vec::new()),
        }
    }
}

impl QrDecoder for ScriptedDecoder {
    fn decode(&self, request: &DecodeRequest<'_>) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        self.policies.borrow_mut().push(request.inversion);
        self.script.borrow_mut().pop_front().flatten()
    }
}

fn history() -> HistoryLog<MemoryStorage> {
    HistoryLog::new(MemoryStorage::new())
}

#[test]
fn test_three_misses_then_hit_stops_and_logs_once() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![None, None, None, Some("ABC123")]);
    let mut log = history();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    scan.start(&mut camera).unwrap();
    assert_eq!(scan.state(), ScanState::Scanning);

    for _ in 0..3 {
        assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Reschedule);
        assert_eq!(scan.status(), Some(SCANNING_STATUS));
    }
    assert_eq!(
        scan.tick(&decoder, &mut log),
        TickOutcome::Decoded("ABC123".to_string())
    );

    assert_eq!(scan.state(), ScanState::Stopped);
    assert_eq!(scan.status(), Some("QR Code Data: ABC123"));
    assert!(camera.tracks_stopped.get(), "tracks released on success");
    assert!(!scan.has_stream());

    let entries = log.load_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry, "Scanned: ABC123");

    // No further frames once stopped.
    assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Quiesced);
    assert_eq!(decoder.calls.get(), 4);
}

#[test]
fn test_frames_decoded_without_inversion_facing_environment() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![None, Some("x")]);
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    scan.start(&mut camera).unwrap();
    scan.run(&decoder, &mut history(), &mut ImmediateClock, 10);

    assert_eq!(camera.requested.get(), Some(FacingMode::Environment));
    assert!(decoder
        .policies
        .borrow()
        .iter()
        .all(|p| *p == InversionPolicy::DontInvert));
}

#[test]
fn test_stop_releases_camera_and_examines_no_more_frames() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![None, Some("late")]);
    let mut log = history();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    scan.start(&mut camera).unwrap();
    assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Reschedule);

    scan.stop();
    assert_eq!(scan.state(), ScanState::Stopped);
    assert!(camera.tracks_stopped.get());

    // The already-scheduled attempt observes the cancellation.
    assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Quiesced);
    assert_eq!(decoder.calls.get(), 1);
    assert!(log.load_all().is_empty());
}

#[test]
fn test_external_cancel_allows_at_most_one_more_frame() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![None, None, None]);
    let mut log = history();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    let token = scan.start(&mut camera).unwrap();
    assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Reschedule);

    token.cancel();
    assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Quiesced);
    assert_eq!(scan.tick(&decoder, &mut log), TickOutcome::Quiesced);

    assert_eq!(decoder.calls.get(), 2, "one frame after cancel, then none");
    assert_eq!(scan.state(), ScanState::Stopped);
    assert!(camera.tracks_stopped.get());
    assert!(log.load_all().is_empty());
}

#[test]
fn test_last_frame_after_cancel_can_still_succeed() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![Some("just in time")]);
    let mut log = history();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    let token = scan.start(&mut camera).unwrap();
    token.cancel();
    assert_eq!(
        scan.tick(&decoder, &mut log),
        TickOutcome::Decoded("just in time".to_string())
    );
    assert_eq!(log.load_all().len(), 1);
}

#[test]
fn test_second_start_while_scanning_is_rejected() {
    let mut camera = FakeCamera::default();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    scan.start(&mut camera).unwrap();
    assert_eq!(scan.start(&mut camera).unwrap_err(), ScanError::AlreadyScanning);
    assert_eq!(scan.state(), ScanState::Scanning);
}

#[test]
fn test_restart_after_stop_reacquires_camera() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![None, Some("second session")]);
    let mut log = history();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    scan.start(&mut camera).unwrap();
    scan.tick(&decoder, &mut log);
    scan.stop();

    let token = scan.start(&mut camera).unwrap();
    assert!(!token.is_cancelled(), "a fresh session gets a fresh token");
    assert_eq!(scan.attempts(), 0);
    assert_eq!(
        scan.tick(&decoder, &mut log),
        TickOutcome::Decoded("second session".to_string())
    );
}

#[test]
fn test_run_gives_up_after_frame_budget() {
    let mut camera = FakeCamera::default();
    let decoder = ScriptedDecoder::new(vec![]);
    let mut log = history();
    let mut scan = ScanLoop::new(InversionPolicy::DontInvert);

    scan.start(&mut camera).unwrap();
    let outcome = scan.run(&decoder, &mut log, &mut ImmediateClock, 5);

    assert_eq!(outcome, TickOutcome::Quiesced);
    assert_eq!(decoder.calls.get(), 5);
    assert_eq!(scan.state(), ScanState::Stopped);
    assert!(camera.tracks_stopped.get());
}
