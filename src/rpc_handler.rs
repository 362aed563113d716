//! RPC method handler for the QRDesk JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! `App` struct.

use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::history_log::HistoryLogTrait;
use crate::services::camera::ImageSequenceCamera;
use crate::services::upload::UploadSource;
use crate::types::history::HistoryEntry;
use crate::types::scan::{Notice, TickOutcome};

/// Reads a positive integer that may arrive as a number or a numeric string.
fn param_u32(params: &Value, key: &str) -> Result<Option<u32>, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("invalid {}", key)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| format!("invalid {}", key)),
        Some(_) => Err(format!("invalid {}", key)),
    }
}

fn param_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn history_json(entries: &[HistoryEntry]) -> Value {
    let items: Vec<Value> = entries
        .iter()
        .map(|e| json!({"date": e.date, "entry": e.entry, "row": e.row()}))
        .collect();
    json!({"items": items})
}

fn notice_json(notice: &Notice) -> Value {
    serde_json::to_value(notice).unwrap_or(Value::Null)
}

fn outcome_json(app: &App, outcome: &TickOutcome) -> Value {
    let (outcome_name, payload) = match outcome {
        TickOutcome::Reschedule => ("reschedule", None),
        TickOutcome::Decoded(text) => ("decoded", Some(text.clone())),
        TickOutcome::Quiesced => ("quiesced", None),
    };
    json!({
        "outcome": outcome_name,
        "payload": payload,
        "state": app.scanner.state(),
        "status": app.scan_result(),
        "attempts": app.scanner.attempts(),
    })
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Startup ───
        "app.startup" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let entries = a.startup();
            let settings = serde_json::to_value(a.settings.current()).map_err(|e| e.to_string())?;
            Ok(json!({"settings": settings, "history": entries}))
        }

        // ─── Generator ───
        "qr.generate" => {
            let text = param_str(params, "text").ok_or("missing text")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let code = a.generate(text).map_err(|e| e.to_string())?;
            serde_json::to_value(&code).map_err(|e| e.to_string())
        }
        "qr.decode_upload" => {
            let source = match (param_str(params, "path"), param_str(params, "data_url")) {
                (Some(path), _) => UploadSource::Path(PathBuf::from(path)),
                (None, Some(url)) => UploadSource::DataUrl(url.to_string()),
                (None, None) => return Err("missing path or data_url".to_string()),
            };
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a.decode_upload(&source).map_err(|e| e.to_string())?;
            serde_json::to_value(&outcome).map_err(|e| e.to_string())
        }

        // ─── History ───
        "history.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(history_json(a.history.entries()))
        }
        "history.clear" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.history.clear().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let working = serde_json::to_value(a.settings.current()).map_err(|e| e.to_string())?;
            let saved = serde_json::to_value(a.saved_defaults()).map_err(|e| e.to_string())?;
            Ok(json!({"working": working, "saved": saved}))
        }
        "settings.save" => {
            let size = param_u32(params, "size")?.ok_or("missing size")?;
            let background = param_str(params, "background").ok_or("missing background")?;
            let foreground = param_str(params, "foreground").ok_or("missing foreground")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let notice = a
                .save_settings(size, background, foreground)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "notice": notice_json(&notice)}))
        }
        "settings.set_working" => {
            let size = param_u32(params, "size")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            if let Some(size) = size {
                a.settings.set_size(size).map_err(|e| e.to_string())?;
            }
            if let Some(bg) = param_str(params, "background") {
                a.settings.set_background(bg);
            }
            if let Some(fg) = param_str(params, "foreground") {
                a.settings.set_foreground(fg);
            }
            serde_json::to_value(a.settings.current()).map_err(|e| e.to_string())
        }

        // ─── Scanner ───
        "scan.start" => {
            let source = param_str(params, "source").ok_or("missing source")?;
            let looping = params.get("loop").and_then(|v| v.as_bool()).unwrap_or(false);
            let mut camera = ImageSequenceCamera::new(source).looping(looping);
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.start_scan(&mut camera).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "state": a.scanner.state()}))
        }
        "scan.tick" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a.scan_tick();
            Ok(outcome_json(&a, &outcome))
        }
        "scan.stop" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.stop_scan();
            Ok(json!({"ok": true, "state": a.scanner.state()}))
        }
        "scan.status" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({
                "state": a.scanner.state(),
                "status": a.scan_result(),
                "attempts": a.scanner.attempts(),
                "payload": a.scanner.last_payload(),
            }))
        }
        "scan.run" => {
            let source = param_str(params, "source").ok_or("missing source")?;
            let max_frames = param_u32(params, "max_frames")?;
            let mut camera = ImageSequenceCamera::new(source);
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a
                .run_scan(&mut camera, max_frames)
                .map_err(|e| e.to_string())?;
            Ok(outcome_json(&a, &outcome))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
