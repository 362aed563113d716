//! QRDesk — QR code generation, camera/upload scanning, and a persisted
//! history of both, with saved generation defaults.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
