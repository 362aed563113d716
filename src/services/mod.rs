// QRDesk services
// Services wrap external capability: QR encode/decode, camera frames, uploads, and the config file.

pub mod camera;
pub mod config_engine;
pub mod qr_decoder;
pub mod qr_generator;
pub mod upload;
