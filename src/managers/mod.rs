// QRDesk state managers
// Managers hold the stateful pieces: the history log, saved defaults, and the camera scan loop.

pub mod history_log;
pub mod scan_loop;
pub mod settings_store;
