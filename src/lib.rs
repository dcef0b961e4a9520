//! Sinkin Save - client-side save management for the Sinkin front-end
//!
//! Core modules:
//! - `api`: Typed request/response shapes of the generation service
//! - `save`: The `Save` snapshot and the signature-checked merge
//! - `storage`: LocalStorage persistence of the four collections
//! - `transfer`: Browser file export/import and the file-picker affordance
//!
//! Everything that touches the DOM or LocalStorage is compiled for wasm32
//! only; the snapshot types and merge logic are platform-independent.

pub mod api;
pub mod save;
pub mod storage;
pub mod transfer;

pub use api::{ApiKey, Image, Lora, Model};
pub use save::{SAVE_SIGN, Save, merge_data};

/// Install the platform logger; call once at front-end startup
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the platform logger; call once at front-end startup
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::try_init();
}
