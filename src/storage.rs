//! LocalStorage persistence of the four user-data collections
//!
//! Each collection lives under its own key as a JSON-encoded array. A [`Save`]
//! snapshot only exists transiently: it is reconstructed from the four keys
//! for a merge or an export, then split back into four independent entries.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use crate::save::Save;

/// Storage key for the saved API keys collection
pub const KEY_API_KEYS: &str = "apiKeys";
/// Storage key for the saved images collection
pub const KEY_IMAGES: &str = "images";
/// Storage key for the saved models collection
pub const KEY_MODELS: &str = "models";
/// Storage key for the saved LoRAs collection
pub const KEY_LORAS: &str = "loras";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Write all four collections of `save` to LocalStorage, one key each
///
/// The entries are independent; a failure partway through leaves the earlier
/// writes in place.
#[cfg(target_arch = "wasm32")]
pub fn store_save(save: &Save) -> Result<(), JsValue> {
    let storage =
        local_storage().ok_or_else(|| JsValue::from_str("LocalStorage is unavailable"))?;

    storage.set_item(KEY_API_KEYS, &to_json(&save.saved_api_keys)?)?;
    storage.set_item(KEY_IMAGES, &to_json(&save.saved_images)?)?;
    storage.set_item(KEY_MODELS, &to_json(&save.saved_models)?)?;
    storage.set_item(KEY_LORAS, &to_json(&save.saved_loras)?)?;
    log::info!(
        "Saved collections ({} keys, {} models, {} LoRAs, {} images)",
        save.saved_api_keys.len(),
        save.saved_models.len(),
        save.saved_loras.len(),
        save.saved_images.len()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Reconstruct a [`Save`] snapshot from the four LocalStorage keys
///
/// Missing or unparsable entries yield empty collections; `sign` is unset.
#[cfg(target_arch = "wasm32")]
pub fn load_save() -> Save {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage is unavailable, starting empty");
        return Save::default();
    };

    let collection = |key: &str| -> Option<String> { storage.get_item(key).ok().flatten() };

    Save {
        saved_api_keys: from_json(collection(KEY_API_KEYS)),
        saved_models: from_json(collection(KEY_MODELS)),
        saved_loras: from_json(collection(KEY_LORAS)),
        saved_images: from_json(collection(KEY_IMAGES)),
        sign: None,
    }
}

#[cfg(target_arch = "wasm32")]
fn from_json<T: serde::de::DeserializeOwned>(json: Option<String>) -> Vec<T> {
    json.and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

/// Remove all four collection keys from LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn clear_save() {
    if let Some(storage) = local_storage() {
        for key in [KEY_API_KEYS, KEY_IMAGES, KEY_MODELS, KEY_LORAS] {
            let _ = storage.remove_item(key);
        }
        log::info!("Saved collections cleared");
    }
}
