//! Save exchange through the browser: file export, import and selection
//!
//! Export serializes a stamped snapshot and triggers a download through a
//! temporary anchor; the blob object URL is held by a guard that revokes it
//! when dropped. Import reads a user-selected file as text, validates the
//! signature marker, merges into the current snapshot and persists the
//! result. Each async operation suspends on exactly one browser event.

#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Promise};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;
#[cfg(target_arch = "wasm32")]
use web_sys::{Blob, BlobPropertyBag, Document, File, HtmlAnchorElement, HtmlInputElement, Url};

#[cfg(target_arch = "wasm32")]
use crate::storage;

use crate::save::{SAVE_SIGN, Save, merge_data};

/// Build `YYYY-MM-DD_HH-MM-SS-<name>.<ext>` from broken-down time fields
///
/// Month, day, hour, minute and second are zero-padded to two digits;
/// `config_name` falls back to `"config"`.
pub fn format_date_filename(
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    config_name: Option<&str>,
    extension: &str,
) -> String {
    format!(
        "{year:04}-{month:02}-{day:02}_{hour:02}-{minute:02}-{second:02}-{}.{extension}",
        config_name.unwrap_or("config"),
    )
}

/// Filename for an export started now, e.g. `2024-03-05_08-07-09-config.json`
#[cfg(target_arch = "wasm32")]
pub fn date_filename(extension: &str, config_name: Option<&str>) -> String {
    let now = js_sys::Date::new_0();
    format_date_filename(
        now.get_full_year(),
        now.get_month() + 1, // months are 0-based
        now.get_date(),
        now.get_hours(),
        now.get_minutes(),
        now.get_seconds(),
        config_name,
        extension,
    )
}

/// Parse imported text and merge it into `current`, without touching storage
///
/// `Ok(None)` means the text parsed but does not carry the signature marker;
/// `current` is left unmodified in that case. On a signed snapshot `current`
/// is stamped as trusted and the merged result is returned.
pub fn merge_from_text(current: &mut Save, text: &str) -> Result<Option<Save>, serde_json::Error> {
    let incoming: Save = serde_json::from_str(text)?;
    if !incoming.is_signed() {
        log::error!("Imported file is not a recognized save");
        return Ok(None);
    }
    current.sign = Some(SAVE_SIGN.to_owned());
    Ok(merge_data(current, &incoming))
}

/// Temporary blob URL, revoked when dropped
#[cfg(target_arch = "wasm32")]
struct ObjectUrl(String);

#[cfg(target_arch = "wasm32")]
impl ObjectUrl {
    fn new(blob: &Blob) -> Result<Self, JsValue> {
        Url::create_object_url_with_blob(blob).map(Self)
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.0);
    }
}

#[cfg(target_arch = "wasm32")]
fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Stamp `content` as trusted and download it as `filename`
///
/// Browser failures propagate to the caller.
#[cfg(target_arch = "wasm32")]
pub fn export_save(filename: &str, content: &mut Save) -> Result<(), JsValue> {
    content.sign = Some(SAVE_SIGN.to_owned());
    let json = serde_json::to_string(content).map_err(|e| JsValue::from_str(&e.to_string()))?;
    download_text(filename, &json)?;
    log::info!("Exported save as {filename}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn download_text(filename: &str, text: &str) -> Result<(), JsValue> {
    let document = document()?;

    let parts = Array::of1(&JsValue::from_str(text));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = ObjectUrl::new(&blob)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("created element is not an anchor"))?;
    anchor.set_href(url.as_str());
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Ok(())
}

/// Import a save file and persist the merged collections
///
/// Returns `false` without writing anything when the file is not a signed
/// save; read, parse and persist failures are logged and reported the same
/// way.
#[cfg(target_arch = "wasm32")]
pub async fn import_save(file: &File, current: &mut Save) -> bool {
    match import_inner(file, current).await {
        Ok(stored) => stored,
        Err(err) => {
            log::error!("Save import failed: {err:?}");
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn import_inner(file: &File, current: &mut Save) -> Result<bool, JsValue> {
    let text = JsFuture::from(file.text()).await?;
    let text = text
        .as_string()
        .ok_or_else(|| JsValue::from_str("file did not read as text"))?;

    let merged = match merge_from_text(current, &text) {
        Ok(Some(merged)) => merged,
        Ok(None) => return Ok(false),
        Err(err) => return Err(JsValue::from_str(&err.to_string())),
    };

    storage::store_save(&merged)?;
    log::info!("Imported save from {}", file.name());
    Ok(true)
}

/// Ask the user for a file, restricted by the `accept` MIME filter
///
/// Resolves once the picker's change event fires; `None` when no file was
/// provided. The picker cannot be cancelled programmatically.
#[cfg(target_arch = "wasm32")]
pub async fn prompt_file(accept: &str) -> Result<Option<File>, JsValue> {
    let document = document()?;
    let input: HtmlInputElement = document
        .create_element("input")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("created element is not an input"))?;
    input.set_type("file");
    input.set_accept(accept);

    let promise = Promise::new(&mut |resolve, _reject| {
        let picker = input.clone();
        let onchange = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let file = picker.files().and_then(|files| files.get(0));
            let value = file.map_or(JsValue::NULL, JsValue::from);
            let _ = resolve.call1(&JsValue::NULL, &value);
        });
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    });
    input.click();

    let selected = JsFuture::from(promise).await?;
    Ok(selected.dyn_into::<File>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiKey;

    #[test]
    fn test_format_date_filename_pads_to_two_digits() {
        let name = format_date_filename(2024, 3, 5, 8, 7, 9, Some("cfg"), "json");
        assert_eq!(name, "2024-03-05_08-07-09-cfg.json");
    }

    #[test]
    fn test_format_date_filename_defaults_config_name() {
        let name = format_date_filename(2025, 12, 31, 23, 59, 58, None, "json");
        assert_eq!(name, "2025-12-31_23-59-58-config.json");
    }

    fn save_with_key(code: &str, credits: f64) -> Save {
        Save {
            saved_api_keys: vec![ApiKey {
                code: code.into(),
                credits_left: credits,
            }],
            ..Save::default()
        }
    }

    #[test]
    fn test_merge_from_text_rejects_unsigned() {
        let mut current = save_with_key("a", 1.0);
        let text = r#"{"savedApiKeys":[{"code":"b","creditsLeft":2}]}"#;
        let merged = merge_from_text(&mut current, text).unwrap();
        assert!(merged.is_none());
        // current must stay untouched, sign included
        assert_eq!(current, save_with_key("a", 1.0));
    }

    #[test]
    fn test_merge_from_text_rejects_malformed_json() {
        let mut current = Save::default();
        assert!(merge_from_text(&mut current, "not json{").is_err());
    }

    #[test]
    fn test_merge_from_text_merges_and_stamps_current() {
        let mut current = save_with_key("a", 1.0);
        let text = concat!(
            r#"{"savedApiKeys":[{"code":"a","creditsLeft":9},{"code":"b","creditsLeft":2}],"#,
            r#""sign":"SinkinAPISave"}"#
        );

        let merged = merge_from_text(&mut current, text).unwrap().unwrap();
        assert_eq!(current.sign.as_deref(), Some(SAVE_SIGN));

        let codes: Vec<&str> = merged
            .saved_api_keys
            .iter()
            .map(|k| k.code.as_str())
            .collect();
        assert_eq!(codes, ["a", "b"]);
        // existing key takes the incoming balance
        assert_eq!(merged.saved_api_keys[0].credits_left, 9.0);
    }
}
