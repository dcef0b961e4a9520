//! User-data snapshots and the save-merge algorithm
//!
//! A [`Save`] bundles the four persisted collections (API keys, models,
//! LoRAs, generated images) into one exchangeable snapshot. Snapshots are
//! merged per-collection with insertion-ordered upsert semantics: every
//! record of the current snapshot goes in first, then every record of the
//! incoming one; a colliding identity key keeps its original position but
//! takes the incoming value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::{ApiKey, Image, Lora, Model};

/// Signature marker that distinguishes our save files from arbitrary JSON
pub const SAVE_SIGN: &str = "SinkinAPISave";

/// A snapshot of a user's saved data
///
/// Within each collection, identity keys (`code`, `id`, `id`, `image_url`)
/// are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Save {
    #[serde(default)]
    pub saved_api_keys: Vec<ApiKey>,
    #[serde(default)]
    pub saved_models: Vec<Model>,
    #[serde(rename = "savedLoRAs", default)]
    pub saved_loras: Vec<Lora>,
    #[serde(default)]
    pub saved_images: Vec<Image>,
    /// Present and equal to [`SAVE_SIGN`] on trusted snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
}

impl Save {
    /// Whether this snapshot carries the trusted signature marker
    pub fn is_signed(&self) -> bool {
        self.sign.as_deref() == Some(SAVE_SIGN)
    }
}

/// Merge two collections keyed by identity; incoming records win on collision
fn merge_by_key<'a, T, F>(current: &'a [T], incoming: &'a [T], key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&'a T) -> &'a str,
{
    let mut merged: IndexMap<&str, T> = IndexMap::with_capacity(current.len() + incoming.len());
    for record in current.iter().chain(incoming) {
        merged.insert(key(record), record.clone());
    }
    merged.into_values().collect()
}

/// Merge a loaded snapshot into the current one
///
/// Returns `None` when `incoming` does not carry the signature marker
/// (foreign or untrusted data; nothing is merged). `current` is never
/// validated. The result's `sign` is unset; the caller stamps it before
/// exporting. Pure function of its two inputs.
pub fn merge_data(current: &Save, incoming: &Save) -> Option<Save> {
    if !incoming.is_signed() {
        return None;
    }
    Some(Save {
        saved_api_keys: merge_by_key(&current.saved_api_keys, &incoming.saved_api_keys, |k| {
            k.code.as_str()
        }),
        saved_models: merge_by_key(&current.saved_models, &incoming.saved_models, |m| {
            m.id.as_str()
        }),
        saved_loras: merge_by_key(&current.saved_loras, &incoming.saved_loras, |l| l.id.as_str()),
        saved_images: merge_by_key(&current.saved_images, &incoming.saved_images, |i| {
            i.image_url.as_str()
        }),
        sign: None,
    })
}
