//! TOML files holding timelines and outlines.
//!
//! The timeline file is a serialized [`MemoryStore`]: it is loaded as the
//! existing store before a run and written back afterwards, so repeated runs
//! append to it or regenerate in place just as they would in an editor.

use std::{fs, path::Path};

use log::{debug, info};
use serde::Serialize;

use unfurl::{
    UnfurlError,
    script::OutlineScene,
    store::{MemoryStore, StoreError},
};

/// Loads the timeline at `path`, or an empty one if the file is missing.
///
/// # Errors
///
/// Returns [`UnfurlError::Io`] if the file cannot be read, or a store
/// backend error if it is not a valid timeline.
pub fn load(path: impl AsRef<Path>) -> Result<MemoryStore, UnfurlError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = path.display().to_string(); "No timeline file yet, starting empty");
        return Ok(MemoryStore::new());
    }

    let content = fs::read_to_string(path)?;
    let store: MemoryStore = toml::from_str(&content).map_err(|err| {
        StoreError::Backend(format!("invalid timeline file {}: {err}", path.display()))
    })?;

    info!(
        path = path.display().to_string(),
        segments = store.segments().len();
        "Loaded timeline"
    );
    Ok(store)
}

/// Writes `store` to `path`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save(path: impl AsRef<Path>, store: &MemoryStore) -> Result<(), UnfurlError> {
    write_toml(path.as_ref(), store)
}

#[derive(Serialize)]
struct OutlineFile<'a> {
    scenes: &'a [OutlineScene],
}

/// Writes the beat outline to `path`.
///
/// # Errors
///
/// Returns a rejected store error if `path` already holds a timeline with
/// segments, or an error if serialization or the write fails.
pub fn save_outline(path: impl AsRef<Path>, scenes: &[OutlineScene]) -> Result<(), UnfurlError> {
    let path = path.as_ref();
    if holds_timeline(path) {
        return Err(StoreError::rejected(
            "writing the outline",
            format!("{} holds a timeline", path.display()),
        )
        .into());
    }
    write_toml(path, &OutlineFile { scenes })
}

fn holds_timeline(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| toml::from_str::<MemoryStore>(&content).ok())
        .is_some_and(|store| !store.segments().is_empty())
}

fn write_toml(path: &Path, value: &impl Serialize) -> Result<(), UnfurlError> {
    let content = toml::to_string(value).map_err(|err| {
        StoreError::Backend(format!("cannot serialize {}: {err}", path.display()))
    })?;
    fs::write(path, content)?;

    info!(path = path.display().to_string(); "File written");
    Ok(())
}
