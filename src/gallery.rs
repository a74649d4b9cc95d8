//! In-memory gallery of saved photos, keyed by name

use crate::error::GalleryError;
use crate::models::{EntrySummary, SavedEntry};
use log::{debug, info};
use std::collections::HashMap;

/// Saved entries for the lifetime of the process.
///
/// Names are listed in first-insertion order; overwriting an entry keeps
/// its original position.
#[derive(Debug, Default)]
pub struct GalleryStore {
    entries: HashMap<String, SavedEntry>,
    order: Vec<String>,
}

impl GalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or silently overwrites. Returns the entry that was replaced.
    ///
    /// The key is the entry's identity: `entry.name` is set to `name`.
    pub fn put(
        &mut self,
        name: impl Into<String>,
        mut entry: SavedEntry,
    ) -> Option<SavedEntry> {
        let name = name.into();
        entry.name = name.clone();
        let previous = self.entries.insert(name.clone(), entry);
        if previous.is_none() {
            self.order.push(name.clone());
            debug!("[gallery] Added '{}' ({} entries)", name, self.order.len());
        } else {
            debug!("[gallery] Overwrote '{}'", name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Result<&SavedEntry, GalleryError> {
        self.entries
            .get(name)
            .ok_or_else(|| GalleryError::NotFound(name.to_string()))
    }

    /// Names in insertion order. Call again to restart.
    pub fn list(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &SavedEntry> + '_ {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries().map(SavedEntry::summary).collect()
    }

    /// Removes an entry. Not something the upload screens offer; kept for
    /// callers that manage the gallery directly.
    pub fn remove(&mut self, name: &str) -> Result<SavedEntry, GalleryError> {
        let entry = self
            .entries
            .remove(name)
            .ok_or_else(|| GalleryError::NotFound(name.to_string()))?;
        self.order.retain(|n| n != name);
        info!("[gallery] Removed '{}'", name);
        Ok(entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
