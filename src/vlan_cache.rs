//! Shared VLAN inventory.
//!
//! Maps a VLAN name to the account metadata last fetched for it. The refresh
//! loop is the only writer; scrapes and the `/allVlan` endpoint read.
//!
//! Writes land key by key while a refresh pass paginates, so a scrape running
//! during a pass can see some names already refreshed and others not yet.
//! Names are never removed: an entry stays until a later pass overwrites it.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ikuai::VlanRecord;

/// Cloneable handle to the VLAN inventory.
#[derive(Clone, Default)]
pub struct VlanCache {
    entries: Arc<RwLock<HashMap<String, VlanRecord>>>,
}

impl VlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record stored under `name`.
    pub async fn write(&self, name: String, record: VlanRecord) {
        let mut entries = self.entries.write().await;
        entries.insert(name, record);
    }

    /// Returns a copy of the record stored under `name`.
    ///
    /// `None` means no account label is known for the name; callers fall back
    /// to an empty label.
    pub async fn read(&self, name: &str) -> Option<VlanRecord> {
        let entries = self.entries.read().await;
        entries.get(name).cloned()
    }

    /// Account label for `name`, empty when the name is unknown.
    pub async fn username_of(&self, name: &str) -> String {
        let entries = self.entries.read().await;
        entries
            .get(name)
            .map(|record| record.username.clone())
            .unwrap_or_default()
    }

    /// Point-in-time copy of every entry, ordered by name.
    pub async fn read_all(&self) -> BTreeMap<String, VlanRecord> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
