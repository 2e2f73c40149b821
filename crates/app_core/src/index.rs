//! In-memory index over the catalog listing

use app_db::{FileId, FileRecord};
use std::collections::{BTreeMap, HashMap};

/// Snapshot of every File Record, rebuilt whenever the catalog is relisted
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    by_id: BTreeMap<FileId, FileRecord>,
    by_name: HashMap<String, FileId>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut index = Self::new();
        for record in records {
            // Names may repeat; the lowest id wins, matching store lookups
            index.by_name.entry(record.name.clone()).or_insert(record.id);
            index.by_id.insert(record.id, record.clone());
        }
        index
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn get(&self, id: FileId) -> Option<&FileRecord> {
        self.by_id.get(&id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<FileId> {
        self.by_name.get(name).copied()
    }

    /// Records in ascending id order
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.by_id.values()
    }

    pub fn max_id(&self) -> Option<FileId> {
        self.by_id.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
