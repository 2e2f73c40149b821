//! Tag intersection filtering

use crate::AppError;
use app_db::{CatalogDb, FileId, TagId};
use std::collections::BTreeSet;

/// Read access to tag links, as needed by [`filter`]
pub trait TagIndex {
    /// Ids of every tag carrying `name` (names are unique only by convention)
    fn tag_ids_by_name(&self, name: &str) -> Result<Vec<TagId>, AppError>;

    /// Files linked to `tag_id`
    fn files_with_tag(&self, tag_id: TagId) -> Result<BTreeSet<FileId>, AppError>;
}

impl TagIndex for CatalogDb {
    fn tag_ids_by_name(&self, name: &str) -> Result<Vec<TagId>, AppError> {
        Ok(CatalogDb::tag_ids_by_name(self, name)?)
    }

    fn files_with_tag(&self, tag_id: TagId) -> Result<BTreeSet<FileId>, AppError> {
        Ok(self.tag_files(tag_id)?)
    }
}

/// Result of a filter query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// No tags selected; the full catalog applies
    Unrestricted,
    /// Files linked to every selected tag, ascending by id (possibly empty)
    Restricted(Vec<FileId>),
}

impl TagFilter {
    pub fn is_restricted(&self) -> bool {
        matches!(self, TagFilter::Restricted(_))
    }

    pub fn file_ids(&self) -> Option<&[FileId]> {
        match self {
            TagFilter::Unrestricted => None,
            TagFilter::Restricted(ids) => Some(ids),
        }
    }
}

/// Files linked to every tag in `selected`.
///
/// A name shared by several tags matches a file linked to any of them.
/// An unknown name yields an empty restriction.
pub fn filter<I: TagIndex + ?Sized>(index: &I, selected: &BTreeSet<String>) -> Result<TagFilter, AppError> {
    if selected.is_empty() {
        return Ok(TagFilter::Unrestricted);
    }

    let mut matching: Option<BTreeSet<FileId>> = None;

    for name in selected {
        let mut files_for_name = BTreeSet::new();
        for tag_id in index.tag_ids_by_name(name)? {
            files_for_name.extend(index.files_with_tag(tag_id)?);
        }

        let narrowed = match matching {
            None => files_for_name,
            Some(current) => current.intersection(&files_for_name).copied().collect(),
        };

        if narrowed.is_empty() {
            tracing::debug!("Tag filter {:?} matched nothing at '{}'", selected, name);
            return Ok(TagFilter::Restricted(Vec::new()));
        }
        matching = Some(narrowed);
    }

    let ids: Vec<FileId> = matching.unwrap_or_default().into_iter().collect();
    tracing::debug!("Tag filter {:?} matched {} files", selected, ids.len());
    Ok(TagFilter::Restricted(ids))
}
