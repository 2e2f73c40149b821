//! Catalog session: the single owner of the open catalog and its derived state

use crate::cache::{CacheStats, Gallery, ThumbnailCache, ThumbnailEntry};
use crate::index::CatalogIndex;
use crate::media::{DecodeOptions, Media, MediaLoader};
use crate::navigation::{Direction, NavigationState, Step};
use crate::tag_filter::{self, TagFilter};
use crate::thumbnail_pipeline::{PipelineHandle, ThumbnailPipeline};
use crate::{AppError, CatalogConfig};
use app_db::{CatalogDb, FileId, FileRecord, NewFile, TagId, TagRecord};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What the viewer shows for the current file
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub file: FileRecord,
    pub media: Media,
    pub thumbnail: Option<Arc<ThumbnailEntry>>,
}

impl DisplayState {
    pub fn file_id(&self) -> FileId {
        self.file.id
    }

    pub fn is_animated(&self) -> bool {
        self.media.is_animated()
    }
}

/// Result of an import batch
pub struct ImportReport {
    pub imported: Vec<FileRecord>,
    /// Paths already in the catalog
    pub duplicates: Vec<String>,
    /// Paths that are not existing files
    pub missing: Vec<PathBuf>,
    /// Thumbnail run for the relisted catalog
    pub refresh: PipelineHandle,
}

impl ImportReport {
    pub fn skipped(&self) -> usize {
        self.duplicates.len()
    }

    /// Per-path problems of the batch, duplicates first
    pub fn problems(&self) -> Vec<AppError> {
        self.duplicates
            .iter()
            .map(|path| AppError::DuplicatePath(path.clone()))
            .chain(
                self.missing
                    .iter()
                    .map(|path| AppError::NotFound(path.display().to_string())),
            )
            .collect()
    }
}

/// One cell of the gallery
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub file_id: FileId,
    pub name: String,
    /// `None` while the thumbnail is still being generated
    pub thumbnail: Option<Arc<ThumbnailEntry>>,
}

/// Catalog session
pub struct CatalogSession {
    config: CatalogConfig,
    store: Option<CatalogDb>,
    index: CatalogIndex,
    highest_id: Option<FileId>,
    navigation: NavigationState,
    selected_tags: BTreeSet<String>,
    filter: TagFilter,
    cache: Arc<ThumbnailCache>,
    gallery: Arc<Gallery>,
    pipeline: ThumbnailPipeline,
    loader: MediaLoader,
}

impl CatalogSession {
    pub fn new(config: CatalogConfig) -> Self {
        let cache = Arc::new(ThumbnailCache::with_capacity(config.thumbnails.max_entries));
        let gallery = Arc::new(Gallery::new());
        let pipeline = ThumbnailPipeline::new(
            cache.clone(),
            gallery.clone(),
            config.thumbnails.size,
            config.thumbnails.batch_size,
        );

        Self {
            config,
            store: None,
            index: CatalogIndex::new(),
            highest_id: None,
            navigation: NavigationState::new(),
            selected_tags: BTreeSet::new(),
            filter: TagFilter::Unrestricted,
            cache,
            gallery,
            pipeline,
            loader: MediaLoader::new(),
        }
    }

    // ===== Connection =====

    /// Open an existing catalog, replacing the current session state.
    ///
    /// On failure the previous catalog stays open and untouched.
    pub fn open_database(&mut self, path: &Path) -> Result<PipelineHandle, AppError> {
        let store = CatalogDb::connect(path, self.config.store.pool_size).map_err(|e| {
            tracing::error!("Failed to open catalog {:?}: {}", path, e);
            AppError::from(e)
        })?;
        self.install(store)
    }

    /// Create a catalog (or add missing relations to an existing file) and open it
    pub fn create_database(&mut self, path: &Path) -> Result<PipelineHandle, AppError> {
        let store = CatalogDb::create(path, self.config.store.pool_size).map_err(|e| {
            tracing::error!("Failed to create catalog {:?}: {}", path, e);
            AppError::from(e)
        })?;
        self.install(store)
    }

    fn install(&mut self, store: CatalogDb) -> Result<PipelineHandle, AppError> {
        // Query everything before touching session state
        let highest_id = store.max_file_id()?;
        let records = store.list_files()?;

        tracing::info!(
            "Catalog connected: {:?} ({} files, highest id {:?})",
            store.locator(),
            records.len(),
            highest_id
        );

        self.config.remember_database(store.locator());
        self.store = Some(store);
        self.highest_id = highest_id;
        self.navigation.reset();
        self.selected_tags.clear();
        self.filter = TagFilter::Unrestricted;

        Ok(self.relist(records))
    }

    /// Invalidate thumbnails and start a fresh generation run over `records`
    fn relist(&mut self, records: Vec<FileRecord>) -> PipelineHandle {
        let generation = self.cache.clear();
        self.gallery.reset(generation);
        self.index = CatalogIndex::from_records(&records);
        self.pipeline.start(generation, records)
    }

    fn store(&self) -> Result<&CatalogDb, AppError> {
        self.store.as_ref().ok_or(AppError::StoreUnavailable)
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    pub fn locator(&self) -> Option<&Path> {
        self.store.as_ref().map(|s| s.locator())
    }

    // ===== Import =====

    /// Catalog every existing file among `paths`.
    ///
    /// Missing paths and paths already cataloged are skipped and reported.
    pub fn import_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<ImportReport, AppError> {
        let store = self.store()?;

        let mut missing = Vec::new();
        let mut new_files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                tracing::warn!("Import skipped, not a file: {:?}", path);
                missing.push(path.to_path_buf());
                continue;
            }
            let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            new_files.push(NewFile::from_path(&resolved));
        }

        let inserted = store.insert_files(&new_files)?;
        let highest_id = store.max_file_id()?;
        let records = store.list_files()?;

        tracing::info!(
            "Imported {} files ({} duplicates, {} missing)",
            inserted.inserted.len(),
            inserted.duplicates.len(),
            missing.len()
        );

        self.highest_id = highest_id;
        let refresh = self.relist(records);

        Ok(ImportReport {
            imported: inserted.inserted,
            duplicates: inserted.duplicates,
            missing,
            refresh,
        })
    }

    // ===== Tags =====

    pub fn new_tag(&mut self, name: &str) -> Result<TagRecord, AppError> {
        let id = self.store()?.insert_tag(name)?;
        tracing::info!("Tag created: {} ({})", name, id);
        Ok(TagRecord { id, name: name.to_string() })
    }

    pub fn tags(&self) -> Result<Vec<TagRecord>, AppError> {
        Ok(self.store()?.list_tags()?)
    }

    fn resolve_tag(&self, name: &str) -> Result<TagId, AppError> {
        self.store()?
            .tag_ids_by_name(name)?
            .first()
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("tag '{}'", name)))
    }

    /// Link the tag named `tag` to every file in `file_ids`; existing links are kept.
    /// Returns the number of links created.
    pub fn apply_tag(&mut self, tag: &str, file_ids: &[FileId]) -> Result<usize, AppError> {
        let tag_id = self.resolve_tag(tag)?;
        let created = self.store()?.link_tag_to_files(file_ids, tag_id)?;
        tracing::debug!("Tag '{}' applied to {} files ({} new links)", tag, file_ids.len(), created);
        self.refilter()?;
        Ok(created)
    }

    /// Remove the tag named `tag` from every file in `file_ids`.
    /// Returns the number of links deleted.
    pub fn remove_tag(&mut self, tag: &str, file_ids: &[FileId]) -> Result<usize, AppError> {
        let tag_id = self.resolve_tag(tag)?;
        let removed = self.store()?.unlink_tag(file_ids, tag_id)?;
        tracing::debug!("Tag '{}' removed from {} files ({} links)", tag, file_ids.len(), removed);
        self.refilter()?;
        Ok(removed)
    }

    /// Tags currently linked to a file, in tag order
    pub fn tags_of_file(&self, file_id: FileId) -> Result<Vec<TagRecord>, AppError> {
        let store = self.store()?;
        let linked = store.file_tags(file_id)?;
        Ok(store
            .list_tags()?
            .into_iter()
            .filter(|t| linked.contains(&t.id))
            .collect())
    }

    /// Restrict the view to files carrying every tag in `tags`; an empty set lifts the restriction
    pub fn set_tag_filter(&mut self, tags: BTreeSet<String>) -> Result<&TagFilter, AppError> {
        let filter = tag_filter::filter(self.store()?, &tags)?;

        match &filter {
            TagFilter::Unrestricted => self.navigation.clear_restriction(),
            TagFilter::Restricted(ids) => self.navigation.set_restriction(ids.clone()),
        }

        tracing::info!("Tag filter {:?}: {:?}", tags, filter.file_ids().map(|ids| ids.len()));
        self.selected_tags = tags;
        self.filter = filter;
        Ok(&self.filter)
    }

    fn refilter(&mut self) -> Result<(), AppError> {
        if self.selected_tags.is_empty() {
            return Ok(());
        }
        let tags = self.selected_tags.clone();
        self.set_tag_filter(tags)?;
        Ok(())
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    // ===== Gallery =====

    /// Visible items: the active restriction, or every committed thumbnail in catalog order
    pub fn gallery_view(&self) -> Vec<GalleryItem> {
        let ids = match &self.filter {
            TagFilter::Restricted(ids) => ids.clone(),
            TagFilter::Unrestricted => self.gallery.items(),
        };

        ids.into_iter()
            .map(|file_id| GalleryItem {
                file_id,
                name: self.index.get(file_id).map(|r| r.name.clone()).unwrap_or_default(),
                thumbnail: self.cache.get(file_id),
            })
            .collect()
    }

    pub fn thumbnail(&self, file_id: FileId) -> Option<Arc<ThumbnailEntry>> {
        self.cache.get(file_id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.index.records()
    }

    // ===== Selection & navigation =====

    pub fn current_file_id(&self) -> Option<FileId> {
        self.navigation.current()
    }

    pub fn highest_file_id(&self) -> Option<FileId> {
        self.highest_id
    }

    pub fn restriction(&self) -> &[FileId] {
        self.navigation.restriction()
    }

    fn lookup(&self, id: FileId) -> Result<Option<FileRecord>, AppError> {
        if let Some(record) = self.index.get(id) {
            return Ok(Some(record.clone()));
        }
        Ok(self.store()?.file_by_id(id)?)
    }

    /// Display `id`. `Ok(None)` if no such file exists.
    pub async fn select_file(&mut self, id: FileId) -> Result<Option<DisplayState>, AppError> {
        self.store()?;
        match self.lookup(id)? {
            Some(record) => self.show(record).await.map(Some),
            None => {
                tracing::debug!("Select: file {} not found", id);
                Ok(None)
            }
        }
    }

    /// Display the lowest-id file named `name`. `Ok(None)` if there is none.
    pub async fn select_file_by_name(&mut self, name: &str) -> Result<Option<DisplayState>, AppError> {
        let record = match self.index.id_by_name(name) {
            Some(id) => self.lookup(id)?,
            None => self.store()?.file_by_name(name)?,
        };

        match record {
            Some(record) => self.show(record).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn navigate_next(&mut self) -> Result<Option<DisplayState>, AppError> {
        self.navigate(Direction::Next).await
    }

    pub async fn navigate_prev(&mut self) -> Result<Option<DisplayState>, AppError> {
        self.navigate(Direction::Prev).await
    }

    /// Move one step; `Ok(None)` when already at a boundary
    async fn navigate(&mut self, direction: Direction) -> Result<Option<DisplayState>, AppError> {
        self.store()?;

        let index = &self.index;
        let step = self
            .navigation
            .plan(direction, self.highest_id, |id| Ok::<_, AppError>(index.contains(id)))?;

        let Step::MoveTo(id) = step else {
            tracing::debug!("Navigate {:?}: at boundary", direction);
            return Ok(None);
        };

        match self.lookup(id)? {
            Some(record) => self.show(record).await.map(Some),
            None => Ok(None),
        }
    }

    /// Decode `record` for display; the position moves only on success
    async fn show(&mut self, record: FileRecord) -> Result<DisplayState, AppError> {
        let options = DecodeOptions {
            max_size: self.config.viewer.max_display_size,
            animate: self.config.viewer.enable_animation,
        };

        let media = self.loader.load(PathBuf::from(&record.path), options).await.map_err(|e| {
            tracing::warn!("Display load failed for {}: {}", record.path, e);
            e
        })?;

        self.navigation.set_current(record.id);
        Ok(DisplayState {
            thumbnail: self.cache.get(record.id),
            file: record,
            media,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::fixtures::*;
    use tempfile::TempDir;

    fn session() -> CatalogSession {
        let mut config = CatalogConfig::default();
        config.thumbnails.size = 16;
        config.thumbnails.batch_size = 2;
        CatalogSession::new(config)
    }

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Catalog with `n` PNGs named `<prefix>_<i>.png`
    fn catalog_with(prefix: &str, n: usize) -> (TempDir, PathBuf, CatalogSession) {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join(format!("{}.db", prefix));
        let paths: Vec<_> = (0..n)
            .map(|i| write_png(dir.path(), &format!("{}_{}.png", prefix, i), 8, 8))
            .collect();

        let mut session = session();
        session.create_database(&db).unwrap().wait();
        session.import_files(&paths).unwrap().refresh.wait();
        (dir, db, session)
    }

    #[test]
    fn test_operations_require_open_store() {
        let mut session = session();
        assert!(matches!(session.import_files(&["/x.png"]), Err(AppError::StoreUnavailable)));
        assert!(matches!(session.new_tag("a"), Err(AppError::StoreUnavailable)));
        assert!(matches!(session.tags(), Err(AppError::StoreUnavailable)));
        assert!(matches!(session.set_tag_filter(tags(&["a"])), Err(AppError::StoreUnavailable)));
    }

    #[tokio::test]
    async fn test_navigation_requires_open_store() {
        let mut session = session();
        assert!(matches!(session.navigate_next().await, Err(AppError::StoreUnavailable)));
        assert!(matches!(session.select_file(1).await, Err(AppError::StoreUnavailable)));
    }

    #[test]
    fn test_import_skips_duplicates_and_missing() {
        let (dir, _db, mut session) = catalog_with("a", 1);
        let fresh = vec![
            write_png(dir.path(), "n1.png", 8, 8),
            dir.path().join("a_0.png"),
            write_png(dir.path(), "n2.png", 8, 8),
        ];

        let report = session.import_files(&fresh).unwrap();
        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.skipped(), 1);
        assert!(matches!(&report.problems()[..], [AppError::DuplicatePath(p)] if p.ends_with("a_0.png")));
        assert!(report.missing.is_empty());
        report.refresh.wait();

        let report = session.import_files(&[dir.path().join("nope.png")]).unwrap();
        assert_eq!(report.imported.len(), 0);
        assert_eq!(report.missing, vec![dir.path().join("nope.png")]);
        let problems = report.problems();
        assert_eq!(problems.len(), 1);
        assert!(matches!(&problems[0], AppError::NotFound(p) if p.ends_with("nope.png")));
        assert!(problems[0].is_recoverable());
        report.refresh.wait();

        assert_eq!(session.files().count(), 3);
        assert_eq!(session.highest_file_id(), Some(3));
        assert_eq!(session.cache_stats().entries, 3);
        assert_eq!(session.gallery_view().len(), 3);
    }

    #[test]
    fn test_undecodable_import_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        session.create_database(&dir.path().join("c.db")).unwrap().wait();

        let paths = vec![
            write_png(dir.path(), "1.png", 8, 8),
            write_png(dir.path(), "2.png", 8, 8),
            write_garbage(dir.path(), "3.png"),
            write_png(dir.path(), "4.png", 8, 8),
            write_png(dir.path(), "5.png", 8, 8),
        ];
        let report = session.import_files(&paths).unwrap();
        let run = report.refresh.wait();

        assert_eq!(run.completed, 5);
        assert_eq!(run.failures.len(), 1);
        let stats = session.cache_stats();
        assert_eq!((stats.entries, stats.placeholders), (5, 1));
    }

    #[test]
    fn test_switching_databases_discards_stale_thumbnails() {
        let (_dir_a, db_a, _) = catalog_with("a", 40);
        let (_dir_b, db_b, _) = catalog_with("b", 3);

        let mut session = session();
        let run_a = session.open_database(&db_a).unwrap();
        let run_b = session.open_database(&db_b).unwrap();
        run_a.wait();
        run_b.wait();

        let entries = session.cache_stats().entries;
        assert_eq!(entries, 3);
        for item in session.gallery_view() {
            let thumb = item.thumbnail.unwrap();
            assert!(thumb.name.starts_with("b_"), "stale entry {}", thumb.name);
        }
        assert_eq!(
            session.gallery_view().iter().map(|i| i.file_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_failed_open_keeps_session() {
        let (dir, db, mut session) = catalog_with("a", 2);
        session.set_tag_filter(BTreeSet::new()).unwrap();

        let err = session.open_database(&dir.path().join("missing.db")).unwrap_err();
        assert!(matches!(err, AppError::BadLocator(_)));
        assert_eq!(session.locator(), Some(db.as_path()));
        assert_eq!(session.files().count(), 2);
        assert_eq!(session.cache_stats().entries, 2);
    }

    #[test]
    fn test_open_non_database_fails_fast() {
        let (dir, db, mut session) = catalog_with("a", 2);
        let notes = dir.path().join("notes.db");
        std::fs::write(&notes, vec![b'x'; 4096]).unwrap();

        let started = std::time::Instant::now();
        let err = session.open_database(&notes).err().unwrap();
        assert!(matches!(err, AppError::BadLocator(_)), "{:?}", err);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        assert_eq!(session.locator(), Some(db.as_path()));
        assert_eq!(session.files().count(), 2);

        let err = session.create_database(&notes).err().unwrap();
        assert!(matches!(err, AppError::BadLocator(_)), "{:?}", err);
        assert_eq!(session.locator(), Some(db.as_path()));
    }

    #[test]
    fn test_tag_filter_and_mutation() {
        let (_dir, _db, mut session) = catalog_with("a", 4);
        session.new_tag("red").unwrap();
        session.new_tag("round").unwrap();

        assert_eq!(session.apply_tag("red", &[1, 2, 3]).unwrap(), 3);
        assert_eq!(session.apply_tag("red", &[1]).unwrap(), 0);
        session.apply_tag("round", &[2, 3, 4]).unwrap();

        let filter = session.set_tag_filter(tags(&["red", "round"])).unwrap();
        assert_eq!(filter, &TagFilter::Restricted(vec![2, 3]));
        assert_eq!(session.restriction(), &[2, 3]);
        assert_eq!(
            session.gallery_view().iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            vec!["a_1.png", "a_2.png"]
        );

        // Active filter follows link changes
        session.remove_tag("round", &[3]).unwrap();
        assert_eq!(session.restriction(), &[2]);
        assert_eq!(session.remove_tag("round", &[3]).unwrap(), 0);

        let names: Vec<_> = session.tags_of_file(2).unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["red", "round"]);

        assert_eq!(session.set_tag_filter(BTreeSet::new()).unwrap(), &TagFilter::Unrestricted);
        assert!(session.restriction().is_empty());
        assert_eq!(session.gallery_view().len(), 4);
    }

    #[test]
    fn test_unknown_tag_mutation() {
        let (_dir, _db, mut session) = catalog_with("a", 1);
        assert!(matches!(session.apply_tag("ghost", &[1]), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_filter_with_no_matches_is_empty_view() {
        let (_dir, _db, mut session) = catalog_with("a", 2);
        session.new_tag("unused").unwrap();

        let filter = session.set_tag_filter(tags(&["unused"])).unwrap();
        assert_eq!(filter, &TagFilter::Restricted(vec![]));
        assert!(session.gallery_view().is_empty());
    }

    #[tokio::test]
    async fn test_unrestricted_navigation_skips_gaps() {
        let (_dir, db, _) = catalog_with("a", 4);
        {
            let conn = rusqlite_conn(&db);
            conn.execute("DELETE FROM files WHERE id = 2", []).unwrap();
        }

        let mut session = session();
        session.open_database(&db).unwrap().wait();
        assert_eq!(session.highest_file_id(), Some(4));

        let shown = session.select_file(1).await.unwrap().unwrap();
        assert_eq!(shown.file_id(), 1);
        assert!(!shown.is_animated());

        assert_eq!(session.navigate_next().await.unwrap().unwrap().file_id(), 3);
        assert_eq!(session.navigate_next().await.unwrap().unwrap().file_id(), 4);
        assert!(session.navigate_next().await.unwrap().is_none());
        assert_eq!(session.current_file_id(), Some(4));

        assert_eq!(session.navigate_prev().await.unwrap().unwrap().file_id(), 3);
        assert_eq!(session.navigate_prev().await.unwrap().unwrap().file_id(), 1);
        assert!(session.navigate_prev().await.unwrap().is_none());
        assert_eq!(session.current_file_id(), Some(1));
    }

    #[tokio::test]
    async fn test_restricted_navigation() {
        let (_dir, _db, mut session) = catalog_with("a", 5);
        session.new_tag("pick").unwrap();
        session.apply_tag("pick", &[2, 4, 5]).unwrap();

        session.select_file(3).await.unwrap().unwrap();
        session.set_tag_filter(tags(&["pick"])).unwrap();

        // 3 is outside the restriction: jump to its first element
        assert_eq!(session.navigate_next().await.unwrap().unwrap().file_id(), 2);
        assert_eq!(session.navigate_next().await.unwrap().unwrap().file_id(), 4);
        assert_eq!(session.navigate_next().await.unwrap().unwrap().file_id(), 5);
        assert!(session.navigate_next().await.unwrap().is_none());
        assert_eq!(session.navigate_prev().await.unwrap().unwrap().file_id(), 4);
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        session.create_database(&dir.path().join("c.db")).unwrap().wait();
        let paths = vec![
            write_png(dir.path(), "1.png", 8, 8),
            write_garbage(dir.path(), "2.png"),
            write_gif(dir.path(), "3.gif", 3),
        ];
        session.import_files(&paths).unwrap().refresh.wait();

        session.select_file(1).await.unwrap().unwrap();
        let err = session.navigate_next().await.unwrap_err();
        assert!(matches!(err, AppError::DecodeFailure { .. }));
        assert_eq!(session.current_file_id(), Some(1));

        let animated = session.select_file(3).await.unwrap().unwrap();
        assert!(animated.is_animated());
        assert!(animated.thumbnail.is_some());
    }

    #[tokio::test]
    async fn test_select_missing_is_empty() {
        let (_dir, _db, mut session) = catalog_with("a", 1);
        assert!(session.select_file(99).await.unwrap().is_none());
        assert!(session.select_file_by_name("nope.png").await.unwrap().is_none());
        assert_eq!(session.current_file_id(), None);

        let shown = session.select_file_by_name("a_0.png").await.unwrap().unwrap();
        assert_eq!(shown.file_id(), 1);
    }

    fn rusqlite_conn(path: &Path) -> rusqlite::Connection {
        rusqlite::Connection::open(path).unwrap()
    }
}
