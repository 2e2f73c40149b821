//! SQLite catalog operations

use crate::schema::{inspect_catalog, inspect_database};
use crate::{create_schema, init_pool, DbError, DbPool, FileId, Result, TagId};
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{ErrorCode, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Imported media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    pub path: String,
}

impl FileRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            path: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    }
}

/// Tag record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: TagId,
    pub name: String,
}

/// File to be inserted
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub path: String,
}

impl NewFile {
    /// Build from a filesystem path, using the final component as the display name
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            path: path.to_string_lossy().into_owned(),
        }
    }
}

/// Outcome of a batch insert
#[derive(Debug, Clone, Default)]
pub struct InsertReport {
    /// Rows that were written, in input order
    pub inserted: Vec<FileRecord>,
    /// Paths rejected because they are already cataloged
    pub duplicates: Vec<String>,
}

/// Catalog database handle
///
/// Owns its connection pool; one handle per opened catalog.
pub struct CatalogDb {
    pool: DbPool,
    locator: PathBuf,
}

impl CatalogDb {
    /// Create (or extend) a catalog at `path`, adding any missing relations
    pub fn create(path: &Path, pool_size: u32) -> Result<Self> {
        if path.is_dir() {
            return Err(DbError::Locator(format!("{} is a directory", path.display())));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        if path.is_file() {
            inspect_database(path)?;
        }

        let pool = init_pool(path, pool_size)?;
        create_schema(&pool)?;

        tracing::info!("Catalog created at {:?}", path);
        Ok(Self { pool, locator: path.to_path_buf() })
    }

    /// Connect to an existing catalog at `path`
    pub fn connect(path: &Path, pool_size: u32) -> Result<Self> {
        if !path.is_file() {
            return Err(DbError::Locator(format!("{} is not a catalog file", path.display())));
        }

        inspect_catalog(path)?;
        let pool = init_pool(path, pool_size)?;

        tracing::info!("Catalog connected at {:?}", path);
        Ok(Self { pool, locator: path.to_path_buf() })
    }

    /// Location this handle was opened from
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    // ===== File Operations =====

    /// Highest assigned file id, `None` for an empty catalog
    pub fn max_file_id(&self) -> Result<Option<FileId>> {
        let conn = self.conn()?;
        let max = conn.query_row("SELECT MAX(id) FROM files", [], |row| row.get(0))?;
        Ok(max)
    }

    /// Insert files one row at a time inside a single transaction.
    ///
    /// A row whose path is already present is skipped and reported; the
    /// remaining rows are still written.
    pub fn insert_files(&self, files: &[NewFile]) -> Result<InsertReport> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut report = InsertReport::default();

        {
            let mut stmt = tx.prepare("INSERT INTO files (name, path) VALUES (?1, ?2)")?;

            for file in files {
                match stmt.execute([&file.name, &file.path]) {
                    Ok(_) => report.inserted.push(FileRecord {
                        id: tx.last_insert_rowid(),
                        name: file.name.clone(),
                        path: file.path.clone(),
                    }),
                    Err(rusqlite::Error::SqliteFailure(err, _))
                        if err.code == ErrorCode::ConstraintViolation =>
                    {
                        tracing::warn!("Duplicate path rejected: {}", file.path);
                        report.duplicates.push(file.path.clone());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tx.commit()?;
        Ok(report)
    }

    /// All files in ascending id order
    pub fn list_files(&self) -> Result<Vec<FileRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, path FROM files ORDER BY id")?;
        let rows = stmt.query_map([], FileRecord::from_row)?;

        let mut files = Vec::new();
        for row in rows {
            files.push(row?);
        }

        Ok(files)
    }

    /// Get a file by id
    pub fn file_by_id(&self, id: FileId) -> Result<Option<FileRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row("SELECT id, name, path FROM files WHERE id = ?1", [id], FileRecord::from_row)
            .optional()?;
        Ok(record)
    }

    /// Get the lowest-id file with the given display name
    pub fn file_by_name(&self, name: &str) -> Result<Option<FileRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT id, name, path FROM files WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                FileRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    // ===== Tag Operations =====

    /// Create a new tag
    pub fn insert_tag(&self, name: &str) -> Result<TagId> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO tags (name) VALUES (?1)", [name])?;
        Ok(conn.last_insert_rowid())
    }

    /// All tags in ascending id order
    pub fn list_tags(&self) -> Result<Vec<TagRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM tags ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(TagRecord {
                id: row.get(0)?,
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }

        Ok(tags)
    }

    /// Ids of every tag carrying `name`
    pub fn tag_ids_by_name(&self, name: &str) -> Result<Vec<TagId>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id FROM tags WHERE name = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map([name], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<TagId>>>()?;
        Ok(ids)
    }

    /// Files linked to a tag
    pub fn tag_files(&self, tag_id: TagId) -> Result<BTreeSet<FileId>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT fileid FROM filetags WHERE tagid = ?1")?;
        let ids = stmt
            .query_map([tag_id], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<FileId>>>()?;
        Ok(ids)
    }

    /// Tags linked to a file
    pub fn file_tags(&self, file_id: FileId) -> Result<BTreeSet<TagId>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT tagid FROM filetags WHERE fileid = ?1")?;
        let ids = stmt
            .query_map([file_id], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<TagId>>>()?;
        Ok(ids)
    }

    /// Link a tag to a file. Returns `false` if the link already existed.
    pub fn link_tag(&self, file_id: FileId, tag_id: TagId) -> Result<bool> {
        Ok(self.link_tag_to_files(&[file_id], tag_id)? == 1)
    }

    /// Link a tag to every file in `file_ids`, skipping existing links.
    /// Returns the number of links created.
    pub fn link_tag_to_files(&self, file_ids: &[FileId], tag_id: TagId) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut created = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO filetags (fileid, tagid)
                 SELECT ?1, ?2
                 WHERE NOT EXISTS (SELECT 1 FROM filetags WHERE fileid = ?1 AND tagid = ?2)",
            )?;

            for &file_id in file_ids {
                created += stmt.execute([file_id, tag_id])?;
            }
        }

        tx.commit()?;
        Ok(created)
    }

    /// Remove a tag from every file in `file_ids` in one transaction.
    /// Returns the number of links deleted.
    pub fn unlink_tag(&self, file_ids: &[FileId], tag_id: TagId) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut removed = 0;

        {
            let mut stmt = tx.prepare("DELETE FROM filetags WHERE fileid = ?1 AND tagid = ?2")?;
            for &file_id in file_ids {
                removed += stmt.execute([file_id, tag_id])?;
            }
        }

        tx.commit()?;
        Ok(removed)
    }

    /// Number of links for a (file, tag) pair
    pub fn link_count(&self, file_id: FileId, tag_id: TagId) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM filetags WHERE fileid = ?1 AND tagid = ?2",
            [file_id, tag_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
