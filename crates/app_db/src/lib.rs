//! Candle Catalog Store
//!
//! SQLite-backed storage for the three catalog relations:
//! - `files`: imported media (name, unique path)
//! - `tags`: user-defined labels
//! - `filetags`: many-to-many links between the two

mod sqlite;
mod schema;
mod pool;

pub use sqlite::{CatalogDb, FileRecord, TagRecord, NewFile, InsertReport};
pub use pool::{DbPool, init_pool};
pub use schema::create_schema;

use thiserror::Error;

/// Identity of a File Record, assigned by the store
pub type FileId = i64;

/// Identity of a Tag
pub type TagId = i64;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid database location: {0}")]
    Locator(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<r2d2::Error> for DbError {
    fn from(e: r2d2::Error) -> Self {
        DbError::Pool(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
