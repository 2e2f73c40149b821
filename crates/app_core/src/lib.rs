//! Candle core domain logic
//!
//! This crate contains:
//! - Catalog session and command dispatch
//! - Thumbnail cache and generation pipeline
//! - Tag filtering and navigation
//! - Media decoding
//! - Configuration
//! - Error types

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod index;
pub mod media;
pub mod navigation;
pub mod session;
pub mod tag_filter;
pub mod thumbnail_pipeline;

pub use cache::{CacheStats, Gallery, Generation, ThumbnailCache, ThumbnailEntry, ThumbnailStatus};
pub use command::{Command, CommandId, Outcome};
pub use config::{CatalogConfig, GeneralConfig, StoreConfig, ThumbnailConfig, ViewerConfig};
pub use error::AppError;
pub use index::CatalogIndex;
pub use media::{
    decode_media, AnimationFrame, DecodeOptions, Media, MediaLoader, Pixels,
    ThumbnailGenerator,
};
pub use navigation::{Direction, NavigationMode, NavigationState, Step};
pub use session::{CatalogSession, DisplayState, GalleryItem, ImportReport};
pub use tag_filter::{TagFilter, TagIndex};
pub use thumbnail_pipeline::{ItemFailure, PipelineEvent, PipelineHandle, PipelineReport, ThumbnailPipeline};

pub use app_db::{FileId, FileRecord, TagId, TagRecord};
