//! Background thumbnail generation
//!
//! A run decodes the catalog listing in batches on the rayon pool and then
//! commits each batch in input order, so the gallery fills in catalog order
//! while decoding stays parallel.

use crate::cache::{Gallery, Generation, ThumbnailCache, ThumbnailEntry, ThumbnailStatus};
use crate::media::ThumbnailGenerator;
use app_db::{FileId, FileRecord};
use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Progress notification from a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// `completed` items are now cached and listed (1-based, strictly increasing)
    Progress { completed: usize, total: usize },
    /// An item was replaced by a placeholder
    ItemFailed { file_id: FileId, reason: String },
    /// The run finished or was superseded
    Finished { completed: usize, total: usize, cancelled: bool },
}

/// Per-item failure recorded during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub file_id: FileId,
    pub path: String,
    pub reason: String,
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub total: usize,
    pub completed: usize,
    pub cache_hits: usize,
    pub failures: Vec<ItemFailure>,
    /// The cache moved to a newer generation before the run ended
    pub cancelled: bool,
}

/// Handle to a running pipeline
pub struct PipelineHandle {
    generation: Generation,
    total: usize,
    events: Receiver<PipelineEvent>,
    join: Option<JoinHandle<PipelineReport>>,
}

impl fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("generation", &self.generation)
            .field("total", &self.total)
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl PipelineHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Progress stream; disconnects once the run is over
    pub fn events(&self) -> &Receiver<PipelineEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |j| j.is_finished())
    }

    /// Block until the run is over
    pub fn wait(mut self) -> PipelineReport {
        match self.join.take().map(|j| j.join()) {
            Some(Ok(report)) => report,
            Some(Err(_)) => {
                tracing::error!("Thumbnail pipeline thread panicked");
                PipelineReport {
                    total: self.total,
                    cancelled: true,
                    ..Default::default()
                }
            }
            None => PipelineReport::default(),
        }
    }
}

/// Thumbnail generation pipeline
#[derive(Clone)]
pub struct ThumbnailPipeline {
    cache: Arc<ThumbnailCache>,
    gallery: Arc<Gallery>,
    generator: ThumbnailGenerator,
    batch_size: usize,
}

impl ThumbnailPipeline {
    pub fn new(cache: Arc<ThumbnailCache>, gallery: Arc<Gallery>, size: u32, batch_size: usize) -> Self {
        Self {
            cache,
            gallery,
            generator: ThumbnailGenerator::new(size),
            batch_size: batch_size.max(1),
        }
    }

    /// Start generating thumbnails for `records` in the background.
    ///
    /// Results are written only while `generation` is the cache's current one.
    pub fn start(&self, generation: Generation, records: Vec<FileRecord>) -> PipelineHandle {
        let (tx, rx) = crossbeam_channel::unbounded();
        let total = records.len();
        let pipeline = self.clone();

        tracing::info!(
            "Thumbnail pipeline started: {} items (generation {})",
            total,
            generation.value()
        );

        let join = std::thread::spawn(move || pipeline.run(generation, records, tx));

        PipelineHandle {
            generation,
            total,
            events: rx,
            join: Some(join),
        }
    }

    fn entry_for(&self, record: &FileRecord) -> (ThumbnailEntry, bool) {
        if let Some(hit) = self.cache.get(record.id) {
            if hit.name == record.name {
                return ((*hit).clone(), true);
            }
        }

        let (image, status) = match self.generator.generate(Path::new(&record.path)) {
            Ok(image) => (image, ThumbnailStatus::Ready),
            Err(e) => {
                tracing::warn!("Thumbnail failed for {}: {}", record.path, e);
                (
                    self.generator.placeholder(),
                    ThumbnailStatus::Placeholder { reason: e.to_string() },
                )
            }
        };

        let entry = ThumbnailEntry {
            file_id: record.id,
            name: record.name.clone(),
            image,
            status,
        };
        (entry, false)
    }

    fn run(&self, generation: Generation, records: Vec<FileRecord>, tx: Sender<PipelineEvent>) -> PipelineReport {
        let total = records.len();
        let mut report = PipelineReport {
            total,
            ..Default::default()
        };

        'batches: for batch in records.chunks(self.batch_size) {
            if !self.cache.is_current(generation) {
                report.cancelled = true;
                break;
            }

            // par_iter + collect keeps input order
            let produced: Vec<(ThumbnailEntry, bool)> = batch.par_iter().map(|r| self.entry_for(r)).collect();

            for ((entry, hit), record) in produced.into_iter().zip(batch) {
                let failure = match &entry.status {
                    ThumbnailStatus::Placeholder { reason } => Some(reason.clone()),
                    ThumbnailStatus::Ready => None,
                };

                if self.cache.put_if_current(generation, entry).is_none()
                    || !self.gallery.push(generation, record.id)
                {
                    report.cancelled = true;
                    break 'batches;
                }

                report.completed += 1;
                if hit {
                    report.cache_hits += 1;
                }
                if let Some(reason) = failure {
                    let _ = tx.send(PipelineEvent::ItemFailed {
                        file_id: record.id,
                        reason: reason.clone(),
                    });
                    report.failures.push(ItemFailure {
                        file_id: record.id,
                        path: record.path.clone(),
                        reason,
                    });
                }

                let _ = tx.send(PipelineEvent::Progress {
                    completed: report.completed,
                    total,
                });
            }
        }

        if report.cancelled {
            tracing::info!(
                "Thumbnail pipeline superseded after {}/{} items (generation {})",
                report.completed,
                total,
                generation.value()
            );
        } else {
            tracing::info!(
                "Thumbnail pipeline finished: {} items, {} placeholders",
                report.completed,
                report.failures.len()
            );
        }

        let _ = tx.send(PipelineEvent::Finished {
            completed: report.completed,
            total,
            cancelled: report.cancelled,
        });
        report
    }
}
