//! Batch QR rendering into a zip archive.
//!
//! [`BatchArchiver`] resolves identifiers through a [`RecordLookup`], renders
//! each resolved record with a [`Renderer`] and packs the images into one zip
//! container. The flow for a batch is:
//!
//! 1. Resolve every identifier in one `lookup_many` call. Misses are skipped.
//! 2. Render on blocking worker threads, at most `max_parallel_renders` at a
//!    time. Results come back in input order regardless of completion order.
//! 3. Append entries to an in-memory zip writer strictly in input order.
//!
//! The container only leaves this module once it is complete. A cancellation
//! or a render failure drops the writer and nothing partial is returned.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{QrError, Result};
use crate::lookup::RecordLookup;
use crate::render::{RenderedImage, Renderer};
use crate::types::{CredentialRecord, RecordId};

/// Default number of renders allowed in flight per batch.
pub const DEFAULT_MAX_PARALLEL_RENDERS: usize = 4;

/// Default deflate level: balanced between speed and ratio.
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

/// Characters that are not allowed in file names on at least one major platform.
static ILLEGAL_FILE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("valid file name regex"));

/// Tuning knobs for [`BatchArchiver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Renders allowed in flight at once. Zero is treated as one.
    pub max_parallel_renders: usize,
    /// Deflate level applied to every entry.
    pub compression_level: i64,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            max_parallel_renders: DEFAULT_MAX_PARALLEL_RENDERS,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// A finished zip container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBytes {
    /// The zip bytes.
    pub bytes: Vec<u8>,
    /// Number of entries in the container.
    pub entries: usize,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Suggested download name.
    pub file_name: &'static str,
}

/// Result of [`BatchArchiver::build_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// At least one record resolved.
    Archive(ArchiveBytes),
    /// No identifier resolved to a record.
    Empty,
}

/// Result of [`BatchArchiver::build_single`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOutcome {
    /// The record resolved and rendered.
    Image(RenderedImage),
    /// The identifier did not resolve.
    NotFound,
}

/// Orchestrates lookup, payload encoding, rendering and packaging.
pub struct BatchArchiver<L, R> {
    lookup: Arc<L>,
    renderer: Arc<R>,
    options: ArchiveOptions,
}

impl<L, R> Clone for BatchArchiver<L, R> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            renderer: Arc::clone(&self.renderer),
            options: self.options,
        }
    }
}

impl<L: RecordLookup, R: Renderer> BatchArchiver<L, R> {
    /// Create an archiver over the given collaborators.
    pub fn new(lookup: Arc<L>, renderer: Arc<R>, options: ArchiveOptions) -> Self {
        Self {
            lookup,
            renderer,
            options,
        }
    }

    /// Render one record.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::Cancelled`] if `cancel` fires first, or the
    /// renderer's error.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn build_single(
        &self,
        id: &RecordId,
        cancel: &CancellationToken,
    ) -> Result<SingleOutcome> {
        let record = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(QrError::Cancelled),
            record = self.lookup.lookup(id) => record,
        };

        let Some(record) = record else {
            debug!("Record not found");
            return Ok(SingleOutcome::NotFound);
        };

        let image = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(QrError::Cancelled),
            image = render_blocking(Arc::clone(&self.renderer), record.payload()) => image?,
        };

        Ok(SingleOutcome::Image(image))
    }

    /// Render every resolvable record in `ids` into one zip container.
    ///
    /// Identifiers that do not resolve are skipped. Repeated identifiers are
    /// rendered once, at their first position.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::Cancelled`] if `cancel` fires before the container
    /// is finished. Render and archive errors abort the whole batch.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub async fn build_archive(
        &self,
        ids: &[RecordId],
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        let mut seen = HashSet::with_capacity(ids.len());
        let ids: Vec<RecordId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut resolved = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(QrError::Cancelled),
            found = self.lookup.lookup_many(&ids) => found,
        };

        let records: Vec<CredentialRecord> =
            ids.iter().filter_map(|id| resolved.remove(id)).collect();

        if records.is_empty() {
            info!("No records resolved for batch");
            return Ok(BatchOutcome::Empty);
        }

        let resolved_count = records.len();
        let renderer = Arc::clone(&self.renderer);
        let mut rendered = stream::iter(records)
            .map(|record| {
                let renderer = Arc::clone(&renderer);
                async move {
                    let image = render_blocking(renderer, record.payload()).await?;
                    Ok::<_, QrError>((record, image))
                }
            })
            .buffered(self.options.max_parallel_renders.max(1));

        let mut writer = EntryWriter::new(self.options.compression_level);
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(QrError::Cancelled),
                next = rendered.next() => next,
            };
            let Some(item) = next else { break };
            let (record, image) = item?;
            writer.add(&entry_name(&record, image.extension), &image.bytes)?;
        }

        let archive = writer.finish()?;
        info!(
            resolved = resolved_count,
            bytes = archive.bytes.len(),
            "Built QR archive"
        );
        Ok(BatchOutcome::Archive(archive))
    }
}

/// Run a render on the blocking pool.
async fn render_blocking<R: Renderer>(renderer: Arc<R>, payload: String) -> Result<RenderedImage> {
    tokio::task::spawn_blocking(move || renderer.render(&payload))
        .await
        .map_err(|e| QrError::RenderFailure(format!("render task failed: {e}")))?
}

/// Sequential, in-memory zip writer.
struct EntryWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl EntryWriter {
    fn new(compression_level: i64) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level))
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            entries: 0,
        }
    }

    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(bytes)?;
        self.entries += 1;
        debug!(entry = name, size = bytes.len(), "Added archive entry");
        Ok(())
    }

    fn finish(self) -> Result<ArchiveBytes> {
        let bytes = self.zip.finish()?.into_inner();
        Ok(ArchiveBytes {
            bytes,
            entries: self.entries,
            content_type: "application/zip",
            file_name: "wifi-qrcodes.zip",
        })
    }
}

/// Replace every character that is illegal in a cross-platform file name
/// with `_`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    ILLEGAL_FILE_NAME_CHARS.replace_all(name, "_").into_owned()
}

/// Archive entry name for a record: `<sanitized-ssid>_<id>.<extension>`.
#[must_use]
pub fn entry_name(record: &CredentialRecord, extension: &str) -> String {
    format!("{}_{}.{extension}", sanitize_file_name(&record.ssid), record.id)
}
