use crate::config::{PROGRESS_INTERVAL, WRITE_BUFFER_SIZE};
use crate::error::{ExtractError, Result};
use crate::models::{RawPage, Summary};
use crate::parser::PageReader;
use crate::stats::ExtractionStats;
use crate::writer::AbstractWriter;
use indicatif::ProgressBar;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Stop after scanning this many pages
    pub limit: Option<u64>,
    /// Write only the first summary seen for each title
    pub dedup_titles: bool,
    /// Show a spinner on stderr
    pub show_progress: bool,
}

/// Drives pages through abstract extraction into `out`, one page at a time.
///
/// The root element is closed even when `limit` stops the scan early.
pub fn extract_abstracts<I, W>(
    pages: I,
    out: W,
    options: &ExtractOptions,
) -> Result<(W, ExtractionStats)>
where
    I: IntoIterator<Item = Result<RawPage>>,
    W: Write,
{
    let mut writer = AbstractWriter::begin(out)?;
    let mut stats = ExtractionStats::new();
    let mut seen_titles = FxHashSet::default();

    let pb = if options.show_progress {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };

    let mut pages = pages.into_iter();
    loop {
        // Checked before pulling so no page past the limit is decoded.
        if options.limit.is_some_and(|limit| stats.pages() >= limit) {
            debug!(limit = ?options.limit, "Page limit reached");
            break;
        }

        let Some(page) = pages.next() else {
            break;
        };
        let page = page?;
        stats.inc_pages();

        match Summary::from_page(page) {
            Some(summary) => {
                if options.dedup_titles && !seen_titles.insert(summary.title.clone()) {
                    debug!(title = %summary.title, "Skipping duplicate title");
                    stats.inc_duplicates();
                } else {
                    writer.write_doc(&summary)?;
                    stats.inc_written();
                }
            }
            None => stats.inc_empty(),
        }

        if stats.pages() % PROGRESS_INTERVAL == 0 {
            pb.set_message(format!(
                "{} pages, {} abstracts",
                stats.pages(),
                stats.written()
            ));
            pb.tick();
        }
    }

    pb.finish_and_clear();
    debug_assert!(stats.is_consistent());
    let written = writer.docs_written();
    let out = writer.finish()?;

    info!(
        pages = stats.pages(),
        written,
        empty = stats.empty(),
        duplicates = stats.duplicates(),
        "Extraction finished"
    );

    Ok((out, stats))
}

/// Decompresses and scans `source`, writing the document to `out`.
pub fn run_extraction<R, W>(
    source: R,
    out: W,
    options: &ExtractOptions,
) -> Result<(W, ExtractionStats)>
where
    R: Read,
    W: Write,
{
    extract_abstracts(PageReader::from_compressed(source), out, options)
}

/// Like [`run_extraction`], writing to a newly created file at `output`.
/// A partially written file is left in place on failure.
pub fn extract_to_file<R: Read>(
    source: R,
    output: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionStats> {
    let file = File::create(output).map_err(|source| ExtractError::CreateOutput {
        path: output.to_path_buf(),
        source,
    })?;
    info!(path = %output.display(), "Writing abstracts");

    let out = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let (out, stats) = run_extraction(source, out, options)?;
    out.into_inner()
        .map_err(|e| ExtractError::write_io(e.into_error()))?;

    Ok(stats)
}
