use anyhow::Context;
use indicatif::ProgressBar;

use super::source::{FeatureSource, Page, PageOptions};

pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Largest page the Datasets API serves.
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_MAX_PAGE_RETRIES: usize = 3;

pub struct IngestParams {
    pub page_size: usize,
    /// How often a failed page request is repeated before ingestion is aborted.
    pub max_page_retries: usize,
}

impl Default for IngestParams {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_retries: DEFAULT_MAX_PAGE_RETRIES,
        }
    }
}

/// Running count of ingested features against the declared total. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestProgress {
    pub ingested: u64,
    pub declared_total: u64,
}

pub struct Ingested {
    pub features: Vec<geojson::Feature>,
    pub pages: usize,
    pub progress: IngestProgress,
}

/// Read all features of a dataset, page by page, in page order and in-page order.
///
/// Only the absence of a continuation token ends the loop, `declared_total` is used for progress
/// display. A failing page request is retried with the same options up to `max_page_retries` times,
/// after which the last error is returned. Pages are never skipped.
pub fn ingest_features(
    source: &dyn FeatureSource,
    dataset_id: &str,
    declared_total: u64,
    params: &IngestParams,
) -> anyhow::Result<Ingested> {
    let mut features = Vec::new();
    let mut pages = 0;
    let mut progress = IngestProgress {
        ingested: 0,
        declared_total,
    };
    let mut options = PageOptions {
        limit: params.page_size,
        start: None,
    };

    let bar = ProgressBar::new(declared_total);
    loop {
        let page = fetch_page_with_retries(source, dataset_id, &options, params.max_page_retries)
            .with_context(|| format!("Fetching page {} of dataset {}", pages + 1, dataset_id))?;
        pages += 1;

        let page_len = page.features.len() as u64;
        progress.ingested += page_len;
        if page_len > 0 {
            log::info!("{} of {}", progress.ingested, progress.declared_total);
        }
        bar.inc(page_len);
        features.extend(page.features);

        match page.next_page_token {
            Some(token) => options.start = Some(token),
            None => break,
        }
    }
    bar.finish_and_clear();

    if progress.ingested != progress.declared_total {
        log::debug!(
            "Ingested {} features, the dataset declared {}",
            progress.ingested,
            progress.declared_total
        );
    }
    Ok(Ingested {
        features,
        pages,
        progress,
    })
}

fn fetch_page_with_retries(
    source: &dyn FeatureSource,
    dataset_id: &str,
    options: &PageOptions,
    max_retries: usize,
) -> anyhow::Result<Page> {
    let mut attempt = 0;
    loop {
        match source.fetch_page(dataset_id, options) {
            Ok(page) => return Ok(page),
            Err(err) => {
                log::error!("Page request failed: {}", err);
                if attempt >= max_retries {
                    return Err(err.into());
                }
                attempt += 1;
                log::warn!("Retrying page request ({} of {})", attempt, max_retries);
            }
        }
    }
}
