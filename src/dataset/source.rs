use serde::Deserialize;
use thiserror::Error;

/// Metadata of a source dataset.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub name: String,
    pub owner: String,
    /// Feature count as declared by the source. Only used for progress display.
    pub declared_feature_count: u64,
}

/// Options of a single page request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub limit: usize,
    /// Continuation token returned with the previous page, `None` for the first page.
    pub start: Option<String>,
}

/// One page of features. The last page has no `next_page_token`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub features: Vec<geojson::Feature>,
    pub next_page_token: Option<String>,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("invalid page token {0:?}")]
    InvalidPageToken(String),
}

/// Paginated store of features, e.g. a remote dataset.
pub trait FeatureSource {
    fn describe(&self, dataset_id: &str) -> Result<DatasetInfo, SourceError>;

    fn fetch_page(&self, dataset_id: &str, options: &PageOptions) -> Result<Page, SourceError>;
}
