pub mod file_source;
pub mod ingest;
pub mod mapbox;
pub mod source;
