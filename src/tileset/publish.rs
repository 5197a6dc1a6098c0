use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::geofile::geojson::write_feature_collection;

/// Descriptive metadata handed to the publisher along with the artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishMetadata {
    /// Display name of the published tileset.
    pub name: String,
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("invalid destination id {0:?}")]
    InvalidDestination(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),

    #[error("publisher stopped without reporting completion")]
    Incomplete,
}

/// Event reported by a publisher. `Error` and `Finished` are terminal.
#[derive(Debug)]
pub enum PublishEvent {
    Progress { message: String },
    Error(PublishError),
    /// `reference` locates the published result, e.g. a URL.
    Finished { reference: String },
}

/// Consumer of the serialized output collection.
pub trait Publisher {
    fn publish<'a>(
        &'a self,
        artifact: &'a Path,
        destination_id: &'a str,
        metadata: &'a PublishMetadata,
    ) -> Box<dyn Iterator<Item = PublishEvent> + 'a>;
}

/// Write `collection` to a transient GeoJSON file, hand it to `publisher` and return the reference of
/// the published result.
///
/// The transient file is removed once the publisher reports a terminal event, whether it succeeded
/// or not, and also when writing the file fails.
pub fn publish_collection(
    collection: &geojson::FeatureCollection,
    publisher: &dyn Publisher,
    destination_id: &str,
    metadata: &PublishMetadata,
) -> anyhow::Result<String> {
    let artifact = tempfile::Builder::new()
        .prefix("dataset_to_tileset_")
        .suffix(".geojson")
        .tempfile()
        .context("Creating transient GeoJSON file")?;
    log::debug!("Writing output collection to {:?}", artifact.path());
    write_feature_collection(collection, artifact.as_file())
        .context("Writing transient GeoJSON file")?;

    let outcome = consume_events(publisher.publish(artifact.path(), destination_id, metadata));

    let artifact_path = artifact.path().to_path_buf();
    if let Err(err) = artifact.close() {
        log::error!("Could not remove transient file {:?}: {}", artifact_path, err);
    }
    Ok(outcome?)
}

fn consume_events(
    events: Box<dyn Iterator<Item = PublishEvent> + '_>,
) -> Result<String, PublishError> {
    for event in events {
        match event {
            PublishEvent::Progress { message } => log::info!("{}", message),
            PublishEvent::Error(err) => {
                log::error!("Publishing failed: {}", err);
                return Err(err);
            }
            PublishEvent::Finished { reference } => return Ok(reference),
        }
    }
    Err(PublishError::Incomplete)
}
