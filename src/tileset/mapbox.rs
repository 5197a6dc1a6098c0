use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use crate::{
    geofile::geojson::{read_feature_collection_from_file, to_line_delimited},
    mapbox::api::{studio_tileset_url, MapboxApi},
};

use super::publish::{PublishError, PublishEvent, PublishMetadata, Publisher};

const MIN_ZOOM: u8 = 0;
const MAX_ZOOM: u8 = 14;
/// Longest tileset name the Tiling Service accepts.
const MAX_NAME_LENGTH: usize = 64;

/// Publishes through Mapbox Tiling Service: the output collection is uploaded as a tileset source,
/// a tileset named after the dataset is created on top of it and a publish job is started.
pub struct MapboxTilesetPublisher {
    api: MapboxApi,
}

#[derive(Deserialize, Debug)]
struct TilesetSourceResponse {
    id: String,
    file_size: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct PublishJobResponse {
    #[serde(rename = "jobId")]
    job_id: String,
}

#[derive(Serialize, Debug)]
struct CreateTilesetRequest {
    name: String,
    recipe: serde_json::Value,
}

impl MapboxTilesetPublisher {
    pub fn new(api: MapboxApi) -> Self {
        Self { api }
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
        url: String,
    ) -> Result<T, PublishError> {
        let response = request
            .query(&[("access_token", self.api.access_token.as_str())])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Status {
                url,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json()?)
    }

    fn upload_source(
        &self,
        artifact: &Path,
        source_id: &str,
    ) -> Result<TilesetSourceResponse, PublishError> {
        let collection = read_feature_collection_from_file(artifact)?;
        let body = to_line_delimited(&collection)?;
        let form = reqwest::blocking::multipart::Form::new().part(
            "file",
            reqwest::blocking::multipart::Part::text(body).file_name("features.geojson.ld"),
        );
        let url = self.api.url(&format!(
            "tilesets/v1/sources/{}/{}",
            self.api.username, source_id
        ));
        self.send(self.api.client.post(&url).multipart(form), url)
    }

    fn create_tileset(
        &self,
        tileset_id: &str,
        source_id: &str,
        name: &str,
    ) -> Result<serde_json::Value, PublishError> {
        let request = CreateTilesetRequest {
            name: tileset_name(name),
            recipe: tileset_recipe(&self.api.username, source_id),
        };
        let url = self.api.url(&format!("tilesets/v1/{}", tileset_id));
        self.send(self.api.client.post(&url).json(&request), url)
    }

    fn start_publish_job(&self, tileset_id: &str) -> Result<PublishJobResponse, PublishError> {
        let url = self.api.url(&format!("tilesets/v1/{}/publish", tileset_id));
        self.send(self.api.client.post(&url), url)
    }

    fn run_steps(
        &self,
        artifact: &Path,
        destination_id: &str,
        metadata: &PublishMetadata,
        events: &mut Vec<PublishEvent>,
    ) -> Result<String, PublishError> {
        let source_id = source_id_for_destination(destination_id, &self.api.username)?;
        let tileset_id = format!("{}.{}", self.api.username, source_id);

        let size = fs::metadata(artifact).map(|meta| meta.len()).unwrap_or(0);
        events.push(PublishEvent::Progress {
            message: format!("Uploading {} bytes to tileset source {}", size, source_id),
        });
        let source = self.upload_source(artifact, source_id)?;
        log::debug!(
            "Tileset source {} holds {} bytes",
            source.id,
            source.file_size.unwrap_or(0)
        );

        events.push(PublishEvent::Progress {
            message: format!("Creating tileset {} \"{}\"", tileset_id, metadata.name),
        });
        self.create_tileset(&tileset_id, source_id, &metadata.name)?;

        let job = self.start_publish_job(&tileset_id)?;
        events.push(PublishEvent::Progress {
            message: format!("Publish job {} started for {}", job.job_id, tileset_id),
        });
        Ok(studio_tileset_url(&tileset_id))
    }
}

/// Tileset source ids are bare names; a leading `<username>.` is stripped.
fn source_id_for_destination<'a>(
    destination_id: &'a str,
    username: &str,
) -> Result<&'a str, PublishError> {
    let source_id = destination_id
        .strip_prefix(username)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(destination_id);
    let valid = !source_id.is_empty()
        && source_id.len() <= 32
        && source_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(source_id)
    } else {
        Err(PublishError::InvalidDestination(destination_id.to_string()))
    }
}

/// Single-layer recipe named after the source.
fn tileset_recipe(username: &str, source_id: &str) -> serde_json::Value {
    json!({
        "version": 1,
        "layers": {
            source_id: {
                "source": format!("mapbox://tileset-source/{}/{}", username, source_id),
                "minzoom": MIN_ZOOM,
                "maxzoom": MAX_ZOOM
            }
        }
    })
}

fn tileset_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LENGTH).collect()
}

impl Publisher for MapboxTilesetPublisher {
    fn publish<'a>(
        &'a self,
        artifact: &'a Path,
        destination_id: &'a str,
        metadata: &'a PublishMetadata,
    ) -> Box<dyn Iterator<Item = PublishEvent> + 'a> {
        let mut events = Vec::new();
        let terminal = match self.run_steps(artifact, destination_id, metadata, &mut events) {
            Ok(reference) => PublishEvent::Finished { reference },
            Err(err) => PublishEvent::Error(err),
        };
        events.push(terminal);
        Box::new(events.into_iter())
    }
}
