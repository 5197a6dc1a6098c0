use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use super::publish::{PublishError, PublishEvent, PublishMetadata, Publisher};

/// Contents of the `<destination_id>.json` file written next to the collection.
#[derive(Serialize, Debug)]
struct TilesetDescription<'a> {
    id: &'a str,
    name: &'a str,
}

/// Publishes into a local directory as `<destination_id>.geojson`, standing in for a tile service.
/// The tileset name goes into `<destination_id>.json`.
pub struct DirectoryPublisher {
    output_dir: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    fn copy_artifact(
        &self,
        artifact: &Path,
        destination_id: &str,
        metadata: &PublishMetadata,
    ) -> Result<PathBuf, PublishError> {
        if destination_id.is_empty()
            || destination_id.contains(|c: char| c == '/' || c == '\\')
            || destination_id.starts_with('.')
        {
            return Err(PublishError::InvalidDestination(destination_id.to_string()));
        }
        fs::create_dir_all(&self.output_dir)?;
        let output_filepath = self.output_dir.join(format!("{}.geojson", destination_id));
        fs::copy(artifact, &output_filepath)?;
        let description = TilesetDescription {
            id: destination_id,
            name: &metadata.name,
        };
        let description_filepath = self.output_dir.join(format!("{}.json", destination_id));
        fs::write(
            description_filepath,
            serde_json::to_string_pretty(&description).map_err(anyhow::Error::from)?,
        )?;
        Ok(output_filepath)
    }
}

impl Publisher for DirectoryPublisher {
    fn publish<'a>(
        &'a self,
        artifact: &'a Path,
        destination_id: &'a str,
        metadata: &'a PublishMetadata,
    ) -> Box<dyn Iterator<Item = PublishEvent> + 'a> {
        let progress = PublishEvent::Progress {
            message: format!(
                "Copying \"{}\" to {:?}",
                metadata.name, self.output_dir
            ),
        };
        let terminal = match self.copy_artifact(artifact, destination_id, metadata) {
            Ok(output_filepath) => PublishEvent::Finished {
                reference: output_filepath.display().to_string(),
            },
            Err(err) => PublishEvent::Error(err),
        };
        Box::new([progress, terminal].into_iter())
    }
}
