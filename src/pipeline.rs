use rand::{distributions::Alphanumeric, Rng};

use crate::{
    config::Config,
    dataset::{
        ingest::ingest_features,
        source::{DatasetInfo, FeatureSource},
    },
    tileset::publish::{publish_collection, PublishMetadata, Publisher},
    transform::{assemble::TransformSummary, dispatch::transform_features},
};

/// What to convert and where to publish it.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub dataset_id: String,
    pub destination_id: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub dataset: DatasetInfo,
    pub ingested_features: u64,
    pub output_features: usize,
    pub summary: TransformSummary,
    /// Location of the published result as reported by the publisher.
    pub reference: String,
}

/// Ingest all features of a dataset, transform them and publish the output collection.
///
/// The phases run strictly one after the other. A failure to read the dataset metadata is logged
/// and the run continues with the dataset id as name.
pub fn run(
    source: &dyn FeatureSource,
    publisher: &dyn Publisher,
    request: &RunRequest,
    config: &Config,
) -> anyhow::Result<RunReport> {
    let dataset = describe_dataset(source, &request.dataset_id);

    let ingested = ingest_features(
        source,
        &request.dataset_id,
        dataset.declared_feature_count,
        &config.ingest_params(),
    )?;
    log::info!(
        "Read {} features in {} pages",
        ingested.features.len(),
        ingested.pages
    );

    let output = transform_features(ingested.features, &config.transform);
    let summary = output.summary;
    summary.log();
    let output_features = output.len();

    log::info!(
        "Publishing {} features to {}",
        output_features,
        request.destination_id
    );
    let reference = publish_collection(
        &output.into_feature_collection(),
        publisher,
        &request.destination_id,
        &PublishMetadata {
            name: dataset.name.clone(),
        },
    )?;
    log::info!("{}", reference);

    Ok(RunReport {
        dataset,
        ingested_features: ingested.progress.ingested,
        output_features,
        summary,
        reference,
    })
}

fn describe_dataset(source: &dyn FeatureSource, dataset_id: &str) -> DatasetInfo {
    match source.describe(dataset_id) {
        Ok(info) => {
            log::info!(
                "Input Dataset \"{}\" owned by {}, {} features",
                info.name,
                info.owner,
                info.declared_feature_count
            );
            info
        }
        Err(err) => {
            log::error!("Could not read metadata of dataset {}: {}", dataset_id, err);
            DatasetInfo {
                name: dataset_id.to_string(),
                owner: String::new(),
                declared_feature_count: 0,
            }
        }
    }
}

/// Destination id of the form `<username>.<8 lowercase alphanumeric characters>`.
pub fn generate_destination_id(username: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{}.{}", username, suffix)
}
