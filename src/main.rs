extern crate log;
pub mod config;
pub mod dataset;
pub mod geofile;
pub mod geometry;
pub mod mapbox;
pub mod pipeline;
pub mod tileset;
pub mod transform;
use crate::config::{Config, PublisherConfig, SourceConfig};
use crate::dataset::{
    file_source::GeojsonFileSource, mapbox::MapboxDatasetSource, source::FeatureSource,
};
use crate::mapbox::api::{MapboxApi, ACCESS_TOKEN_ENV_VAR};
use crate::pipeline::{generate_destination_id, RunRequest};
use crate::tileset::{
    directory::DirectoryPublisher, mapbox::MapboxTilesetPublisher, publish::Publisher,
};
use anyhow::anyhow;
use clap::Parser;
use std::path::PathBuf;

/// Convert a dataset into a tileset: polygons get label points, lines are smoothed and may get
/// arrow heads.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Id of the source dataset.
    dataset_id: String,

    /// Id of the destination tileset. Defaults to `<username>.<random suffix>`.
    tileset_id: Option<String>,

    /// Path to a YAML config file.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,

    /// Account name. Looked up from the access token when omitted.
    #[arg(short, long)]
    username: Option<String>,

    /// Read features from this GeoJSON file instead of the configured source.
    #[arg(long)]
    source_file: Option<PathBuf>,

    /// Publish into this directory instead of the configured publisher.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Mapbox access token.
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

/// Remembers the resolved username so the token is looked up at most once.
struct MapboxConnector {
    access_token: Option<String>,
    username: Option<String>,
}

impl MapboxConnector {
    fn connect(&mut self, api_base: &str) -> anyhow::Result<MapboxApi> {
        let access_token = self
            .access_token
            .as_deref()
            .ok_or_else(|| anyhow!("{} must be set to use the Mapbox API", ACCESS_TOKEN_ENV_VAR))?;
        let api = MapboxApi::new(api_base, access_token, self.username.as_deref())?;
        self.username = Some(api.username.clone());
        Ok(api)
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config_filepath {
        Some(config_filepath) => Config::load(config_filepath)?,
        None => Config::default(),
    };
    if let Some(filepath) = args.source_file {
        config.source = SourceConfig::Geofile { filepath };
    }
    if let Some(path) = args.output_dir {
        config.publisher = PublisherConfig::Directory { path };
    }

    let mut connector = MapboxConnector {
        access_token: args.access_token,
        username: args.username,
    };
    let source: Box<dyn FeatureSource> = match &config.source {
        SourceConfig::Geofile { filepath } => Box::new(GeojsonFileSource::open(filepath)?),
        SourceConfig::Mapbox { api_base } => {
            Box::new(MapboxDatasetSource::new(connector.connect(api_base)?))
        }
    };
    let publisher: Box<dyn Publisher> = match &config.publisher {
        PublisherConfig::Directory { path } => Box::new(DirectoryPublisher::new(path.clone())),
        PublisherConfig::Mapbox { api_base } => {
            Box::new(MapboxTilesetPublisher::new(connector.connect(api_base)?))
        }
    };

    let destination_id = match args.tileset_id {
        Some(tileset_id) => tileset_id,
        None => generate_destination_id(connector.username.as_deref().unwrap_or("local")),
    };
    let request = RunRequest {
        dataset_id: args.dataset_id,
        destination_id,
    };
    let report = pipeline::run(source.as_ref(), publisher.as_ref(), &request, &config)?;
    log::info!(
        "Converted {} input features into {} output features",
        report.ingested_features,
        report.output_features
    );
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = try_main(args) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
