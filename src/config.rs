use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::{
    dataset::ingest::{IngestParams, DEFAULT_MAX_PAGE_RETRIES, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    mapbox::api::DEFAULT_API_BASE,
    transform::TransformParams,
};

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum SourceConfig {
    /// Mapbox Datasets API.
    Mapbox {
        #[serde(default = "default_api_base")]
        api_base: String,
    },
    /// Local GeoJSON file.
    Geofile { filepath: PathBuf },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum PublisherConfig {
    /// Mapbox tileset source upload.
    Mapbox {
        #[serde(default = "default_api_base")]
        api_base: String,
    },
    /// Local directory.
    Directory { path: PathBuf },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub publisher: PublisherConfig,
    pub page_size: usize,
    pub max_page_retries: usize,
    pub transform: TransformParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::Mapbox {
                api_base: default_api_base(),
            },
            publisher: PublisherConfig::Mapbox {
                api_base: default_api_base(),
            },
            page_size: DEFAULT_PAGE_SIZE,
            max_page_retries: DEFAULT_MAX_PAGE_RETRIES,
            transform: TransformParams::default(),
        }
    }
}

impl Config {
    pub fn load(filepath: &Path) -> anyhow::Result<Self> {
        if !filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", filepath));
        }
        let config_contents = read_to_string(filepath)?;
        Self::from_yaml(&config_contents)
            .with_context(|| format!("Reading config file {:?}", filepath))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(anyhow!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                self.page_size
            ));
        }
        let transform = &self.transform;
        for (name, value) in [
            ("default_precision", transform.default_precision),
            ("default_resolution", transform.default_resolution),
            ("default_sharpness", transform.default_sharpness),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(anyhow!("{} must be a positive number, got {}", name, value));
            }
        }
        Ok(())
    }

    pub fn ingest_params(&self) -> IngestParams {
        IngestParams {
            page_size: self.page_size,
            max_page_retries: self.max_page_retries,
        }
    }
}
