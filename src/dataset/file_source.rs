use std::path::Path;

use crate::geofile::geojson::read_feature_collection_from_file;

use super::source::{DatasetInfo, FeatureSource, Page, PageOptions, SourceError};

/// Serves the features of a local GeoJSON file in pages, standing in for a remote dataset.
///
/// The dataset id passed to the trait methods is ignored. Page tokens are feature offsets.
pub struct GeojsonFileSource {
    name: String,
    features: Vec<geojson::Feature>,
}

impl GeojsonFileSource {
    pub fn open(filepath: &Path) -> anyhow::Result<Self> {
        let collection = read_feature_collection_from_file(filepath)?;
        let name = filepath
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| filepath.display().to_string());
        log::debug!(
            "Loaded {} features from {:?}",
            collection.features.len(),
            filepath
        );
        Ok(Self {
            name,
            features: collection.features,
        })
    }
}

impl FeatureSource for GeojsonFileSource {
    fn describe(&self, _dataset_id: &str) -> Result<DatasetInfo, SourceError> {
        Ok(DatasetInfo {
            name: self.name.clone(),
            owner: "local".to_string(),
            declared_feature_count: self.features.len() as u64,
        })
    }

    fn fetch_page(&self, _dataset_id: &str, options: &PageOptions) -> Result<Page, SourceError> {
        let offset = match &options.start {
            Some(token) => token
                .parse::<usize>()
                .ok()
                .filter(|offset| *offset <= self.features.len())
                .ok_or_else(|| SourceError::InvalidPageToken(token.clone()))?,
            None => 0,
        };
        let end = offset
            .saturating_add(options.limit.max(1))
            .min(self.features.len());
        let next_page_token = if end < self.features.len() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(Page {
            features: self.features[offset..end].to_vec(),
            next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use testdir::testdir;

    use super::GeojsonFileSource;
    use crate::dataset::{
        ingest::{ingest_features, IngestParams},
        source::{FeatureSource, PageOptions, SourceError},
    };

    fn write_points(count: usize, filepath: &std::path::Path) {
        let features: Vec<String> = (0..count)
            .map(|index| {
                format!(
                    r#"{{"type": "Feature", "geometry": {{"type": "Point", "coordinates": [{}, 0]}}, "properties": {{"index": {}}}}}"#,
                    index, index
                )
            })
            .collect();
        fs::write(
            filepath,
            format!(
                r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
                features.join(",")
            ),
        )
        .unwrap();
    }

    #[rstest]
    #[case(0, 100, 1)]
    #[case(5, 100, 1)]
    #[case(250, 100, 3)]
    #[case(200, 100, 2)]
    #[case(7, 1, 7)]
    fn test_file_source_pages(
        #[case] feature_count: usize,
        #[case] page_size: usize,
        #[case] expected_pages: usize,
    ) {
        let test_dir = testdir!();
        let filepath = test_dir.join("points.geojson");
        write_points(feature_count, &filepath);

        let source = GeojsonFileSource::open(&filepath).unwrap();
        let info = source.describe("ignored").unwrap();
        assert_eq!(info.name, "points");
        assert_eq!(info.declared_feature_count, feature_count as u64);

        let params = IngestParams {
            page_size,
            ..IngestParams::default()
        };
        let ingested =
            ingest_features(&source, "ignored", info.declared_feature_count, &params).unwrap();
        assert_eq!(ingested.pages, expected_pages);
        let indices: Vec<u64> = ingested
            .features
            .iter()
            .map(|feature| feature.property("index").unwrap().as_u64().unwrap())
            .collect();
        assert_eq!(indices, (0..feature_count as u64).collect::<Vec<u64>>());
    }

    #[test]
    fn test_invalid_token() {
        let test_dir = testdir!();
        let filepath = test_dir.join("points.geojson");
        write_points(3, &filepath);
        let source = GeojsonFileSource::open(&filepath).unwrap();

        for token in ["abc", "4"] {
            let result = source.fetch_page(
                "ignored",
                &PageOptions {
                    limit: 10,
                    start: Some(token.to_string()),
                },
            );
            assert!(matches!(result, Err(SourceError::InvalidPageToken(_))));
        }
    }

    #[test]
    fn test_huge_limit_from_offset() {
        let test_dir = testdir!();
        let filepath = test_dir.join("points.geojson");
        write_points(3, &filepath);
        let source = GeojsonFileSource::open(&filepath).unwrap();

        let page = source
            .fetch_page(
                "ignored",
                &PageOptions {
                    limit: usize::MAX,
                    start: Some("1".to_string()),
                },
            )
            .unwrap();
        assert_eq!(page.features.len(), 2);
        assert_eq!(page.next_page_token, None);
    }
}
