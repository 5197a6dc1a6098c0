use serde::Deserialize;

use crate::mapbox::api::{studio_dataset_url, MapboxApi};

use super::source::{DatasetInfo, FeatureSource, Page, PageOptions, SourceError};

/// Source reading features from the Mapbox Datasets API.
pub struct MapboxDatasetSource {
    api: MapboxApi,
}

impl MapboxDatasetSource {
    pub fn new(api: MapboxApi) -> Self {
        Self { api }
    }

    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::blocking::Response, SourceError> {
        let url = self.api.url(path);
        log::debug!("GET {}", url);
        let response = self
            .api
            .client
            .get(&url)
            .query(&[("access_token", self.api.access_token.as_str())])
            .query(query)
            .send()?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[derive(Deserialize, Debug)]
struct DatasetResponse {
    id: String,
    owner: String,
    name: Option<String>,
    features: u64,
}

impl FeatureSource for MapboxDatasetSource {
    fn describe(&self, dataset_id: &str) -> Result<DatasetInfo, SourceError> {
        let path = format!("datasets/v1/{}/{}", self.api.username, dataset_id);
        let dataset: DatasetResponse = self.get(&path, &[])?.json()?;
        log::info!("{}", studio_dataset_url(&dataset.owner, dataset_id));
        Ok(DatasetInfo {
            name: dataset.name.unwrap_or(dataset.id),
            owner: dataset.owner,
            declared_feature_count: dataset.features,
        })
    }

    fn fetch_page(&self, dataset_id: &str, options: &PageOptions) -> Result<Page, SourceError> {
        let path = format!("datasets/v1/{}/{}/features", self.api.username, dataset_id);
        let mut query = vec![("limit", options.limit.to_string())];
        if let Some(start) = &options.start {
            query.push(("start", start.clone()));
        }
        let response = self.get(&path, &query)?;

        let next_page_token = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_start);
        let body = response.text()?;
        match body.parse::<geojson::GeoJson>()? {
            geojson::GeoJson::FeatureCollection(collection) => Ok(Page {
                features: collection.features,
                next_page_token,
            }),
            _ => Err(SourceError::InvalidResponse(
                "expected a FeatureCollection".to_string(),
            )),
        }
    }
}

/// Extract the `start` parameter of the `rel="next"` target of a Link header.
fn next_page_start(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .find(|link| link.contains("rel=\"next\""))
        .and_then(|link| {
            let begin = link.find('<')?;
            let end = link.find('>')?;
            link.get(begin + 1..end)
        })
        .and_then(|target| reqwest::Url::parse(target).ok())
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "start")
                .map(|(_, value)| value.into_owned())
        })
}
