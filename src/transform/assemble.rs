/// Counters of a single transform pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformSummary {
    /// Polygon label points created.
    pub labels: usize,
    /// Lines replaced by a smoothed curve.
    pub smoothed: usize,
    /// Arrow head points created.
    pub arrow_heads: usize,
    /// Features without geometry or with an untransformed geometry type.
    pub passthrough: usize,
    /// Features passed through unchanged because a geometric computation failed on them.
    pub skipped: usize,
}

impl TransformSummary {
    pub fn log(&self) {
        log::info!("{} labels created", self.labels);
        log::info!("{} lines smoothed", self.smoothed);
        log::info!("{} arrow heads created", self.arrow_heads);
        log::info!("{} features passed through", self.passthrough);
        if self.skipped > 0 {
            log::warn!(
                "{} features could not be transformed and were passed through unchanged",
                self.skipped
            );
        }
    }
}

/// Output features in emission order, together with the pass counters.
#[derive(Debug, Default)]
pub struct OutputCollection {
    features: Vec<geojson::Feature>,
    pub summary: TransformSummary,
}

impl OutputCollection {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            features: Vec::with_capacity(capacity),
            summary: TransformSummary::default(),
        }
    }

    pub fn emit(&mut self, feature: geojson::Feature) {
        self.features.push(feature);
    }

    pub fn emit_all(&mut self, features: impl IntoIterator<Item = geojson::Feature>) {
        self.features.extend(features);
    }

    pub fn features(&self) -> &[geojson::Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_feature_collection(self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        }
    }
}
