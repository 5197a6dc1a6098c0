pub mod arrows;
pub mod assemble;
pub mod dispatch;
pub mod label;
pub mod smooth;

use serde::Deserialize;

use crate::geometry::{bezier, measure::AreaMethod, polylabel};

/// Fallback values for the per-feature tuning properties.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TransformParams {
    /// Used when a polygon has no positive `precision` property.
    pub default_precision: f64,
    /// Used when a line has no positive `resolution` property.
    pub default_resolution: f64,
    /// Used when a line has no positive `sharpness` property.
    pub default_sharpness: f64,
    pub area_method: AreaMethod,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            default_precision: polylabel::DEFAULT_PRECISION,
            default_resolution: bezier::DEFAULT_RESOLUTION,
            default_sharpness: bezier::DEFAULT_SHARPNESS,
            area_method: AreaMethod::default(),
        }
    }
}
