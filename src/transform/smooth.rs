use crate::{
    geofile::feature::{line_feature, positive_number_property},
    geometry::{bezier::bezier_spline, GeometryError},
};

use super::TransformParams;

pub const RESOLUTION_KEY: &str = "resolution";
pub const SHARPNESS_KEY: &str = "sharpness";

pub struct SmoothedLine {
    /// The curve as an output feature, carrying the input feature's properties.
    pub feature: geojson::Feature,
    pub curve: geo::LineString,
}

/// Replace a line feature by a bezier curve through its vertices.
///
/// `resolution` and `sharpness` properties of the feature override the defaults in `params`.
pub fn smooth_line(
    feature: &geojson::Feature,
    line: &geo::LineString,
    params: &TransformParams,
) -> Result<SmoothedLine, GeometryError> {
    let resolution =
        positive_number_property(feature, RESOLUTION_KEY).unwrap_or(params.default_resolution);
    let sharpness =
        positive_number_property(feature, SHARPNESS_KEY).unwrap_or(params.default_sharpness);
    let curve = bezier_spline(line, resolution, sharpness)?;
    Ok(SmoothedLine {
        feature: line_feature(&curve, feature.properties.clone()),
        curve,
    })
}
