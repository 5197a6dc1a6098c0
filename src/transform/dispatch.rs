use crate::{geofile::feature::FeatureGeometry, geometry::GeometryError};

use super::{
    arrows::{arrow_heads, ARROW_KEY},
    assemble::OutputCollection,
    label::label_polygon,
    smooth::smooth_line,
    TransformParams,
};

/// Transform all features in order, see [`transform_feature`].
pub fn transform_features(
    features: Vec<geojson::Feature>,
    params: &TransformParams,
) -> OutputCollection {
    let mut output = OutputCollection::with_capacity(features.len());
    for (index, feature) in features.into_iter().enumerate() {
        transform_feature(index, feature, params, &mut output);
    }
    output
}

/// Route one feature to its transform by geometry type and emit the results.
///
/// - no geometry, or a type other than Polygon and LineString: the feature itself
/// - Polygon: its label point, then the polygon
/// - LineString: the smoothed curve, then its arrow heads if the line has an `_arrow` property
///
/// A feature on which a geometric computation fails is emitted unchanged and counted as skipped.
pub fn transform_feature(
    index: usize,
    feature: geojson::Feature,
    params: &TransformParams,
    output: &mut OutputCollection,
) {
    let geometry = match FeatureGeometry::classify(&feature) {
        Ok(geometry) => geometry,
        Err(err) => return skip(index, feature, err, output),
    };

    match geometry {
        FeatureGeometry::NonSpatial | FeatureGeometry::Other => {
            output.summary.passthrough += 1;
            output.emit(feature);
        }
        FeatureGeometry::Polygon(polygon) => match label_polygon(&feature, &polygon, params) {
            Ok(label) => {
                output.summary.labels += 1;
                output.emit(label);
                output.emit(feature);
            }
            Err(err) => skip(index, feature, err, output),
        },
        FeatureGeometry::LineString(line) => {
            let smoothed = match smooth_line(&feature, &line, params) {
                Ok(smoothed) => smoothed,
                Err(err) => return skip(index, feature, err, output),
            };
            let has_arrow_property = feature
                .properties
                .as_ref()
                .map_or(false, |properties| properties.contains_key(ARROW_KEY));
            let arrows = if has_arrow_property {
                match arrow_heads(&smoothed.curve, smoothed.feature.properties.as_ref()) {
                    Ok(arrows) => arrows,
                    Err(err) => return skip(index, feature, err, output),
                }
            } else {
                Vec::new()
            };

            output.summary.smoothed += 1;
            output.summary.arrow_heads += arrows.len();
            output.emit(smoothed.feature);
            output.emit_all(arrows);
        }
    }
}

fn skip(
    index: usize,
    feature: geojson::Feature,
    err: GeometryError,
    output: &mut OutputCollection,
) {
    log::warn!(
        "Passing feature #{} (id {:?}) through unchanged: {}",
        index,
        feature.id,
        err
    );
    output.summary.skipped += 1;
    output.emit(feature);
}
