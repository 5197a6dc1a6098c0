use geojson::{Feature, JsonObject, JsonValue};

use crate::geometry::GeometryError;

/// Property bag of a feature. Keys are unique, values are arbitrary JSON.
pub type FeatureMap = JsonObject;

/// Geometry of an input feature, converted to `geo` types where a transform needs it.
#[derive(Debug, PartialEq)]
pub enum FeatureGeometry {
    /// The feature has no geometry at all.
    NonSpatial,
    Polygon(geo::Polygon),
    LineString(geo::LineString),
    /// Any geometry type which is passed through untouched.
    Other,
}

impl FeatureGeometry {
    /// Classify a feature by its geometry type. Only polygons and lines are converted, so malformed
    /// positions in other geometry types never cause an error.
    pub fn classify(feature: &Feature) -> Result<Self, GeometryError> {
        let geometry = match &feature.geometry {
            Some(geometry) => geometry,
            None => return Ok(FeatureGeometry::NonSpatial),
        };
        match &geometry.value {
            geojson::Value::Polygon(rings) => {
                Ok(FeatureGeometry::Polygon(polygon_from_rings(rings)?))
            }
            geojson::Value::LineString(positions) => Ok(FeatureGeometry::LineString(
                line_string_from_positions(positions)?,
            )),
            _ => Ok(FeatureGeometry::Other),
        }
    }
}

fn coord_from_position(position: &geojson::Position) -> Result<geo::Coord, GeometryError> {
    match position.as_slice() {
        [x, y, ..] => Ok(geo::coord! { x: *x, y: *y }),
        _ => Err(GeometryError::ShortPosition(position.len())),
    }
}

fn line_string_from_positions(
    positions: &[geojson::Position],
) -> Result<geo::LineString, GeometryError> {
    positions
        .iter()
        .map(coord_from_position)
        .collect::<Result<Vec<_>, _>>()
        .map(geo::LineString::new)
}

fn polygon_from_rings(rings: &[Vec<geojson::Position>]) -> Result<geo::Polygon, GeometryError> {
    let (exterior, interiors) = rings.split_first().ok_or(GeometryError::Empty)?;
    let interiors = interiors
        .iter()
        .map(|ring| line_string_from_positions(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(geo::Polygon::new(
        line_string_from_positions(exterior)?,
        interiors,
    ))
}

/// Overlay `synthetic` onto a copy of `base`. Synthetic values win on key collisions.
pub fn merge_properties(base: Option<&FeatureMap>, synthetic: FeatureMap) -> FeatureMap {
    let mut merged = base.cloned().unwrap_or_default();
    for (key, value) in synthetic {
        merged.insert(key, value);
    }
    merged
}

/// Read a strictly positive, finite numeric property. Anything else counts as absent.
pub fn positive_number_property(feature: &Feature, key: &str) -> Option<f64> {
    feature
        .property(key)
        .and_then(JsonValue::as_f64)
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Create a Point feature without an id.
pub fn point_feature(coord: geo::Coord, properties: FeatureMap) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
            coord.x, coord.y,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Create a LineString feature without an id.
pub fn line_feature(line: &geo::LineString, properties: Option<FeatureMap>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(line))),
        id: None,
        properties,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use geojson::{Feature, JsonValue};
    use rstest::rstest;
    use serde_json::json;

    use super::{
        line_feature, merge_properties, point_feature, positive_number_property, FeatureGeometry,
        FeatureMap,
    };
    use crate::geometry::GeometryError;

    fn feature_from_json(value: JsonValue) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    fn map(value: JsonValue) -> FeatureMap {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_classify_non_spatial() {
        let feature = feature_from_json(json!({
            "type": "Feature", "geometry": null, "properties": {"name": "x"}
        }));
        assert_eq!(
            FeatureGeometry::classify(&feature).unwrap(),
            FeatureGeometry::NonSpatial
        );
    }

    #[test]
    fn test_classify_polygon_with_hole() {
        let feature = feature_from_json(json!({
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]
            ]},
            "properties": {}
        }));
        match FeatureGeometry::classify(&feature).unwrap() {
            FeatureGeometry::Polygon(polygon) => {
                assert_eq!(polygon.exterior().0.len(), 5);
                assert_eq!(polygon.interiors().len(), 1);
            }
            other => panic!("Expected a polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_line_ignores_altitude() {
        let feature = feature_from_json(json!({
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[0.0, 1.0, 100.0], [2.0, 3.0, 50.0]]},
            "properties": null
        }));
        assert_eq!(
            FeatureGeometry::classify(&feature).unwrap(),
            FeatureGeometry::LineString(vec![(0.0, 1.0), (2.0, 3.0)].into())
        );
    }

    #[rstest]
    #[case(json!({"type": "Point", "coordinates": [1.0, 2.0]}))]
    #[case(json!({"type": "MultiLineString", "coordinates": [[[1.0, 2.0], [3.0, 4.0]]]}))]
    #[case(json!({"type": "MultiPolygon", "coordinates": []}))]
    fn test_classify_other(#[case] geometry: JsonValue) {
        let feature = feature_from_json(json!({
            "type": "Feature", "geometry": geometry, "properties": {}
        }));
        assert_eq!(
            FeatureGeometry::classify(&feature).unwrap(),
            FeatureGeometry::Other
        );
    }

    #[test]
    fn test_classify_short_position_is_an_error() {
        // The GeoJSON parser rejects such positions, so the feature is built by hand.
        let feature = Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::LineString(vec![
                vec![0.0, 1.0],
                vec![2.0],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(
            FeatureGeometry::classify(&feature),
            Err(GeometryError::ShortPosition(1))
        );
    }

    #[test]
    fn test_classify_polygon_without_rings_is_an_error() {
        let feature = feature_from_json(json!({
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": []},
            "properties": {}
        }));
        assert_eq!(
            FeatureGeometry::classify(&feature),
            Err(GeometryError::Empty)
        );
    }

    #[test]
    fn test_merge_synthetic_wins() {
        let base = map(json!({"name": "lake", "_label": "no", "depth": 3}));
        let merged = merge_properties(Some(&base), map(json!({"_label": true, "_area": 16.0})));
        assert_eq!(
            JsonValue::Object(merged),
            json!({"name": "lake", "_label": true, "depth": 3, "_area": 16.0})
        );
        // The base is left untouched.
        assert_eq!(base.get("_label"), Some(&json!("no")));
    }

    #[test]
    fn test_merge_without_base() {
        let merged = merge_properties(None, map(json!({"_arrow": "end"})));
        assert_eq!(JsonValue::Object(merged), json!({"_arrow": "end"}));
    }

    #[rstest]
    #[case(json!({"precision": 0.5}), Some(0.5))]
    #[case(json!({"precision": 2}), Some(2.0))]
    #[case(json!({"precision": 0}), None)]
    #[case(json!({"precision": -1.0}), None)]
    #[case(json!({"precision": "0.5"}), None)]
    #[case(json!({"precision": null}), None)]
    #[case(json!({}), None)]
    fn test_positive_number_property(#[case] properties: JsonValue, #[case] expected: Option<f64>) {
        let feature = feature_from_json(json!({
            "type": "Feature", "geometry": null, "properties": properties
        }));
        assert_eq!(positive_number_property(&feature, "precision"), expected);
    }

    #[test]
    fn test_point_and_line_features() {
        let point = point_feature(geo::coord! { x: 1.0, y: 2.0 }, map(json!({"a": 1})));
        assert_eq!(
            serde_json::to_value(&point).unwrap(),
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                "properties": {"a": 1}
            })
        );

        let line = line_feature(&vec![(0.0, 0.0), (1.0, 1.0)].into(), None);
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!({
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
                "properties": null
            })
        );
    }
}
