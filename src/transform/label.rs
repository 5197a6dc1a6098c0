use serde_json::json;

use crate::{
    geofile::feature::{merge_properties, point_feature, positive_number_property, FeatureMap},
    geometry::{measure::polygon_area, polylabel::pole_of_inaccessibility, GeometryError},
};

use super::TransformParams;

pub const AREA_KEY: &str = "_area";
pub const LABEL_KEY: &str = "_label";
pub const PRECISION_KEY: &str = "precision";

/// Create the label point of a polygon feature, placed at the pole of inaccessibility.
///
/// The label carries the polygon's properties plus `_area` and `_label: true`. The feature's own
/// `precision` property overrides the default search precision.
pub fn label_polygon(
    feature: &geojson::Feature,
    polygon: &geo::Polygon,
    params: &TransformParams,
) -> Result<geojson::Feature, GeometryError> {
    let precision =
        positive_number_property(feature, PRECISION_KEY).unwrap_or(params.default_precision);
    let label_point = pole_of_inaccessibility(polygon, precision)?;
    let area = polygon_area(polygon, params.area_method);

    let mut synthetic = FeatureMap::new();
    synthetic.insert(AREA_KEY.to_string(), json!(area));
    synthetic.insert(LABEL_KEY.to_string(), json!(true));
    Ok(point_feature(
        label_point,
        merge_properties(feature.properties.as_ref(), synthetic),
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    use super::label_polygon;
    use crate::{
        geofile::feature::FeatureGeometry,
        geometry::measure::AreaMethod,
        transform::TransformParams,
    };

    fn polygon_feature(properties: serde_json::Value) -> (geojson::Feature, geo::Polygon) {
        let feature: geojson::Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]
            ]},
            "properties": properties
        }))
        .unwrap();
        match FeatureGeometry::classify(&feature).unwrap() {
            FeatureGeometry::Polygon(polygon) => (feature, polygon),
            other => panic!("Expected a polygon, got {:?}", other),
        }
    }

    fn point_coords(feature: &geojson::Feature) -> Vec<f64> {
        match &feature.geometry.as_ref().unwrap().value {
            geojson::Value::Point(position) => position.clone(),
            other => panic!("Expected a point, got {:?}", other),
        }
    }

    #[test]
    fn test_label_square() {
        let (feature, polygon) = polygon_feature(json!({"name": "field"}));
        let label = label_polygon(&feature, &polygon, &TransformParams::default()).unwrap();

        let coords = point_coords(&label);
        assert_abs_diff_eq!(coords[0], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(coords[1], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(label.property("_area").unwrap().as_f64().unwrap(), 16.0);
        assert_eq!(label.property("_label"), Some(&json!(true)));
        assert_eq!(label.property("name"), Some(&json!("field")));
        assert!(label.id.is_none());
    }

    #[test]
    fn test_synthetic_keys_take_precedence() {
        let (feature, polygon) = polygon_feature(json!({"_label": "custom", "_area": -1}));
        let label = label_polygon(&feature, &polygon, &TransformParams::default()).unwrap();
        assert_eq!(label.property("_label"), Some(&json!(true)));
        assert_abs_diff_eq!(label.property("_area").unwrap().as_f64().unwrap(), 16.0);
    }

    #[test]
    fn test_label_without_properties() {
        let (feature, polygon) = polygon_feature(serde_json::Value::Null);
        let label = label_polygon(&feature, &polygon, &TransformParams::default()).unwrap();
        assert_eq!(label.properties.unwrap().len(), 2);
    }

    #[test]
    fn test_precision_property_is_used() {
        // A coarse precision stops the search early, but the result stays within it.
        let (feature, polygon) = polygon_feature(json!({"precision": 0.5}));
        let label = label_polygon(&feature, &polygon, &TransformParams::default()).unwrap();
        let coords = point_coords(&label);
        assert_abs_diff_eq!(coords[0], 2.0, epsilon = 0.5);
        assert_abs_diff_eq!(coords[1], 2.0, epsilon = 0.5);
        // The tuning property itself is carried over like any other property.
        assert_eq!(label.property("precision"), Some(&json!(0.5)));
    }

    #[test]
    fn test_spherical_area() {
        let (feature, polygon) = polygon_feature(json!({}));
        let params = TransformParams {
            area_method: AreaMethod::Spherical,
            ..TransformParams::default()
        };
        let label = label_polygon(&feature, &polygon, &params).unwrap();
        assert!(label.property("_area").unwrap().as_f64().unwrap() > 1e11);
    }

    #[test]
    fn test_labeling_is_repeatable() {
        let (feature, polygon) = polygon_feature(json!({}));
        let params = TransformParams::default();
        let first = point_coords(&label_polygon(&feature, &polygon, &params).unwrap());
        let second = point_coords(&label_polygon(&feature, &polygon, &params).unwrap());
        assert_abs_diff_eq!(first[0], second[0], epsilon = params.default_precision);
        assert_abs_diff_eq!(first[1], second[1], epsilon = params.default_precision);
    }
}
