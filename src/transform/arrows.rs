use serde_json::json;

use crate::{
    geofile::feature::{merge_properties, point_feature, FeatureMap},
    geometry::{measure::bearing, GeometryError},
};

pub const ARROW_KEY: &str = "_arrow";
pub const ROTATION_KEY: &str = "_rotation";

/// Which ends of a line get an arrow head, read from the `_arrow` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowPlacement {
    Start,
    End,
    Both,
}

impl ArrowPlacement {
    pub fn from_properties(properties: Option<&FeatureMap>) -> Option<Self> {
        match properties?.get(ARROW_KEY)?.as_str()? {
            "start" => Some(ArrowPlacement::Start),
            "end" => Some(ArrowPlacement::End),
            "both" => Some(ArrowPlacement::Both),
            _ => None,
        }
    }
}

/// Create arrow head points at the ends of a smoothed curve.
///
/// Arrows are oriented along the curve: the start arrow by the bearing of the first segment, the end
/// arrow by the bearing of the last segment. Each arrow carries `properties` plus `_arrow` (`"start"`
/// or `"end"`) and `_rotation` in degrees. The start arrow comes first.
pub fn arrow_heads(
    curve: &geo::LineString,
    properties: Option<&FeatureMap>,
) -> Result<Vec<geojson::Feature>, GeometryError> {
    let placement = match ArrowPlacement::from_properties(properties) {
        Some(placement) => placement,
        None => return Ok(Vec::new()),
    };
    let coords = &curve.0;
    if coords.len() < 2 {
        return Err(GeometryError::TooFewCoordinates {
            expected: 2,
            found: coords.len(),
        });
    }

    let last = coords.len() - 1;
    let start = || arrow_head(coords[0], bearing(coords[0], coords[1]), "start", properties);
    let end = || {
        arrow_head(
            coords[last],
            bearing(coords[last - 1], coords[last]),
            "end",
            properties,
        )
    };
    Ok(match placement {
        ArrowPlacement::Start => vec![start()],
        ArrowPlacement::End => vec![end()],
        ArrowPlacement::Both => vec![start(), end()],
    })
}

fn arrow_head(
    position: geo::Coord,
    rotation: f64,
    role: &str,
    properties: Option<&FeatureMap>,
) -> geojson::Feature {
    let mut synthetic = FeatureMap::new();
    synthetic.insert(ARROW_KEY.to_string(), json!(role));
    synthetic.insert(ROTATION_KEY.to_string(), json!(rotation));
    point_feature(position, merge_properties(properties, synthetic))
}
