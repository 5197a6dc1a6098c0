use geo::{Area, Bearing, ChamberlainDuquetteArea};
use serde::Deserialize;

/// How polygon areas are measured.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaMethod {
    /// Shoelace area in squared coordinate units.
    #[default]
    Planar,
    /// Area in square meters on a sphere with the WGS84 equatorial radius.
    Spherical,
}

/// Non-negative area of a polygon, holes excluded. Degenerate polygons have zero area.
pub fn polygon_area(polygon: &geo::Polygon, method: AreaMethod) -> f64 {
    match method {
        AreaMethod::Planar => polygon.unsigned_area(),
        AreaMethod::Spherical => polygon.chamberlain_duquette_unsigned_area(),
    }
}

/// Initial great-circle bearing from `from` to `to` in degrees clockwise from north, in `[0, 360)`.
///
/// Coordinates are longitude/latitude in degrees.
pub fn bearing(from: geo::Coord, to: geo::Coord) -> f64 {
    let bearing = geo::Point::from(from).bearing(geo::Point::from(to));
    let normalized = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
