use std::{cmp::Ordering, collections::BinaryHeap, f64::consts::SQRT_2};

use geo::{BoundingRect, Centroid};

use super::GeometryError;

pub const DEFAULT_PRECISION: f64 = 0.001;

/// Square cell of the search grid. `max_distance` is the upper bound of the distance to the polygon
/// boundary that any point inside the cell can reach.
#[derive(Debug, Clone, Copy)]
struct Cell {
    center: geo::Coord,
    half_size: f64,
    distance: f64,
    max_distance: f64,
}

impl Cell {
    fn new(center: geo::Coord, half_size: f64, polygon: &geo::Polygon) -> Self {
        let distance = signed_distance_to_polygon(center, polygon);
        Self {
            center,
            half_size,
            distance,
            max_distance: distance + half_size * SQRT_2,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.max_distance.total_cmp(&other.max_distance) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.max_distance.total_cmp(&other.max_distance)
    }
}

/// Find the pole of inaccessibility of a polygon, i.e. the interior point farthest from any ring edge.
///
/// The search subdivides the bounding box into square cells, visiting the most promising cells first,
/// and stops refining a cell once it cannot beat the current best by more than `precision`. Smaller
/// values of `precision` give a more accurate result at the cost of more iterations.
///
/// Self-intersecting polygons are accepted, the result is then only as meaningful as the even-odd
/// interpretation of the rings. A polygon with a zero-width or zero-height bounding box yields the
/// minimum corner of the bounding box.
pub fn pole_of_inaccessibility(
    polygon: &geo::Polygon,
    precision: f64,
) -> Result<geo::Coord, GeometryError> {
    if !precision.is_finite() || precision <= 0.0 {
        return Err(GeometryError::InvalidParameter {
            name: "precision",
            value: precision,
        });
    }
    if polygon.exterior().0.is_empty() {
        return Err(GeometryError::Empty);
    }
    let bbox = polygon.bounding_rect().ok_or(GeometryError::Empty)?;
    let min_side = bbox.width().min(bbox.height());
    if min_side == 0.0 {
        return Ok(bbox.min());
    }

    // Cells never get smaller than the requested precision.
    let cell_size = min_side.max(precision);
    let half_size = cell_size / 2.0;

    let mut queue = BinaryHeap::new();
    let mut x = bbox.min().x;
    while x < bbox.max().x {
        let mut y = bbox.min().y;
        while y < bbox.max().y {
            let center = geo::coord! { x: x + half_size, y: y + half_size };
            queue.push(Cell::new(center, half_size, polygon));
            y += cell_size;
        }
        x += cell_size;
    }

    let mut best = centroid_cell(polygon);
    let bbox_cell = Cell::new(bbox.center(), 0.0, polygon);
    if bbox_cell.distance > best.distance {
        best = bbox_cell;
    }

    while let Some(cell) = queue.pop() {
        if cell.distance > best.distance {
            best = cell;
        }
        if cell.max_distance - best.distance <= precision {
            continue;
        }
        let quarter = cell.half_size / 2.0;
        for (dx, dy) in [
            (-quarter, -quarter),
            (quarter, -quarter),
            (-quarter, quarter),
            (quarter, quarter),
        ] {
            let center = geo::coord! { x: cell.center.x + dx, y: cell.center.y + dy };
            queue.push(Cell::new(center, quarter, polygon));
        }
    }

    log::debug!(
        "Pole of inaccessibility at ({}, {}), distance {}",
        best.center.x,
        best.center.y,
        best.distance
    );
    Ok(best.center)
}

fn centroid_cell(polygon: &geo::Polygon) -> Cell {
    let center = match polygon.centroid() {
        Some(centroid) => centroid.into(),
        None => polygon.exterior().0[0],
    };
    Cell::new(center, 0.0, polygon)
}

/// Distance from `point` to the nearest ring edge, positive inside the polygon and negative outside.
fn signed_distance_to_polygon(point: geo::Coord, polygon: &geo::Polygon) -> f64 {
    let mut inside = false;
    let mut min_distance_squared = f64::INFINITY;

    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        for line in ring.lines() {
            let (a, b) = (line.start, line.end);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            min_distance_squared = min_distance_squared.min(segment_distance_squared(point, a, b));
        }
    }

    if min_distance_squared.is_infinite() {
        return 0.0;
    }
    let distance = min_distance_squared.sqrt();
    if inside {
        distance
    } else {
        -distance
    }
}

fn segment_distance_squared(point: geo::Coord, a: geo::Coord, b: geo::Coord) -> f64 {
    let mut x = a.x;
    let mut y = a.y;
    let dx = b.x - x;
    let dy = b.y - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((point.x - x) * dx + (point.y - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b.x;
            y = b.y;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    let dx = point.x - x;
    let dy = point.y - y;
    dx * dx + dy * dy
}
