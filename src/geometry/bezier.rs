use super::GeometryError;

pub const DEFAULT_RESOLUTION: f64 = 10000.0;
pub const DEFAULT_SHARPNESS: f64 = 0.85;

/// Time step between two sampled spline positions.
const TIME_STEP: f64 = 10.0;
/// Samples are kept in alternating windows of this many time units.
const SAMPLE_WINDOW: f64 = 100.0;

/// Piecewise cubic bezier spline through the vertices of a line, parametrized by time over
/// `[0, duration]`.
///
/// Each vertex is joined to the next with a cubic segment whose inner control points are pulled
/// towards the neighbouring edge midpoints. `sharpness` weighs the control points between the vertex
/// itself (0) and the midpoint-derived tangent (1).
struct Spline {
    points: Vec<geo::Coord>,
    controls: Vec<(geo::Coord, geo::Coord)>,
    duration: f64,
}

impl Spline {
    fn new(points: Vec<geo::Coord>, duration: f64, sharpness: f64) -> Self {
        let centers: Vec<geo::Coord> = points
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect();

        let mut controls = Vec::with_capacity(points.len());
        controls.push((points[0], points[0]));
        for (index, center_pair) in centers.windows(2).enumerate() {
            let vertex = points[index + 1];
            let offset = vertex - (center_pair[0] + center_pair[1]) / 2.0;
            controls.push((
                vertex * (1.0 - sharpness) + (center_pair[0] + offset) * sharpness,
                vertex * (1.0 - sharpness) + (center_pair[1] + offset) * sharpness,
            ));
        }
        let last = points[points.len() - 1];
        controls.push((last, last));

        Self {
            points,
            controls,
            duration,
        }
    }

    fn position(&self, time: f64) -> geo::Coord {
        let mut time = time.max(0.0);
        if time > self.duration {
            time = self.duration - 1.0;
        }
        let progress = time / self.duration;
        let segment_count = self.points.len() - 1;
        if progress >= 1.0 {
            return self.points[segment_count];
        }
        let scaled = segment_count as f64 * progress;
        let segment = (scaled.floor() as usize).min(segment_count - 1);
        cubic(
            scaled - segment as f64,
            self.points[segment],
            self.controls[segment].1,
            self.controls[segment + 1].0,
            self.points[segment + 1],
        )
    }
}

fn cubic(t: f64, p1: geo::Coord, c1: geo::Coord, c2: geo::Coord, p2: geo::Coord) -> geo::Coord {
    let u = 1.0 - t;
    p2 * (t * t * t) + c2 * (3.0 * t * t * u) + c1 * (3.0 * t * u * u) + p1 * (u * u * u)
}

/// Smooth a line into a bezier curve passing through its vertices.
///
/// `resolution` is the duration of the spline in time units, positions are sampled every 10 units and
/// kept in alternating windows of 100 units, so higher values give denser curves. The returned curve
/// always starts at the first vertex and ends at the last vertex of `line`. `sharpness` is expected in
/// `(0, 1]`; lower values keep the curve closer to the original polyline.
pub fn bezier_spline(
    line: &geo::LineString,
    resolution: f64,
    sharpness: f64,
) -> Result<geo::LineString, GeometryError> {
    if line.0.len() < 2 {
        return Err(GeometryError::TooFewCoordinates {
            expected: 2,
            found: line.0.len(),
        });
    }
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(GeometryError::InvalidParameter {
            name: "resolution",
            value: resolution,
        });
    }
    if !sharpness.is_finite() {
        return Err(GeometryError::InvalidParameter {
            name: "sharpness",
            value: sharpness,
        });
    }

    let spline = Spline::new(line.0.clone(), resolution, sharpness);
    let mut coords = Vec::new();
    let mut time = 0.0;
    while time < spline.duration {
        if (time / SAMPLE_WINDOW).floor() as u64 % 2 == 0 {
            coords.push(spline.position(time));
        }
        time += TIME_STEP;
    }
    coords.push(spline.position(spline.duration));

    Ok(geo::LineString::new(coords))
}
