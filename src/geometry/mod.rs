pub mod bezier;
pub mod measure;
pub mod polylabel;

use thiserror::Error;

/// Failures of the geometric primitives on malformed input.
#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    #[error("geometry has no coordinates")]
    Empty,

    #[error("expected at least {expected} coordinates, found {found}")]
    TooFewCoordinates { expected: usize, found: usize },

    #[error("position has {0} ordinates, at least 2 are required")]
    ShortPosition(usize),

    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
