pub mod directory;
pub mod mapbox;
pub mod publish;
