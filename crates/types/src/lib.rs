pub mod document;
pub mod geometry;
pub mod raster;

pub use document::{Block, Document, RunStyle, StyledRun};
pub use geometry::{MM_TO_PT, PageGeometry, Size};
pub use raster::RasterImage;
