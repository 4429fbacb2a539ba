//! Diagram export: scene model, SVG export and rasterization.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Failed to parse exported SVG: {0}")]
    Svg(String),
    #[error("Diagram raster of {width}x{height} px exceeds the {limit} px limit.")]
    TooLarge { width: u32, height: u32, limit: u32 },
    #[error("Failed to allocate a {0}x{1} px raster.")]
    Allocation(u32, u32),
    #[error("Rasterization timed out after {0} ms.")]
    Timeout(u64),
    #[error("Rasterization task failed: {0}")]
    Task(String),
}

pub mod raster;
pub mod scene;
pub mod vector;

pub use self::raster::{RasterConfig, Rasterizer, SvgRasterizer, render_svg};
pub use self::scene::{AppState, BinaryFile, DiagramScene, ElementKind, SceneElement};
pub use self::vector::{SvgExportOptions, ViewBox, export_to_svg, scene_view_box};
