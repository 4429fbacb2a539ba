use crate::DiagramError;
use crate::scene::DiagramScene;
use crate::vector::{SvgExportOptions, export_to_svg};
use folio_types::RasterImage;
use log::{debug, info};
use resvg::tiny_skia;
use resvg::usvg;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RasterConfig {
    /// Device pixels per scene unit.
    pub pixel_ratio: f32,
    pub timeout_ms: u64,
    /// Paint the view background instead of leaving it transparent.
    pub background: bool,
    pub padding: f32,
    pub load_system_fonts: bool,
    /// Largest allowed width or height of the raster, in pixels.
    pub max_dimension: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            timeout_ms: 10_000,
            background: false,
            padding: 10.0,
            load_system_fonts: true,
            max_dimension: 16_384,
        }
    }
}

impl RasterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(format!("pixel ratio must be positive, got {}", self.pixel_ratio));
        }
        if self.timeout_ms == 0 {
            return Err("timeout must be at least 1 ms".to_string());
        }
        if self.padding < 0.0 {
            return Err(format!("padding must not be negative, got {}", self.padding));
        }
        if self.max_dimension == 0 {
            return Err("max dimension must be at least 1 px".to_string());
        }
        Ok(())
    }
}

/// Turns a diagram scene into a bitmap.
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        scene: &DiagramScene,
    ) -> impl Future<Output = Result<RasterImage, DiagramError>> + Send;
}

/// Exports the scene to SVG and renders it with resvg on the blocking pool.
#[derive(Clone)]
pub struct SvgRasterizer {
    config: RasterConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("config", &self.config)
            .field("fonts", &self.fontdb.len())
            .finish()
    }
}

impl SvgRasterizer {
    pub fn new(config: RasterConfig) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        if config.load_system_fonts {
            let start = Instant::now();
            fontdb.load_system_fonts();
            debug!(
                "Loaded {} system font faces in {:?}",
                fontdb.len(),
                start.elapsed()
            );
        }
        Self {
            config,
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }
}

impl Rasterizer for SvgRasterizer {
    async fn rasterize(&self, scene: &DiagramScene) -> Result<RasterImage, DiagramError> {
        let svg = export_to_svg(
            scene,
            &SvgExportOptions {
                background: self.config.background,
                padding: self.config.padding,
            },
        );

        let fontdb = Arc::clone(&self.fontdb);
        let ratio = self.config.pixel_ratio;
        let max_dimension = self.config.max_dimension;
        let timeout_ms = self.config.timeout_ms;

        let start = Instant::now();
        let task = tokio::task::spawn_blocking(move || render_svg(&svg, ratio, fontdb, max_dimension));
        // A blocking task cannot be aborted; on timeout the render runs to
        // completion in the background and its result is dropped.
        let image = match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
            Err(_) => return Err(DiagramError::Timeout(timeout_ms)),
            Ok(Err(join)) => return Err(DiagramError::Task(join.to_string())),
            Ok(Ok(result)) => result?,
        };

        info!(
            "Rasterized diagram to {}x{} px in {:?}",
            image.width_px,
            image.height_px,
            start.elapsed()
        );
        Ok(image)
    }
}

/// Parses and renders an SVG document into straight-alpha RGBA pixels.
pub fn render_svg(
    svg: &str,
    pixel_ratio: f32,
    fontdb: Arc<usvg::fontdb::Database>,
    max_dimension: u32,
) -> Result<RasterImage, DiagramError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = fontdb;

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| DiagramError::Svg(e.to_string()))?;
    let size = tree.size();
    let width = (size.width() * pixel_ratio).ceil() as u32;
    let height = (size.height() * pixel_ratio).ceil() as u32;
    if width > max_dimension || height > max_dimension {
        return Err(DiagramError::TooLarge {
            width,
            height,
            limit: max_dimension,
        });
    }

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(DiagramError::Allocation(width, height))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(pixel_ratio, pixel_ratio),
        &mut pixmap.as_mut(),
    );

    let pixels: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RasterImage::from_rgba(width, height, pixels).ok_or(DiagramError::Allocation(width, height))
}
