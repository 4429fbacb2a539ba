use super::composer::PageComposer;
use super::config::ExportConfig;
use super::orchestrator::ExportPipeline;
use crate::error::ExportError;
use folio_diagram::{RasterConfig, Rasterizer, SvgRasterizer};
use folio_layout::{FontMetrics, LayoutEngine, StandardFontMetrics};
use folio_render_lopdf::LopdfRenderer;
use folio_types::PageGeometry;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating an [`ExportPipeline`].
pub struct ExportPipelineBuilder {
    config: ExportConfig,
    metrics: Arc<dyn FontMetrics>,
}

impl Default for ExportPipelineBuilder {
    fn default() -> Self {
        Self {
            config: ExportConfig::default(),
            metrics: Arc::new(StandardFontMetrics),
        }
    }
}

impl ExportPipelineBuilder {
    /// A4 pages, Helvetica metrics and a transparent 1x diagram raster.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the configuration with one loaded from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ExportError> {
        self.config = ExportConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    pub fn with_raster_config(mut self, raster: RasterConfig) -> Self {
        self.config.raster = raster;
        self
    }

    /// Text of the heading written above the diagram.
    pub fn with_diagram_heading(mut self, heading: impl Into<String>) -> Self {
        self.config.diagram_heading = heading.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.config.file_name = file_name.into();
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.config.compress = compress;
        self
    }

    /// Measures text with `metrics` instead of the built-in Helvetica tables.
    pub fn with_font_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builds a pipeline that rasterizes diagrams with resvg.
    pub fn build(self) -> Result<ExportPipeline<SvgRasterizer>, ExportError> {
        self.config.validate()?;
        let rasterizer = SvgRasterizer::new(self.config.raster.clone());
        self.build_with_rasterizer(rasterizer)
    }

    /// Builds a pipeline around a custom rasterizer. The raster section of
    /// the configuration is ignored.
    pub fn build_with_rasterizer<R: Rasterizer>(self, rasterizer: R) -> Result<ExportPipeline<R>, ExportError> {
        self.config.validate()?;
        let engine = LayoutEngine::with_metrics(self.config.geometry, self.metrics)?;
        let composer = PageComposer::new(engine, rasterizer, self.config.diagram_heading.clone());
        let renderer = LopdfRenderer::new().with_compression(self.config.compress);
        log::info!(
            "Built export pipeline ({}x{}mm pages, output '{}')",
            self.config.geometry.page_width,
            self.config.geometry.page_height,
            self.config.file_name
        );
        Ok(ExportPipeline::new(composer, renderer, self.config))
    }
}
