use folio_diagram::DiagramError;
use folio_layout::LayoutError;
use folio_render_lopdf::RenderError;
use folio_traits::SurfaceError;
use thiserror::Error;

/// Everything that can abort an export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Diagram rasterization failed: {0}")]
    RasterizationFailed(String),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SurfaceError> for ExportError {
    fn from(err: SurfaceError) -> Self {
        ExportError::SourceUnavailable(err.to_string())
    }
}

impl From<DiagramError> for ExportError {
    fn from(err: DiagramError) -> Self {
        ExportError::RasterizationFailed(err.to_string())
    }
}

impl From<LayoutError> for ExportError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::InvalidGeometry(msg) => ExportError::Config(msg),
            LayoutError::EmptyImage(..) => ExportError::RasterizationFailed(err.to_string()),
        }
    }
}
