//! Exports an editor document and its companion diagram as a paginated PDF.
//!
//! The workspace is split by concern:
//!
//! - `folio-types`: page geometry, the block document model and raster images
//! - `folio-layout`: markup parsing, text measurement, wrapping and pagination
//! - `folio-diagram`: the drawing scene model, SVG export and rasterization
//! - `folio-render-lopdf`: PDF serialization
//! - `folio-traits`: the editor and canvas surfaces an export reads from
//! - `folio-access`: write-access grants on shared files
//!
//! This crate ties them together behind [`ExportPipelineBuilder`].

pub mod editor;
pub mod error;
pub mod pipeline;

pub use editor::{
    EditorBlock, EditorOutput, JsonDiagramSurface, JsonEditorSurface, parse_editor_output,
};
pub use error::ExportError;
pub use pipeline::{ExportConfig, ExportPipeline, ExportPipelineBuilder, PageComposer};

pub use folio_access as access;
pub use folio_diagram as diagram;
pub use folio_layout as layout;
pub use folio_render_lopdf as render;
pub use folio_traits as traits;
pub use folio_types as types;

pub use folio_render_lopdf::EmittedDocument;
pub use folio_traits::{DiagramSurface, EditorSurface, SurfaceError};
pub use folio_types::{Block, Document, PageGeometry, RunStyle, StyledRun};
