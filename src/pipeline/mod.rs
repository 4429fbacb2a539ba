//! Export pipeline orchestration.
//!
//! - [`ExportPipelineBuilder`]: fluent builder that validates the
//!   configuration and wires the layout engine, rasterizer and renderer
//! - [`ExportPipeline`]: reads the editor and canvas surfaces and emits the PDF
//! - [`PageComposer`]: flows text onto pages and appends the diagram section
//!
//! # Example
//!
//! ```ignore
//! use folio::{ExportPipelineBuilder, JsonDiagramSurface, JsonEditorSurface};
//!
//! let pipeline = ExportPipelineBuilder::new()
//!     .with_config_file("folio.json")?
//!     .build()?;
//!
//! let pdf = pipeline
//!     .export(&JsonEditorSurface::new("notes.json"), &JsonDiagramSurface::new("flow.excalidraw"))
//!     .await?;
//! pdf.save_to("out")?;
//! ```

mod builder;
pub mod composer;
pub mod config;
mod orchestrator;

pub use builder::ExportPipelineBuilder;
pub use composer::{Composition, DIAGRAM_IMAGE_KEY, PageComposer};
pub use config::{DEFAULT_DIAGRAM_HEADING, DEFAULT_FILE_NAME, ExportConfig};
pub use orchestrator::{ExportPipeline, save_to_dir};
