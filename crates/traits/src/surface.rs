//! Sources of export input.
//!
//! The engine reads the document from an editor surface and the diagram
//! from a drawing surface. Both are asynchronous because the editor has to
//! flush its pending state before it can hand over a snapshot.

use folio_diagram::DiagramScene;
use folio_types::Document;
use std::fmt::Debug;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Surface is not available: {0}")]
    Unavailable(String),

    #[error("Failed to load '{source_name}': {message}")]
    LoadFailed { source_name: String, message: String },

    #[error("Invalid surface content: {0}")]
    InvalidFormat(String),
}

impl From<std::io::Error> for SurfaceError {
    fn from(err: std::io::Error) -> Self {
        SurfaceError::Unavailable(err.to_string())
    }
}

/// The rich-text editor holding the document.
pub trait EditorSurface: Send + Sync + Debug {
    /// Flushes the editor and returns its blocks in order.
    fn save(&self) -> impl Future<Output = Result<Document, SurfaceError>> + Send;
}

/// The drawing canvas holding the diagram.
pub trait DiagramSurface: Send + Sync + Debug {
    /// Current elements, view state and embedded files.
    fn scene(&self) -> impl Future<Output = Result<DiagramScene, SurfaceError>> + Send;
}

/// An editor surface over a document already in memory.
///
/// `None` behaves like an editor that was never mounted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEditorSurface {
    document: Option<Document>,
}

impl InMemoryEditorSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document: Some(document),
        }
    }

    pub fn unavailable() -> Self {
        Self { document: None }
    }
}

impl EditorSurface for InMemoryEditorSurface {
    async fn save(&self) -> Result<Document, SurfaceError> {
        self.document
            .clone()
            .ok_or_else(|| SurfaceError::Unavailable("editor is not mounted".to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDiagramSurface {
    scene: Option<DiagramScene>,
}

impl InMemoryDiagramSurface {
    pub fn new(scene: DiagramScene) -> Self {
        Self { scene: Some(scene) }
    }

    pub fn unavailable() -> Self {
        Self { scene: None }
    }
}

impl DiagramSurface for InMemoryDiagramSurface {
    async fn scene(&self) -> Result<DiagramScene, SurfaceError> {
        self.scene
            .clone()
            .ok_or_else(|| SurfaceError::Unavailable("canvas is not mounted".to_string()))
    }
}
