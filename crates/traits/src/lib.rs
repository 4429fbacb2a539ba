pub mod surface;

pub use surface::{
    DiagramSurface, EditorSurface, InMemoryDiagramSurface, InMemoryEditorSurface, SurfaceError,
};
