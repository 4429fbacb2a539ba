//! Adapters from saved editor and canvas JSON to the export model.
//!
//! The editor saves a block list (`{"time": .., "blocks": [..], "version": ..}`)
//! where each block carries a `type` and a free-form `data` object. The
//! canvas saves an Excalidraw scene.

use folio_diagram::DiagramScene;
use folio_layout::parse_inline_markup;
use folio_traits::{DiagramSurface, EditorSurface, SurfaceError};
use folio_types::{Block, Document};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The editor's saved output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorOutput {
    #[serde(default)]
    pub time: Option<u64>,
    #[serde(default)]
    pub blocks: Vec<EditorBlock>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorBlock {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl EditorBlock {
    fn text(&self) -> String {
        self.data
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Maps the block onto the export model. Paragraph text is markup;
    /// header and list text is taken as-is.
    pub fn to_block(&self) -> Block {
        match self.kind.as_str() {
            "paragraph" => Block::Paragraph {
                runs: parse_inline_markup(&self.text()),
            },
            "header" => Block::Header { text: self.text() },
            "list" => {
                let mut items = Vec::new();
                if let Some(list) = self.data.get("items").and_then(Value::as_array) {
                    flatten_items(list, &mut items);
                }
                Block::ListBlock { items }
            }
            _ => Block::Unknown { text: self.text() },
        }
    }
}

/// List items are either plain strings or nested `{content, items}` objects.
/// Nested items follow their parent, depth first.
fn flatten_items(list: &[Value], out: &mut Vec<String>) {
    for item in list {
        match item {
            Value::String(s) => out.push(s.clone()),
            Value::Object(obj) => {
                if let Some(content) = obj.get("content").and_then(Value::as_str) {
                    out.push(content.to_string());
                }
                if let Some(children) = obj.get("items").and_then(Value::as_array) {
                    flatten_items(children, out);
                }
            }
            _ => {}
        }
    }
}

impl From<&EditorOutput> for Document {
    fn from(output: &EditorOutput) -> Self {
        output.blocks.iter().map(EditorBlock::to_block).collect()
    }
}

pub fn parse_editor_output(json: &str) -> Result<Document, serde_json::Error> {
    let output: EditorOutput = serde_json::from_str(json)?;
    Ok(Document::from(&output))
}

async fn read_source(path: &Path) -> Result<String, SurfaceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SurfaceError::Unavailable(format!("{}: {}", path.display(), e)))
}

fn invalid(path: &Path, err: serde_json::Error) -> SurfaceError {
    SurfaceError::LoadFailed {
        source_name: path.display().to_string(),
        message: err.to_string(),
    }
}

/// An editor surface backed by a saved JSON file.
#[derive(Debug, Clone)]
pub struct JsonEditorSurface {
    path: PathBuf,
}

impl JsonEditorSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EditorSurface for JsonEditorSurface {
    async fn save(&self) -> Result<Document, SurfaceError> {
        let source = read_source(&self.path).await?;
        parse_editor_output(&source).map_err(|e| invalid(&self.path, e))
    }
}

/// A canvas surface backed by a saved Excalidraw file.
#[derive(Debug, Clone)]
pub struct JsonDiagramSurface {
    path: PathBuf,
}

impl JsonDiagramSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiagramSurface for JsonDiagramSurface {
    async fn scene(&self) -> Result<DiagramScene, SurfaceError> {
        let source = read_source(&self.path).await?;
        DiagramScene::from_json(&source).map_err(|e| invalid(&self.path, e))
    }
}
