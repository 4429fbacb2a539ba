use super::composer::{Composition, PageComposer};
use super::config::ExportConfig;
use crate::error::ExportError;
use folio_diagram::{DiagramScene, Rasterizer};
use folio_render_lopdf::{EmittedDocument, LopdfRenderer};
use folio_traits::{DiagramSurface, EditorSurface};
use folio_types::Document;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Reads the surfaces, composes the pages and emits the PDF.
///
/// A pipeline holds no per-export state; one instance can serve any number
/// of concurrent exports.
#[derive(Debug, Clone)]
pub struct ExportPipeline<R> {
    composer: PageComposer<R>,
    renderer: LopdfRenderer,
    config: ExportConfig,
}

impl<R: Rasterizer> ExportPipeline<R> {
    pub(crate) fn new(composer: PageComposer<R>, renderer: LopdfRenderer, config: ExportConfig) -> Self {
        Self {
            composer,
            renderer,
            config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports the editor document followed by the canvas diagram.
    ///
    /// Both surfaces are read before any layout happens; if either is
    /// unavailable the export fails with [`ExportError::SourceUnavailable`].
    pub async fn export<E, D>(&self, editor: &E, canvas: &D) -> Result<EmittedDocument, ExportError>
    where
        E: EditorSurface,
        D: DiagramSurface,
    {
        let sources = async {
            let document = editor.save().await?;
            let scene = canvas.scene().await?;
            Ok::<_, ExportError>((document, scene))
        };
        let (document, scene) = sources
            .await
            .inspect_err(|e| error!("Export aborted: {e}"))?;
        self.export_document(&document, Some(&scene)).await
    }

    /// Exports an already loaded document, with an optional diagram section.
    pub async fn export_document(
        &self,
        document: &Document,
        scene: Option<&DiagramScene>,
    ) -> Result<EmittedDocument, ExportError> {
        let start = Instant::now();
        let result = self.run(document, scene).await;
        match &result {
            Ok(doc) => info!(
                "Exported '{}' ({} bytes) in {:?}",
                doc.file_name,
                doc.len(),
                start.elapsed()
            ),
            Err(e) => error!("Export failed: {e}"),
        }
        result
    }

    /// Composes without emitting.
    pub async fn compose(
        &self,
        document: &Document,
        scene: Option<&DiagramScene>,
    ) -> Result<Composition, ExportError> {
        self.composer.compose(document, scene).await
    }

    async fn run(
        &self,
        document: &Document,
        scene: Option<&DiagramScene>,
    ) -> Result<EmittedDocument, ExportError> {
        let composition = self.composer.compose(document, scene).await?;
        Ok(self
            .renderer
            .emit(&composition.pages, &self.config.file_name)?)
    }
}

/// Writes `doc` into `dir`, creating the directory if needed.
pub async fn save_to_dir(doc: &EmittedDocument, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&doc.file_name);
    tokio::fs::write(&path, &doc.bytes).await?;
    info!("Wrote {}", path.display());
    Ok(path)
}
