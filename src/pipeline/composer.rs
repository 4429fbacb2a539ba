use crate::error::ExportError;
use folio_diagram::{DiagramScene, Rasterizer};
use folio_layout::{LayoutEngine, PageSet, PageState, Placement};
use folio_types::Document;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Key of the diagram raster in [`PageSet::images`].
pub const DIAGRAM_IMAGE_KEY: &str = "diagram";

/// The result of composing one export.
#[derive(Debug, Clone)]
pub struct Composition {
    pub pages: PageSet,
    /// Where the diagram landed, if one was composed.
    pub diagram: Option<Placement>,
    pub state: PageState,
}

/// Flows the document text onto pages, then appends the diagram section.
#[derive(Debug, Clone)]
pub struct PageComposer<R> {
    engine: LayoutEngine,
    rasterizer: R,
    heading: String,
}

impl<R: Rasterizer> PageComposer<R> {
    pub fn new(engine: LayoutEngine, rasterizer: R, heading: impl Into<String>) -> Self {
        Self {
            engine,
            rasterizer,
            heading: heading.into(),
        }
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Lays out every block, then (when a scene is given) the heading and
    /// the rasterized diagram.
    ///
    /// Text layout is finished before rasterization is awaited, so the
    /// diagram always follows the last line of text.
    pub async fn compose(
        &self,
        document: &Document,
        scene: Option<&DiagramScene>,
    ) -> Result<Composition, ExportError> {
        let geometry = *self.engine.geometry();
        let mut pages = PageSet::new(geometry);
        let mut state = PageState::new(&geometry);

        let start = Instant::now();
        self.engine
            .layout_blocks(&document.blocks, &mut state, &mut pages);
        info!(
            "Laid out {} blocks onto {} pages in {:?}",
            document.len(),
            pages.page_count(),
            start.elapsed()
        );

        let diagram = match scene {
            Some(scene) => Some(self.append_diagram(scene, &mut state, &mut pages).await?),
            None => None,
        };

        Ok(Composition {
            pages,
            diagram,
            state,
        })
    }

    async fn append_diagram(
        &self,
        scene: &DiagramScene,
        state: &mut PageState,
        pages: &mut PageSet,
    ) -> Result<Placement, ExportError> {
        self.engine.write_header(&self.heading, state, pages);

        let image = self.rasterizer.rasterize(scene).await?;
        let placement = self
            .engine
            .place_image(DIAGRAM_IMAGE_KEY, image.size(), state, pages)?;
        debug!(
            "Placed {}x{} px diagram at ({:.2}, {:.2}) size {:.2}x{:.2}mm on page {}",
            image.width_px,
            image.height_px,
            placement.x,
            placement.y,
            placement.width,
            placement.height,
            placement.page_index
        );
        pages.add_image(DIAGRAM_IMAGE_KEY, Arc::new(image));
        Ok(placement)
    }
}
