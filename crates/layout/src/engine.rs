use crate::LayoutError;
use crate::algorithms::pagination::check_fit;
use crate::elements::{ImageElement, LayoutElement, LineSink, PositionedElement, TextElement};
use crate::fonts::{FontMetrics, FontVariant, StandardFontMetrics};
use crate::normalize::{LayoutUnit, normalize};
use crate::text::wrap_text;
use folio_types::{Block, PageGeometry, RunStyle, Size};
use log::debug;
use std::sync::Arc;

/// The write position of an export in progress.
///
/// `cursor_y` only grows within a page and returns to the top margin when a
/// page is allocated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageState {
    pub page_index: usize,
    pub cursor_y: f32,
}

impl PageState {
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            page_index: 0,
            cursor_y: geometry.margin,
        }
    }
}

/// Resolved position and size of an image, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Measures, wraps and paginates layout units.
///
/// The engine itself is immutable; all per-export state lives in the
/// [`PageState`] and the [`LineSink`] passed to each call.
#[derive(Clone)]
pub struct LayoutEngine {
    geometry: PageGeometry,
    metrics: Arc<dyn FontMetrics>,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Result<Self, LayoutError> {
        Self::with_metrics(geometry, Arc::new(StandardFontMetrics))
    }

    pub fn with_metrics(
        geometry: PageGeometry,
        metrics: Arc<dyn FontMetrics>,
    ) -> Result<Self, LayoutError> {
        geometry.validate().map_err(LayoutError::InvalidGeometry)?;
        Ok(Self { geometry, metrics })
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    /// Normalizes and lays out every block, in order.
    pub fn layout_blocks<S: LineSink>(&self, blocks: &[Block], page: &mut PageState, sink: &mut S) {
        for block in blocks {
            self.layout(&normalize(block), page, sink);
        }
    }

    pub fn layout<S: LineSink>(&self, units: &[LayoutUnit], page: &mut PageState, sink: &mut S) {
        for unit in units {
            match unit {
                LayoutUnit::Header { text } => self.write_header(text, page, sink),
                LayoutUnit::Run { text, style } => self.write_run(text, *style, page, sink),
            }
        }
    }

    /// Writes a single centred bold line at the header size. Headers never wrap.
    pub fn write_header<S: LineSink>(&self, text: &str, page: &mut PageState, sink: &mut S) {
        let size = self.geometry.header_font_size;
        let width = self.metrics.text_width(text, FontVariant::Bold, size);
        let x = (self.geometry.page_width - width) / 2.0;
        self.ensure_room(self.geometry.line_height, page, sink);
        self.write_line(text, x, width, FontVariant::Bold, size, page, sink);
    }

    fn write_run<S: LineSink>(&self, text: &str, style: RunStyle, page: &mut PageState, sink: &mut S) {
        let variant = FontVariant::for_style(style);
        let size = self.geometry.body_font_size;
        let lines = wrap_text(
            text,
            self.geometry.content_width(),
            self.metrics.as_ref(),
            variant,
            size,
        );
        for line in lines {
            self.ensure_room(self.geometry.line_height, page, sink);
            self.write_line(&line.text, self.geometry.margin, line.width, variant, size, page, sink);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write_line<S: LineSink>(
        &self,
        text: &str,
        x: f32,
        width: f32,
        font: FontVariant,
        font_size: f32,
        page: &mut PageState,
        sink: &mut S,
    ) {
        sink.push(PositionedElement {
            x,
            y: page.cursor_y,
            width,
            height: self.geometry.line_height,
            element: LayoutElement::Text(TextElement {
                content: text.to_string(),
                font,
                font_size,
            }),
        });
        page.cursor_y += self.geometry.line_height;
    }

    /// Places an image of `size_px` at full content width, preserving its
    /// aspect ratio.
    ///
    /// The image moves to a new page when it does not fit below the cursor,
    /// and is scaled down uniformly when it is taller than the content area.
    pub fn place_image<S: LineSink>(
        &self,
        src: &str,
        size_px: Size,
        page: &mut PageState,
        sink: &mut S,
    ) -> Result<Placement, LayoutError> {
        if !(size_px.width > 0.0 && size_px.height > 0.0) {
            return Err(LayoutError::EmptyImage(size_px.width, size_px.height));
        }

        let content_height = self.geometry.content_height();
        let mut width = self.geometry.content_width();
        let mut height = size_px.height * width / size_px.width;

        self.ensure_room(height, page, sink);

        if height > content_height {
            let scale = content_height / height;
            debug!("Scaling image '{src}' by {scale:.4} to fit one page");
            width *= scale;
            height = content_height;
        }

        let placement = Placement {
            page_index: page.page_index,
            x: self.geometry.margin,
            y: page.cursor_y,
            width,
            height,
        };
        sink.push(PositionedElement {
            x: placement.x,
            y: placement.y,
            width,
            height,
            element: LayoutElement::Image(ImageElement {
                src: src.to_string(),
            }),
        });
        page.cursor_y += height;
        Ok(placement)
    }

    /// Allocates a new page when `needed` does not fit below the cursor.
    fn ensure_room<S: LineSink>(&self, needed: f32, page: &mut PageState, sink: &mut S) {
        let at_top = page.cursor_y <= self.geometry.margin;
        let analysis = check_fit(page.cursor_y, needed, self.geometry.content_height(), at_top);
        if analysis.should_break {
            debug!(
                "Page break after page {} ({:.2}mm left, {:.2}mm needed)",
                page.page_index, analysis.remaining_height, needed
            );
            self.break_page(page, sink);
        }
    }

    pub fn break_page<S: LineSink>(&self, page: &mut PageState, sink: &mut S) {
        page.page_index += 1;
        page.cursor_y = self.geometry.margin;
        sink.start_page(page.page_index);
    }
}
