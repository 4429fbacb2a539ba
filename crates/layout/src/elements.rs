use crate::fonts::FontVariant;
use folio_types::{PageGeometry, RasterImage};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub font: FontVariant,
    pub font_size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    /// Key into [`PageSet::images`].
    pub src: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Image(ImageElement),
}

/// An element with its resolved position, in millimetres from the top-left
/// page corner. For text, `y` is the baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub index: usize,
    pub elements: Vec<PositionedElement>,
}

/// Receives the output of the layout engine, page by page.
pub trait LineSink {
    /// A new page with the given index begins; later elements belong to it.
    fn start_page(&mut self, index: usize);

    fn push(&mut self, element: PositionedElement);
}

/// The finished pages of one export, plus the raster images they reference.
#[derive(Clone, Debug)]
pub struct PageSet {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub images: BTreeMap<String, Arc<RasterImage>>,
}

impl PageSet {
    /// Starts with a single empty page.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            images: BTreeMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_image(&mut self, key: impl Into<String>, image: Arc<RasterImage>) {
        self.images.insert(key.into(), image);
    }

    /// All text elements in output order, with the index of their page.
    pub fn text_elements(&self) -> impl Iterator<Item = (usize, &PositionedElement, &TextElement)> {
        self.pages.iter().flat_map(|page| {
            page.elements.iter().filter_map(move |el| match &el.element {
                LayoutElement::Text(text) => Some((page.index, el, text)),
                LayoutElement::Image(_) => None,
            })
        })
    }
}

impl LineSink for PageSet {
    fn start_page(&mut self, index: usize) {
        self.pages.push(Page {
            index,
            elements: Vec::new(),
        });
    }

    fn push(&mut self, element: PositionedElement) {
        match self.pages.last_mut() {
            Some(page) => page.elements.push(element),
            None => self.pages.push(Page {
                index: 0,
                elements: vec![element],
            }),
        }
    }
}
