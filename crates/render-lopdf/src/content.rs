use crate::RenderError;
use folio_layout::{
    FontVariant, ImageElement, LayoutElement, PositionedElement, TextElement, encode_win_ansi,
};
use folio_types::MM_TO_PT;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::BTreeMap;

#[derive(Default, Clone, Copy, PartialEq)]
struct TextState {
    font: Option<FontVariant>,
    font_size: f32,
}

/// Builds the content stream of one page.
///
/// Layout coordinates are millimetres from the top-left corner; PDF user
/// space is points from the bottom-left, so every y is flipped here.
pub(crate) struct PageContext<'a> {
    page_height_pt: f32,
    content: Content,
    state: TextState,
    image_names: &'a BTreeMap<String, String>,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(page_height_mm: f32, image_names: &'a BTreeMap<String, String>) -> Self {
        Self {
            page_height_pt: page_height_mm * MM_TO_PT,
            content: Content {
                operations: vec![Operation::new("g", vec![0.into()])],
            },
            state: TextState::default(),
            image_names,
        }
    }

    pub(crate) fn finish(self) -> Content {
        self.content
    }

    pub(crate) fn draw_element(&mut self, el: &PositionedElement) -> Result<(), RenderError> {
        match &el.element {
            LayoutElement::Text(text) => {
                self.draw_text(text, el);
                Ok(())
            }
            LayoutElement::Image(image) => self.draw_image(image, el),
        }
    }

    fn set_font(&mut self, font: FontVariant, font_size: f32) {
        if self.state.font != Some(font) || self.state.font_size != font_size {
            self.content.operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    font_size.into(),
                ],
            ));
            self.state = TextState {
                font: Some(font),
                font_size,
            };
        }
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.is_empty() {
            return;
        }
        self.content.operations.push(Operation::new("BT", vec![]));
        self.set_font(text.font, text.font_size);
        let x = el.x * MM_TO_PT;
        let baseline = self.page_height_pt - el.y * MM_TO_PT;
        self.content
            .operations
            .push(Operation::new("Td", vec![x.into(), baseline.into()]));
        self.content.operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&text.content),
                StringFormat::Literal,
            )],
        ));
        self.content.operations.push(Operation::new("ET", vec![]));
    }

    fn draw_image(&mut self, image: &ImageElement, el: &PositionedElement) -> Result<(), RenderError> {
        let name = self
            .image_names
            .get(&image.src)
            .ok_or_else(|| RenderError::MissingImage(image.src.clone()))?;
        let width = el.width * MM_TO_PT;
        let height = el.height * MM_TO_PT;
        let x = el.x * MM_TO_PT;
        let y = self.page_height_pt - (el.y + el.height) * MM_TO_PT;

        let ops = &mut self.content.operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        ops.push(Operation::new(
            "Do",
            vec![Object::Name(name.as_bytes().to_vec())],
        ));
        ops.push(Operation::new("Q", vec![]));
        Ok(())
    }
}
