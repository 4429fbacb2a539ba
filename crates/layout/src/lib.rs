use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
    #[error("Image has no area ({0}x{1} px) and cannot be placed.")]
    EmptyImage(f32, f32),
}

pub mod algorithms;
pub mod elements;
pub mod engine;
pub mod fonts;
pub mod markup;
pub mod normalize;
pub mod text;

pub use self::elements::{
    ImageElement, LayoutElement, LineSink, Page, PageSet, PositionedElement, TextElement,
};
pub use self::engine::{LayoutEngine, PageState, Placement};
pub use self::fonts::{FontMetrics, FontVariant, StandardFontMetrics, encode_win_ansi};
pub use self::markup::parse_inline_markup;
pub use self::normalize::{LayoutUnit, normalize};

pub use folio_types::{PageGeometry, Size};

#[cfg(test)]
mod test_utils;
