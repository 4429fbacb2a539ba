//! PDF output for laid-out pages, written with `lopdf`.

use thiserror::Error;

mod content;
mod renderer;
mod writer;

pub use renderer::{EmittedDocument, LopdfRenderer};
pub use writer::StreamingPdfWriter;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Page references image '{0}' which was never added.")]
    MissingImage(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}
