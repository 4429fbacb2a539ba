pub mod fixtures;

use folio::diagram::{DiagramError, DiagramScene, RasterConfig, Rasterizer};
use folio::types::RasterImage;
use folio::{EmittedDocument, ExportPipeline, ExportPipelineBuilder};
use lopdf::Document as LopdfDocument;
use lopdf::Object;
use lopdf::content::Content;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around an emitted PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

/// One content stream operation that draws something.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Text(String),
    Image(String),
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn from_emitted(emitted: EmittedDocument) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_bytes(emitted.bytes)
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text and image draws of every page, in page order.
    pub fn drawn(&self) -> Result<Vec<Vec<Drawn>>, Box<dyn std::error::Error>> {
        let mut pages = Vec::new();
        for (_, page_id) in self.doc.get_pages() {
            let dict = self.doc.get_dictionary(page_id)?;
            let content_id = dict.get(b"Contents")?.as_reference()?;
            let stream = self.doc.get_object(content_id)?.as_stream()?;
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let content = Content::decode(&data)?;

            let mut drawn = Vec::new();
            for op in content.operations {
                match (op.operator.as_str(), op.operands.first()) {
                    ("Tj", Some(Object::String(bytes, _))) => {
                        drawn.push(Drawn::Text(decode_win_ansi(bytes)))
                    }
                    ("Do", Some(Object::Name(name))) => {
                        drawn.push(Drawn::Image(String::from_utf8_lossy(name).to_string()))
                    }
                    _ => {}
                }
            }
            pages.push(drawn);
        }
        Ok(pages)
    }

    /// Text lines of every page, in page order.
    pub fn text_lines(&self) -> Result<Vec<Vec<String>>, Box<dyn std::error::Error>> {
        Ok(self
            .drawn()?
            .into_iter()
            .map(|page| {
                page.into_iter()
                    .filter_map(|d| match d {
                        Drawn::Text(t) => Some(t),
                        Drawn::Image(_) => None,
                    })
                    .collect()
            })
            .collect())
    }
}

fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x95 => '•',
            _ => b as char,
        })
        .collect()
}

/// Returns a blank image of fixed size.
#[derive(Debug, Clone)]
pub struct FixedRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Rasterizer for FixedRasterizer {
    async fn rasterize(&self, _scene: &DiagramScene) -> Result<RasterImage, DiagramError> {
        RasterImage::from_rgba(
            self.width,
            self.height,
            vec![200; (self.width * self.height * 4) as usize],
        )
        .ok_or(DiagramError::Allocation(self.width, self.height))
    }
}

#[derive(Debug, Clone)]
pub struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    async fn rasterize(&self, _scene: &DiagramScene) -> Result<RasterImage, DiagramError> {
        Err(DiagramError::Svg("corrupt scene".to_string()))
    }
}

pub fn fixed_pipeline(width: u32, height: u32) -> ExportPipeline<FixedRasterizer> {
    ExportPipelineBuilder::new()
        .build_with_rasterizer(FixedRasterizer { width, height })
        .expect("default configuration is valid")
}

/// A resvg-backed pipeline that does not scan the system for fonts.
pub fn svg_pipeline() -> ExportPipeline<folio::diagram::SvgRasterizer> {
    ExportPipelineBuilder::new()
        .with_raster_config(RasterConfig {
            load_system_fonts: false,
            ..Default::default()
        })
        .build()
        .expect("default configuration is valid")
}
