use crate::RenderError;
use crate::content::PageContext;
use crate::writer::StreamingPdfWriter;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use folio_layout::{FontVariant, PageSet};
use folio_types::RasterImage;
use log::{debug, info};
use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::BTreeMap;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

/// A finished PDF file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl EmittedDocument {
    /// Writes the file into `dir` under its own name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Serializes a [`PageSet`] into a PDF using the standard Helvetica faces.
#[derive(Debug, Clone)]
pub struct LopdfRenderer {
    version: String,
    compress: bool,
    producer: Option<String>,
}

impl Default for LopdfRenderer {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            compress: true,
            producer: Some(concat!("folio ", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl LopdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flate-compress page content streams. Image data is always compressed.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_producer(mut self, producer: Option<String>) -> Self {
        self.producer = producer;
        self
    }

    /// Renders `pages` into memory as a file named `file_name`.
    pub fn emit(&self, pages: &PageSet, file_name: &str) -> Result<EmittedDocument, RenderError> {
        let bytes = self.render(pages, Cursor::new(Vec::new()))?.into_inner();
        info!(
            "Emitted '{}' ({} pages, {} bytes)",
            file_name,
            pages.page_count(),
            bytes.len()
        );
        Ok(EmittedDocument {
            file_name: file_name.to_string(),
            bytes,
        })
    }

    pub fn render<W: Write + Seek>(&self, pages: &PageSet, writer: W) -> Result<W, RenderError> {
        let mut pdf = StreamingPdfWriter::new(writer, &self.version)?;

        let mut image_names = BTreeMap::new();
        let mut xobjects = Dictionary::new();
        for (index, (src, image)) in pages.images.iter().enumerate() {
            let name = format!("Im{}", index + 1);
            let id = write_image(&mut pdf, image)?;
            debug!(
                "Embedded image '{src}' as /{name} ({}x{} px)",
                image.width_px, image.height_px
            );
            xobjects.set(name.as_bytes(), id);
            image_names.insert(src.clone(), name);
        }

        let mut resources = dictionary! { "Font" => font_dictionary() };
        if !xobjects.is_empty() {
            resources.set("XObject", xobjects);
        }
        pdf.set_resources(resources);

        let page_size = pages.geometry.page_size_pt();
        let mut page_ids = Vec::with_capacity(pages.page_count());
        for page in &pages.pages {
            let mut ctx = PageContext::new(pages.geometry.page_height, &image_names);
            for el in &page.elements {
                ctx.draw_element(el)?;
            }
            let content_id = pdf.write_object(self.content_stream(ctx.finish())?.into())?;

            let page_id = pdf.new_object_id();
            let page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pdf.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), page_size.width.into(), page_size.height.into()],
                "Contents" => content_id,
                "Resources" => pdf.resources_id,
            };
            pdf.buffer_object_at_id(page_id, page_dict.into());
            page_ids.push(page_id);
        }

        let info = self.producer.as_ref().map(|producer| {
            dictionary! {
                "Producer" => Object::String(producer.as_bytes().to_vec(), StringFormat::Literal),
            }
        });
        Ok(pdf.finish(&page_ids, info)?)
    }

    fn content_stream(&self, content: Content) -> Result<Stream, RenderError> {
        let encoded = content.encode()?;
        if self.compress {
            Ok(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                deflate(&encoded)?,
            ))
        } else {
            Ok(Stream::new(dictionary! {}, encoded))
        }
    }
}

fn font_dictionary() -> Dictionary {
    let mut fonts = Dictionary::new();
    for variant in FontVariant::ALL {
        fonts.set(
            variant.resource_name().as_bytes(),
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => variant.postscript_name(),
                "Encoding" => "WinAnsiEncoding",
            },
        );
    }
    fonts
}

/// Writes the colour data as an RGB image XObject, with a grey soft mask
/// when any pixel is not fully opaque.
fn write_image<W: Write + Seek>(
    pdf: &mut StreamingPdfWriter<W>,
    image: &RasterImage,
) -> Result<ObjectId, RenderError> {
    let (rgb, alpha) = image.split_alpha();
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width_px as i64,
        "Height" => image.height_px as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    if !image.is_opaque() {
        let mask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width_px as i64,
                "Height" => image.height_px as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        );
        let mask_id = pdf.write_object(mask.into())?;
        dict.set("SMask", mask_id);
    }
    Ok(pdf.write_object(Stream::new(dict, deflate(&rgb)?).into())?)
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_layout::{ImageElement, LayoutElement, LineSink, PositionedElement, TextElement};
    use folio_types::PageGeometry;
    use std::sync::Arc;

    fn sample_pages() -> PageSet {
        let mut pages = PageSet::new(PageGeometry::default());
        pages.push(PositionedElement {
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 10.0,
            element: LayoutElement::Text(TextElement {
                content: "Hello (world)".into(),
                font: FontVariant::Regular,
                font_size: 12.0,
            }),
        });
        pages.start_page(1);
        let image = RasterImage::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        pages.add_image("diagram", Arc::new(image));
        pages.push(PositionedElement {
            x: 10.0,
            y: 10.0,
            width: 190.0,
            height: 95.0,
            element: LayoutElement::Image(ImageElement {
                src: "diagram".into(),
            }),
        });
        pages
    }

    #[test]
    fn output_is_a_loadable_pdf_with_a4_pages() {
        let doc = LopdfRenderer::new().emit(&sample_pages(), "document.pdf").unwrap();
        assert_eq!(doc.file_name, "document.pdf");

        let pdf = lopdf::Document::load_mem(&doc.bytes).unwrap();
        let pages = pdf.get_pages();
        assert_eq!(pages.len(), 2);
        for page_id in pages.values() {
            let page = pdf.get_dictionary(*page_id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            let height = media_box[3].as_float().unwrap();
            assert!((height - 841.8898).abs() < 1e-2);
        }
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        let renderer = LopdfRenderer::new();
        let a = renderer.emit(&sample_pages(), "document.pdf").unwrap();
        let b = renderer.emit(&sample_pages(), "document.pdf").unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn translucent_images_carry_a_soft_mask() {
        let doc = LopdfRenderer::new().emit(&sample_pages(), "document.pdf").unwrap();
        let pdf = lopdf::Document::load_mem(&doc.bytes).unwrap();
        let images: Vec<_> = pdf
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .filter(|s| {
                s.dict
                    .get(b"Subtype")
                    .and_then(|v| v.as_name())
                    .is_ok_and(|name| name == b"Image")
            })
            .collect();
        assert_eq!(images.len(), 2);
        assert!(images.iter().any(|s| s.dict.has(b"SMask")));
    }

    #[test]
    fn missing_image_data_fails() {
        let mut pages = sample_pages();
        pages.images.clear();
        assert!(matches!(
            LopdfRenderer::new().emit(&pages, "document.pdf"),
            Err(RenderError::MissingImage(_))
        ));
    }

    #[test]
    fn save_to_writes_under_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let doc = EmittedDocument {
            file_name: "document.pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        };
        let path = doc.save_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("document.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.7");
    }
}
