use lopdf::{Dictionary, Object, ObjectId, StringFormat, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Seek, Write};

/// Writes a PDF body incrementally.
///
/// Streams are written as soon as they are produced; small dictionaries that
/// reference objects not yet known (pages, catalog, resources) are buffered
/// and written by [`StreamingPdfWriter::finish`]. Object ids, key order and
/// number formatting are all deterministic, so identical input yields
/// byte-identical output.
pub struct StreamingPdfWriter<W: Write + Seek> {
    writer: W,
    offsets: BTreeMap<u32, u64>,
    max_id: u32,
    pub pages_id: ObjectId,
    pub catalog_id: ObjectId,
    pub resources_id: ObjectId,
    buffered_objects: BTreeMap<ObjectId, Object>,
}

impl<W: Write + Seek> StreamingPdfWriter<W> {
    pub fn new(mut writer: W, version: &str) -> io::Result<Self> {
        writer.write_all(format!("%PDF-{version}\n%\u{e2}\u{e3}\u{cf}\u{d3}\n").as_bytes())?;
        Ok(Self {
            writer,
            offsets: BTreeMap::new(),
            max_id: 3,
            pages_id: (1, 0),
            catalog_id: (2, 0),
            resources_id: (3, 0),
            buffered_objects: BTreeMap::new(),
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    /// Writes `object` to the output immediately under a fresh id.
    pub fn write_object(&mut self, object: Object) -> io::Result<ObjectId> {
        let id = self.new_object_id();
        self.write_indirect(id, &object)?;
        Ok(id)
    }

    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.new_object_id();
        self.buffered_objects.insert(id, object);
        id
    }

    pub fn buffer_object_at_id(&mut self, id: ObjectId, object: Object) {
        self.max_id = self.max_id.max(id.0);
        self.buffered_objects.insert(id, object);
    }

    pub fn set_resources(&mut self, resources: Dictionary) {
        self.buffered_objects.insert(self.resources_id, resources.into());
    }

    /// Writes the page tree, catalog, cross-reference table and trailer.
    pub fn finish(mut self, page_ids: &[ObjectId], info: Option<Dictionary>) -> io::Result<W> {
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => page_ids.len() as i64,
        };
        self.buffer_object_at_id(self.pages_id, pages_dict.into());
        self.buffer_object_at_id(
            self.catalog_id,
            dictionary! { "Type" => "Catalog", "Pages" => self.pages_id }.into(),
        );
        self.buffered_objects
            .entry(self.resources_id)
            .or_insert_with(|| Dictionary::new().into());
        let info_id = info.map(|dict| self.buffer_object(dict.into()));

        let buffered = std::mem::take(&mut self.buffered_objects);
        for (id, object) in &buffered {
            self.write_indirect(*id, object)?;
        }

        let xref_start = self.writer.stream_position()?;
        let size = self.max_id + 1;
        self.write_xref(size)?;

        let mut trailer = dictionary! { "Size" => size as i64, "Root" => self.catalog_id };
        if let Some(info_id) = info_id {
            trailer.set("Info", info_id);
        }
        writeln!(self.writer, "trailer")?;
        serialize::write_dictionary(&mut self.writer, &trailer)?;
        write!(self.writer, "\nstartxref\n{xref_start}\n%%EOF")?;

        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_indirect(&mut self, id: ObjectId, object: &Object) -> io::Result<()> {
        let offset = self.writer.stream_position()?;
        self.offsets.insert(id.0, offset);
        writeln!(self.writer, "{} {} obj", id.0, id.1)?;
        serialize::write_object(&mut self.writer, object)?;
        writeln!(self.writer, "\nendobj")
    }

    /// One subsection covering every id below `size`; ids never written are
    /// listed as free.
    fn write_xref(&mut self, size: u32) -> io::Result<()> {
        writeln!(self.writer, "xref\n0 {size}")?;
        writeln!(self.writer, "0000000000 65535 f ")?;
        for id in 1..size {
            match self.offsets.get(&id) {
                Some(offset) => writeln!(self.writer, "{offset:010} 00000 n ")?,
                None => writeln!(self.writer, "0000000000 00000 f ")?,
            }
        }
        Ok(())
    }
}

mod serialize {
    use super::*;

    pub fn write_object(writer: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => writer.write_all(b"null"),
            Object::Boolean(b) => writer.write_all(if *b { b"true" } else { b"false" }),
            Object::Integer(i) => write!(writer, "{i}"),
            Object::Real(r) => writer.write_all(format_real(*r).as_bytes()),
            Object::Name(n) => {
                writer.write_all(b"/")?;
                writer.write_all(n)
            }
            Object::String(s, StringFormat::Literal) => {
                writer.write_all(b"(")?;
                for &byte in s {
                    if matches!(byte, b'(' | b')' | b'\\') {
                        writer.write_all(b"\\")?;
                    }
                    writer.write_all(&[byte])?;
                }
                writer.write_all(b")")
            }
            Object::String(s, StringFormat::Hexadecimal) => {
                writer.write_all(b"<")?;
                for byte in s {
                    write!(writer, "{byte:02X}")?;
                }
                writer.write_all(b">")
            }
            Object::Array(items) => {
                writer.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write_object(writer, item)?;
                }
                writer.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(writer, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(writer, &dict)?;
                writer.write_all(b"\nstream\n")?;
                writer.write_all(&stream.content)?;
                writer.write_all(b"\nendstream")
            }
            Object::Reference(id) => write!(writer, "{} {} R", id.0, id.1),
        }
    }

    pub fn write_dictionary(writer: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        writer.write_all(b"<<")?;
        let sorted: BTreeMap<_, _> = dict.iter().collect();
        for (key, value) in sorted {
            writer.write_all(b"/")?;
            writer.write_all(key)?;
            writer.write_all(b" ")?;
            write_object(writer, value)?;
            writer.write_all(b" ")?;
        }
        writer.write_all(b">>")
    }

    /// Up to four decimals, trailing zeros dropped.
    pub fn format_real(value: f32) -> String {
        let text = format!("{value:.4}");
        let text = text.trim_end_matches('0').trim_end_matches('.');
        match text {
            "" | "-" | "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }
}
