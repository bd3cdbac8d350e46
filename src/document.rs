//! PDF document access backed by `lopdf`.
//!
//! [`PdfDocument`] parses a file once and answers every [`DocumentSource`]
//! query from the parsed object graph. Values are copied out as owned data,
//! so a document can be dropped as soon as extraction is done.

use crate::error::{Error, Result};
use crate::source::{
    Annotation, DocumentSource, EmbeddedSignature, FieldType, FormField, InfoDictionary, Page,
    SignatureDictionary,
};
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

/// Field hierarchies nested deeper than this are treated as cyclic.
const MAX_FIELD_DEPTH: usize = 32;

/// A parsed PDF document.
pub struct PdfDocument {
    inner: Document,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.inner.version)
            .field("objects", &self.inner.objects.len())
            .finish_non_exhaustive()
    }
}

/// A terminal field plus the raw /Contents of its signature value, if any.
struct FieldEntry {
    field: FormField,
    contents: Option<Vec<u8>>,
}

impl PdfDocument {
    /// Open and parse a PDF file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, [`Error::DocumentRead`]
    /// when its contents are not a parseable PDF.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_dates::document::PdfDocument;
    /// use pdf_dates::source::DocumentSource;
    ///
    /// let doc = PdfDocument::open("sample.pdf")?;
    /// println!("{:?}", doc.info_dictionary().creation_date);
    /// # Ok::<(), pdf_dates::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_limit(path, 0)
    }

    /// Open a PDF file, refusing files larger than `max_file_size` bytes (0 = no limit).
    pub fn open_with_limit(path: impl AsRef<Path>, max_file_size: u64) -> Result<Self> {
        let path = path.as_ref();
        if max_file_size > 0 {
            let size = std::fs::metadata(path)?.len();
            if size > max_file_size {
                return Err(Error::DocumentRead(format!(
                    "file is {} bytes, limit is {}",
                    size, max_file_size
                )));
            }
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(bytes)?;
        Ok(Self { inner })
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        self.inner.dereference(obj).ok().map(|(_, resolved)| resolved)
    }

    fn dict_entry<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
        match self.resolve(dict.get(key).ok()?)? {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    fn array_entry<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Vec<Object>> {
        match self.resolve(dict.get(key).ok()?)? {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    fn text_entry(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        match self.resolve(dict.get(key).ok()?)? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }

    fn name_entry(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        match self.resolve(dict.get(key).ok()?)? {
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }

    fn catalog(&self) -> Result<&Dictionary> {
        self.dict_entry(&self.inner.trailer, b"Root")
            .ok_or_else(|| Error::DocumentRead("trailer has no /Root catalog".to_string()))
    }

    /// Walk /AcroForm /Fields, flattening /Kids.
    fn field_entries(&self) -> Result<Vec<FieldEntry>> {
        let catalog = self.catalog()?;
        let acroform = match self.dict_entry(catalog, b"AcroForm") {
            Some(d) => d,
            None => return Ok(Vec::new()),
        };
        let fields = match self.array_entry(acroform, b"Fields") {
            Some(a) => a,
            None => return Ok(Vec::new()),
        };

        let mut result = Vec::new();
        for field in fields {
            self.collect_field(field, "", None, 0, &mut result)?;
        }
        Ok(result)
    }

    fn collect_field(
        &self,
        field_ref: &Object,
        parent_name: &str,
        inherited_type: Option<&str>,
        depth: usize,
        result: &mut Vec<FieldEntry>,
    ) -> Result<()> {
        if depth > MAX_FIELD_DEPTH {
            return Err(Error::SignatureUnreadable(format!(
                "form field hierarchy deeper than {}",
                MAX_FIELD_DEPTH
            )));
        }

        let field = match self.resolve(field_ref) {
            Some(Object::Dictionary(d)) => d,
            _ => return Ok(()),
        };

        let partial_name = self.text_entry(field, b"T").unwrap_or_default();
        let full_name = if parent_name.is_empty() {
            partial_name
        } else if partial_name.is_empty() {
            parent_name.to_string()
        } else {
            format!("{}.{}", parent_name, partial_name)
        };

        // /FT is inheritable (ISO 32000-1:2008, Table 220)
        let own_type = self.name_entry(field, b"FT");
        let field_type = own_type.as_deref().or(inherited_type);

        if let Some(kids) = self.array_entry(field, b"Kids") {
            for kid in kids {
                self.collect_field(kid, &full_name, field_type, depth + 1, result)?;
            }
        }

        // Intermediate nodes only carry /Kids; a node with its own /FT or a
        // value of an inherited type is terminal.
        let field_type = match field_type {
            Some(name) if own_type.is_some() || field.has(b"V") => FieldType::from_pdf_name(name),
            _ => return Ok(()),
        };

        let value = self.dict_entry(field, b"V");
        let signature = value
            .filter(|_| field_type == FieldType::Signature)
            .map(|v| SignatureDictionary {
                name: self.text_entry(v, b"Name"),
                signing_date: self.text_entry(v, b"M"),
            });
        let contents = value
            .filter(|_| field_type == FieldType::Signature)
            .and_then(|v| match self.resolve(v.get(b"Contents").ok()?)? {
                Object::String(bytes, _) => Some(bytes.clone()),
                _ => None,
            });

        result.push(FieldEntry {
            field: FormField {
                name: full_name,
                field_type,
                signature,
            },
            contents,
        });
        Ok(())
    }

    fn read_annotation(&self, obj: &Object) -> Option<Annotation> {
        match self.resolve(obj)? {
            Object::Dictionary(annot) => Some(Annotation {
                subtype: self.name_entry(annot, b"Subtype"),
                contents: self.text_entry(annot, b"Contents"),
            }),
            _ => None,
        }
    }
}

impl DocumentSource for PdfDocument {
    fn info_dictionary(&self) -> InfoDictionary {
        let info = match self.dict_entry(&self.inner.trailer, b"Info") {
            Some(d) => d,
            None => return InfoDictionary::default(),
        };
        InfoDictionary {
            title: self.text_entry(info, b"Title"),
            author: self.text_entry(info, b"Author"),
            creation_date: self.text_entry(info, b"CreationDate"),
            mod_date: self.text_entry(info, b"ModDate"),
        }
    }

    fn xmp_packet(&self) -> Result<Option<Vec<u8>>> {
        let catalog = self.catalog()?;
        let metadata = match catalog.get(b"Metadata") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };

        match self.resolve(metadata) {
            Some(Object::Stream(stream)) => {
                if stream.dict.has(b"Filter") {
                    stream
                        .decompressed_content()
                        .map(Some)
                        .map_err(|e| Error::XmpStructure(format!("undecodable stream: {}", e)))
                } else {
                    Ok(Some(stream.content.clone()))
                }
            },
            _ => Err(Error::XmpStructure("/Metadata is not a stream".to_string())),
        }
    }

    fn pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        for (number, page_id) in self.inner.get_pages() {
            let page = match self.inner.get_object(page_id) {
                Ok(Object::Dictionary(d)) => d,
                _ => {
                    log::debug!("Page {} is not a dictionary, skipping", number);
                    pages.push(Page::default());
                    continue;
                },
            };
            let annotations = self
                .array_entry(page, b"Annots")
                .map(|annots| annots.iter().filter_map(|a| self.read_annotation(a)).collect())
                .unwrap_or_default();
            pages.push(Page { annotations });
        }
        Ok(pages)
    }

    fn acroform_fields(&self) -> Result<Vec<FormField>> {
        Ok(self.field_entries()?.into_iter().map(|entry| entry.field).collect())
    }

    fn embedded_signatures(&self) -> Result<Vec<EmbeddedSignature>> {
        Ok(self
            .field_entries()?
            .into_iter()
            .filter_map(|entry| {
                let contents = entry.contents?;
                let dictionary = entry.field.signature.unwrap_or_default();
                Some(EmbeddedSignature::new(contents).with_dictionary(dictionary))
            })
            .collect())
    }
}

/// Decode a PDF text string (ISO 32000-1:2008, Section 7.9.2.2).
///
/// UTF-16BE when it starts with the 0xFE 0xFF byte order mark, UTF-8 when it
/// starts with 0xEF 0xBB 0xBF (PDF 2.0), PDFDocEncoding otherwise.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().filter_map(|&b| pdfdoc_char(b)).collect()
}

/// PDFDocEncoding (ISO 32000-1:2008, Annex D.2).
fn pdfdoc_char(code: u8) -> Option<char> {
    const HIGH: [char; 31] = [
        '•', '†', '‡', '…', '—', '–', 'ƒ', '⁄', '‹', '›', '−', '‰', '„', '“', '”', '‘', '’', '‚',
        '™', 'ﬁ', 'ﬂ', 'Ł', 'Œ', 'Š', 'Ÿ', 'Ž', 'ı', 'ł', 'œ', 'š', 'ž',
    ];
    match code {
        0x00..=0x7F => Some(code as char),
        0x80..=0x9E => Some(HIGH[(code - 0x80) as usize]),
        0x9F => None,
        0xA0 => Some('€'),
        _ => Some(code as char),
    }
}
