//! XMP date extraction from PDF documents.
//!
//! Reads the three XMP Core dates (ISO 32000-1:2008, Section 14.3.2) from the
//! catalog `/Metadata` stream. Values are ISO 8601 strings and are passed
//! through as written.
//!
//! Properties may be written as elements (`<xmp:CreateDate>…</xmp:CreateDate>`)
//! or as attributes of `rdf:Description` (`xmp:CreateDate="…"`). Packets from
//! older producers use the `xap:` prefix for the same namespace.

use crate::error::{Error, Result};
use crate::source::DocumentSource;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

/// Placed in `create_date` when the packet exists but cannot be parsed.
pub const XMP_ERROR: &str = "Invalid XMP metadata";

/// XMP Core dates of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmpInfo {
    /// xmp:CreateDate
    pub create_date: String,
    /// xmp:ModifyDate
    pub modify_date: String,
    /// xmp:MetadataDate
    pub metadata_date: String,
}

impl XmpInfo {
    /// The value used when the packet is structurally invalid.
    pub fn structural_failure() -> Self {
        Self {
            create_date: XMP_ERROR.to_string(),
            ..Self::default()
        }
    }

    fn slot(&mut self, property: &str) -> Option<&mut String> {
        let (prefix, local) = property.split_once(':')?;
        if prefix != "xmp" && prefix != "xap" {
            return None;
        }
        match local {
            "CreateDate" => Some(&mut self.create_date),
            "ModifyDate" => Some(&mut self.modify_date),
            "MetadataDate" => Some(&mut self.metadata_date),
            _ => None,
        }
    }

    /// Store `value` for `property` unless an earlier value was already found.
    fn set(&mut self, property: &str, value: &str) {
        if let Some(slot) = self.slot(property) {
            if slot.is_empty() {
                *slot = value.to_string();
            }
        }
    }
}

/// XMP metadata extractor.
pub struct XmpExtractor;

impl XmpExtractor {
    /// Extract the XMP dates of an open document.
    ///
    /// A missing packet gives empty strings. A malformed one gives
    /// [`XmpInfo::structural_failure`]; the error is logged and goes no further.
    pub fn extract(doc: &dyn DocumentSource) -> XmpInfo {
        match Self::read(doc) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("{}", e);
                XmpInfo::structural_failure()
            },
        }
    }

    fn read(doc: &dyn DocumentSource) -> Result<XmpInfo> {
        let packet = match doc.xmp_packet()? {
            Some(bytes) => bytes,
            None => return Ok(XmpInfo::default()),
        };
        let xml = String::from_utf8_lossy(&packet);
        Self::parse_xmp(&xml)
    }

    /// Parse XMP XML content.
    pub fn parse_xmp(xml: &str) -> Result<XmpInfo> {
        // Find the XMP packet boundaries
        let start = xml.find("<x:xmpmeta").or_else(|| xml.find("<rdf:RDF"));
        let end = xml
            .rfind("</x:xmpmeta>")
            .or_else(|| xml.rfind("</rdf:RDF>"));

        let xmp_content = match (start, end) {
            (Some(s), Some(e)) if s < e => {
                let end_adjusted = if xml[e..].starts_with("</x:xmpmeta") {
                    e + "</x:xmpmeta>".len()
                } else {
                    e + "</rdf:RDF>".len()
                };
                &xml[s..end_adjusted]
            },
            _ => {
                return Err(Error::XmpStructure(
                    "no x:xmpmeta or rdf:RDF element".to_string(),
                ))
            },
        };

        let mut info = XmpInfo::default();
        let mut reader = Reader::from_str(xmp_content);
        reader.trim_text(true);

        // Stack to track element hierarchy
        let mut element_stack: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    Self::read_attributes(&e, &mut info)?;
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    element_stack.push(name);
                },
                Ok(Event::Empty(e)) => {
                    Self::read_attributes(&e, &mut info)?;
                },
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmpStructure(err.to_string()))?;
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }

                    // Skip rdf:li, rdf:Seq, rdf:Bag, rdf:Alt wrappers
                    let property = element_stack
                        .iter()
                        .rev()
                        .find(|el| !el.starts_with("rdf:") && !el.starts_with("x:"));

                    if let Some(prop) = property {
                        info.set(prop, text);
                    }
                },
                Ok(Event::End(_)) => {
                    if element_stack.pop().is_none() {
                        return Err(Error::XmpStructure("unbalanced end tag".to_string()));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmpStructure(format!(
                        "XML error at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                },
                _ => {},
            }
        }

        if let Some(open) = element_stack.last() {
            return Err(Error::XmpStructure(format!("unclosed element <{}>", open)));
        }

        Ok(info)
    }

    fn read_attributes(element: &BytesStart<'_>, info: &mut XmpInfo) -> Result<()> {
        for attr in element.attributes() {
            let attr = attr.map_err(|e| Error::XmpStructure(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            if info.slot(&key).is_none() {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|e| Error::XmpStructure(e.to_string()))?;
            info.set(&key, value.trim());
        }
        Ok(())
    }
}
