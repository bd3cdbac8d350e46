//! The document surfaces the resolver reads.
//!
//! [`DocumentSource`] is the seam between the resolver and whatever parses the
//! PDF structure. [`PdfDocument`](crate::document::PdfDocument) implements it
//! on top of `lopdf`; tests substitute in-memory sources.
//!
//! All values are copied out of the parser into the owned types below, so no
//! record ever borrows from an open document.

use crate::error::Result;
use crate::signatures::contents::{self, CmsSummary};
use chrono::{DateTime, Utc};

/// Read access to one open document.
pub trait DocumentSource {
    /// The trailer `/Info` dictionary, with every field absent when there is none.
    fn info_dictionary(&self) -> InfoDictionary;

    /// Raw bytes of the catalog `/Metadata` stream, decoded from its filters.
    fn xmp_packet(&self) -> Result<Option<Vec<u8>>>;

    /// Pages in document order.
    fn pages(&self) -> Result<Vec<Page>>;

    /// Terminal AcroForm fields, hierarchy flattened.
    fn acroform_fields(&self) -> Result<Vec<FormField>>;

    /// Embedded cryptographic signatures in document order.
    fn embedded_signatures(&self) -> Result<Vec<EmbeddedSignature>>;
}

/// Entries of the document information dictionary (ISO 32000-1:2008, Table 317).
///
/// Only the keys this crate consumes are kept; anything else is dropped on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoDictionary {
    /// /Title
    pub title: Option<String>,
    /// /Author
    pub author: Option<String>,
    /// /CreationDate, undecoded
    pub creation_date: Option<String>,
    /// /ModDate, undecoded
    pub mod_date: Option<String>,
}

/// A page and the annotations attached to it.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Annotations from the /Annots array
    pub annotations: Vec<Annotation>,
}

/// The annotation entries the visible-signature search looks at.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// /Subtype name (FreeText, Widget, ...)
    pub subtype: Option<String>,
    /// /Contents text
    pub contents: Option<String>,
}

impl Annotation {
    /// Whether this is a FreeText annotation.
    pub fn is_free_text(&self) -> bool {
        self.subtype.as_deref() == Some("FreeText")
    }
}

/// Field type from the /FT key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// /Btn
    Button,
    /// /Tx
    Text,
    /// /Ch
    Choice,
    /// /Sig
    Signature,
    /// Anything else
    Unknown(String),
}

impl FieldType {
    /// Parse the /FT name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Btn" => FieldType::Button,
            "Tx" => FieldType::Text,
            "Ch" => FieldType::Choice,
            "Sig" => FieldType::Signature,
            other => FieldType::Unknown(other.to_string()),
        }
    }
}

/// A terminal form field.
#[derive(Debug, Clone)]
pub struct FormField {
    /// Fully qualified field name
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Signature dictionary from /V, for signature fields that are filled
    pub signature: Option<SignatureDictionary>,
}

/// Declared entries of a signature dictionary (ISO 32000-1:2008, Table 252).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureDictionary {
    /// /Name
    pub name: Option<String>,
    /// /M, undecoded PDF date
    pub signing_date: Option<String>,
}

/// An embedded CMS signature blob with the dictionary it came from.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSignature {
    /// DER bytes of the /Contents entry (may carry zero padding)
    pub contents: Vec<u8>,
    /// Declared entries of the enclosing signature dictionary
    pub dictionary: SignatureDictionary,
}

impl EmbeddedSignature {
    /// Create a signature from its /Contents bytes.
    pub fn new(contents: Vec<u8>) -> Self {
        Self {
            contents,
            dictionary: SignatureDictionary::default(),
        }
    }

    /// Attach the declared dictionary entries.
    pub fn with_dictionary(mut self, dictionary: SignatureDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    fn summary(&self) -> Result<CmsSummary> {
        contents::summarize(&self.contents)
    }

    /// Advisory signing time from the CMS `signingTime` attribute.
    pub fn signing_time(&self) -> Result<DateTime<Utc>> {
        self.summary()?.signing_time.ok_or_else(|| {
            crate::error::Error::SignatureUnreadable("no signingTime attribute".to_string())
        })
    }

    /// Human-readable signer: certificate subject, then the declared /Name.
    pub fn signer_name(&self) -> Option<String> {
        self.summary()
            .ok()
            .and_then(|summary| summary.signer_name)
            .or_else(|| self.dictionary.name.clone())
            .filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::from_pdf_name("Sig"), FieldType::Signature);
        assert_eq!(FieldType::from_pdf_name("Tx"), FieldType::Text);
        assert_eq!(FieldType::from_pdf_name("Foo"), FieldType::Unknown("Foo".to_string()));
    }

    #[test]
    fn test_free_text_detection() {
        let annot = Annotation {
            subtype: Some("FreeText".to_string()),
            contents: None,
        };
        assert!(annot.is_free_text());
        assert!(!Annotation::default().is_free_text());
    }

    #[test]
    fn test_garbage_signature_has_no_time() {
        let sig = EmbeddedSignature::new(vec![0x00, 0x01, 0x02]);
        assert!(sig.signing_time().is_err());
        assert_eq!(sig.signer_name(), None);
    }

    #[test]
    fn test_signer_name_falls_back_to_dictionary() {
        let sig = EmbeddedSignature::new(Vec::new()).with_dictionary(SignatureDictionary {
            name: Some("Erika Mustermann".to_string()),
            signing_date: None,
        });
        assert_eq!(sig.signer_name(), Some("Erika Mustermann".to_string()));
    }
}
