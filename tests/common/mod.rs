//! Shared fixtures: an in-memory document source, generated PDFs and a
//! minimal CMS SignedData blob.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use pdf_dates::error::{Error, Result};
use pdf_dates::source::{
    Annotation, DocumentSource, EmbeddedSignature, FieldType, FormField, InfoDictionary, Page,
    SignatureDictionary,
};
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Document source backed by plain values.
///
/// Counts how often each signature surface is read so tests can assert that
/// later tiers were never consulted.
#[derive(Default)]
pub struct FakeDocument {
    pub info: InfoDictionary,
    pub xmp: Option<Vec<u8>>,
    pub broken_xmp: bool,
    pub pages: Vec<Page>,
    pub fields: Vec<FormField>,
    pub signatures: Vec<EmbeddedSignature>,
    pub broken_signatures: bool,
    pub broken_fields: bool,
    pub field_reads: Cell<usize>,
    pub page_reads: Cell<usize>,
}

impl FakeDocument {
    pub fn with_free_text(mut self, text: &str) -> Self {
        self.pages.push(Page {
            annotations: vec![Annotation {
                subtype: Some("FreeText".to_string()),
                contents: Some(text.to_string()),
            }],
        });
        self
    }

    pub fn with_signature_field(mut self, name: Option<&str>, date: Option<&str>) -> Self {
        self.fields.push(FormField {
            name: format!("Signature{}", self.fields.len() + 1),
            field_type: FieldType::Signature,
            signature: Some(SignatureDictionary {
                name: name.map(str::to_string),
                signing_date: date.map(str::to_string),
            }),
        });
        self
    }

    pub fn with_embedded(mut self, signature: EmbeddedSignature) -> Self {
        self.signatures.push(signature);
        self
    }
}

impl DocumentSource for FakeDocument {
    fn info_dictionary(&self) -> InfoDictionary {
        self.info.clone()
    }

    fn xmp_packet(&self) -> Result<Option<Vec<u8>>> {
        if self.broken_xmp {
            return Err(Error::XmpStructure("/Metadata is not a stream".to_string()));
        }
        Ok(self.xmp.clone())
    }

    fn pages(&self) -> Result<Vec<Page>> {
        self.page_reads.set(self.page_reads.get() + 1);
        Ok(self.pages.clone())
    }

    fn acroform_fields(&self) -> Result<Vec<FormField>> {
        self.field_reads.set(self.field_reads.get() + 1);
        if self.broken_fields {
            return Err(Error::DocumentRead("AcroForm is not a dictionary".to_string()));
        }
        Ok(self.fields.clone())
    }

    fn embedded_signatures(&self) -> Result<Vec<EmbeddedSignature>> {
        if self.broken_signatures {
            return Err(Error::SignatureUnreadable("bad /Contents".to_string()));
        }
        Ok(self.signatures.clone())
    }
}

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xFF {
        out.extend([0x81, len as u8]);
    } else {
        out.extend([0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(content);
    out
}

fn seq(parts: &[Vec<u8>]) -> Vec<u8> {
    tlv(0x30, &parts.concat())
}

const OID_SIGNED_DATA: [u8; 11] = [0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02];
const OID_DATA: [u8; 11] = [0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x01];
const OID_SIGNING_TIME: [u8; 11] = [0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09, 0x05];
const OID_SHA256: [u8; 11] = [0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];
const OID_RSA: [u8; 11] = [0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];

/// Subject key identifier of `tests/fixtures/jane_doe.der`.
pub const JANE_DOE_KEY_ID: [u8; 20] = [
    0x1D, 0x76, 0xA9, 0xD4, 0xF4, 0x9C, 0xF4, 0x53, 0x41, 0x75, 0x3D, 0x17, 0x8E, 0x73, 0xCE, 0x4A,
    0x12, 0xA6, 0x90, 0x43,
];

/// How the SignerInfo points at its certificate.
pub enum SignerId {
    /// IssuerAndSerialNumber: DER-encoded issuer Name and serial content bytes
    IssuerSerial(Vec<u8>, Vec<u8>),
    /// `[0]` subjectKeyIdentifier
    KeyId(Vec<u8>),
}

impl SignerId {
    /// IssuerAndSerialNumber taken from a DER certificate.
    pub fn of(cert: &[u8]) -> Self {
        let (issuer, serial) = issuer_and_serial(cert);
        SignerId::IssuerSerial(issuer, serial)
    }

    fn encode(&self) -> (u8, Vec<u8>) {
        match self {
            SignerId::IssuerSerial(issuer, serial) => (1, seq(&[issuer.clone(), tlv(0x02, serial)])),
            SignerId::KeyId(key_id) => (3, tlv(0x80, key_id)),
        }
    }
}

/// Read a certificate from `tests/fixtures`.
pub fn certificate(name: &str) -> Vec<u8> {
    std::fs::read(Path::new("tests/fixtures").join(name)).unwrap()
}

/// Split the first TLV off `bytes`: (tag, content, rest).
fn split_tlv(bytes: &[u8]) -> (u8, &[u8], &[u8]) {
    let (len, header) = match bytes[1] {
        n if n < 0x80 => (n as usize, 2),
        0x81 => (bytes[2] as usize, 3),
        0x82 => (((bytes[2] as usize) << 8) | bytes[3] as usize, 4),
        other => panic!("unsupported DER length byte {:#x}", other),
    };
    (bytes[0], &bytes[header..header + len], &bytes[header + len..])
}

/// Issuer Name (full TLV) and serial number content of a v3 certificate.
pub fn issuer_and_serial(cert: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let (_, body, _) = split_tlv(cert);
    let (_, tbs, _) = split_tlv(body);
    let (version_tag, _, rest) = split_tlv(tbs);
    assert_eq!(version_tag, 0xA0, "expected an explicit version");
    let (_, serial, rest) = split_tlv(rest);
    let (_, _, rest) = split_tlv(rest);
    let (_, _, after_issuer) = split_tlv(rest);
    let issuer = rest[..rest.len() - after_issuer.len()].to_vec();
    (issuer, serial.to_vec())
}

/// DER SignedData with one signer and no certificates.
///
/// `utc_time` is a UTCTime body such as `230501100000Z`; `None` leaves the
/// signingTime attribute out.
pub fn signed_data(utc_time: Option<&str>) -> Vec<u8> {
    let anonymous = SignerId::IssuerSerial(seq(&[]), vec![1]);
    signed_data_with(utc_time, &anonymous, &[])
}

/// DER SignedData with one signer identified by `signer` and the given
/// certificates, which must already be in DER SET OF order.
pub fn signed_data_with(utc_time: Option<&str>, signer: &SignerId, certificates: &[&[u8]]) -> Vec<u8> {
    let (version, sid) = signer.encode();
    let mut signer_info = vec![tlv(0x02, &[version]), sid, seq(&[OID_SHA256.to_vec()])];
    if let Some(time) = utc_time {
        let attr = seq(&[OID_SIGNING_TIME.to_vec(), tlv(0x31, &tlv(0x17, time.as_bytes()))]);
        signer_info.push(tlv(0xA0, &attr));
    }
    signer_info.push(seq(&[OID_RSA.to_vec()]));
    signer_info.push(tlv(0x04, &[0]));

    let mut body = vec![
        tlv(0x02, &[version]),
        tlv(0x31, &seq(&[OID_SHA256.to_vec()])),
        seq(&[OID_DATA.to_vec()]),
    ];
    if !certificates.is_empty() {
        body.push(tlv(0xA0, &certificates.concat()));
    }
    body.push(tlv(0x31, &seq(&signer_info)));
    seq(&[OID_SIGNED_DATA.to_vec(), tlv(0xA0, &seq(&body))])
}

/// A signature field to place on the generated page.
pub struct SigField {
    pub name: Option<String>,
    pub date: Option<String>,
    pub contents: Option<Vec<u8>>,
}

/// Builder for small single-page PDFs.
#[derive(Default)]
pub struct PdfFixture {
    info: Vec<(&'static str, String)>,
    xmp: Option<String>,
    metadata_not_a_stream: bool,
    free_text: Vec<String>,
    sig_fields: Vec<SigField>,
}

impl PdfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(mut self, key: &'static str, value: &str) -> Self {
        self.info.push((key, value.to_string()));
        self
    }

    pub fn xmp(mut self, packet: &str) -> Self {
        self.xmp = Some(packet.to_string());
        self
    }

    pub fn metadata_not_a_stream(mut self) -> Self {
        self.metadata_not_a_stream = true;
        self
    }

    pub fn free_text(mut self, text: &str) -> Self {
        self.free_text.push(text.to_string());
        self
    }

    pub fn signature_field(mut self, field: SigField) -> Self {
        self.sig_fields.push(field);
        self
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();

        let mut annots: Vec<Object> = Vec::new();
        for text in &self.free_text {
            let id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "FreeText",
                "Rect" => vec![72.into(), 72.into(), 300.into(), 120.into()],
                "Contents" => Object::string_literal(text.as_str()),
            });
            annots.push(id.into());
        }

        let mut fields: Vec<Object> = Vec::new();
        for (index, sig) in self.sig_fields.iter().enumerate() {
            let mut value = dictionary! {
                "Type" => "Sig",
                "Filter" => "Adobe.PPKLite",
                "SubFilter" => "adbe.pkcs7.detached",
            };
            if let Some(name) = &sig.name {
                value.set("Name", Object::string_literal(name.as_str()));
            }
            if let Some(date) = &sig.date {
                value.set("M", Object::string_literal(date.as_str()));
            }
            if let Some(contents) = &sig.contents {
                value.set("Contents", Object::String(contents.clone(), StringFormat::Hexadecimal));
            }
            let value_id = doc.add_object(value);
            let field_id = doc.add_object(dictionary! {
                "FT" => "Sig",
                "T" => Object::string_literal(format!("Signature{}", index + 1)),
                "V" => value_id,
                "Type" => "Annot",
                "Subtype" => "Widget",
                "Rect" => vec![0.into(), 0.into(), 0.into(), 0.into()],
                "P" => page_id,
            });
            fields.push(field_id.into());
            annots.push(field_id.into());
        }

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        if !annots.is_empty() {
            page.set("Annots", annots);
        }
        doc.objects.insert(page_id, Object::Dictionary(page));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if !fields.is_empty() {
            catalog.set("AcroForm", dictionary! { "Fields" => fields, "SigFlags" => 3 });
        }
        if let Some(packet) = &self.xmp {
            let stream = Stream::new(
                dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
                packet.as_bytes().to_vec(),
            );
            let metadata_id = doc.add_object(stream);
            catalog.set("Metadata", metadata_id);
        } else if self.metadata_not_a_stream {
            catalog.set("Metadata", dictionary! { "Type" => "Metadata" });
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if !self.info.is_empty() {
            let mut info = lopdf::Dictionary::new();
            for (key, value) in &self.info {
                info.set(*key, Object::string_literal(value.as_str()));
            }
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        doc
    }

    /// Write the document to `dir/name` and return the path.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut doc = self.to_document();
        doc.save(&path).unwrap();
        path
    }
}

/// An XMP packet carrying the three date properties as elements.
pub fn xmp_packet(create: &str, modify: &str, metadata: &str) -> String {
    format!(
        r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/">
      <xmp:CreateDate>{}</xmp:CreateDate>
      <xmp:ModifyDate>{}</xmp:ModifyDate>
      <xmp:MetadataDate>{}</xmp:MetadataDate>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#,
        create, modify, metadata
    )
}
