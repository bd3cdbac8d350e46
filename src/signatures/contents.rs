//! Advisory reading of CMS (PKCS#7) signature blobs.
//!
//! Only two things are taken from a signature: the `signingTime` signed
//! attribute (RFC 5652, Section 11.3) and the subject of the signer's
//! certificate. Nothing is verified.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier, SignerInfo};
use der::asn1::{GeneralizedTime, ObjectIdentifier, UtcTime};
use der::{Any, Decode, Encode, SliceReader, Tag, Tagged};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::ParsedExtension;

/// id-signedData (1.2.840.113549.1.7.2)
const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

/// id-signingTime (1.2.840.113549.1.9.5)
const ID_SIGNING_TIME: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.5");

/// What a signature blob says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsSummary {
    /// Signing time of the first signer that declares one
    pub signing_time: Option<DateTime<Utc>>,
    /// Subject common name (or full subject) of that signer's certificate
    pub signer_name: Option<String>,
}

fn unreadable(err: impl std::fmt::Display) -> Error {
    Error::SignatureUnreadable(err.to_string())
}

/// Decode a `/Contents` blob into a [`CmsSummary`].
///
/// The blob is usually zero-padded to the reserved size, so only the first
/// DER value is read and the trailing bytes are ignored.
pub fn summarize(contents: &[u8]) -> Result<CmsSummary> {
    let mut reader = SliceReader::new(contents).map_err(unreadable)?;
    let info = ContentInfo::decode(&mut reader).map_err(unreadable)?;
    if info.content_type != ID_SIGNED_DATA {
        return Err(Error::SignatureUnreadable(format!(
            "unexpected content type {}",
            info.content_type
        )));
    }

    let content = info.content.to_der().map_err(unreadable)?;
    let signed_data = SignedData::from_der(&content).map_err(unreadable)?;

    let mut summary = CmsSummary::default();
    let signers = signed_data.signer_infos.0.iter();
    let timed = signers
        .filter_map(|signer| signing_time(signer).map(|time| (signer, time)))
        .next();

    match timed {
        Some((signer, time)) => {
            summary.signing_time = Some(time);
            summary.signer_name = signer_subject(&signed_data, Some(signer));
        },
        None => {
            summary.signer_name = signer_subject(&signed_data, None);
        },
    }

    Ok(summary)
}

fn signing_time(signer: &SignerInfo) -> Option<DateTime<Utc>> {
    let attrs = signer.signed_attrs.as_ref()?;
    attrs
        .iter()
        .filter(|attr| attr.oid == ID_SIGNING_TIME)
        .flat_map(|attr| attr.values.iter())
        .find_map(decode_time)
}

fn decode_time(value: &Any) -> Option<DateTime<Utc>> {
    let bytes = value.to_der().ok()?;
    let since_epoch = match value.tag() {
        Tag::UtcTime => UtcTime::from_der(&bytes).ok()?.to_unix_duration(),
        Tag::GeneralizedTime => GeneralizedTime::from_der(&bytes).ok()?.to_unix_duration(),
        other => {
            log::debug!("signingTime has unexpected tag {}", other);
            return None;
        },
    };
    let secs = i64::try_from(since_epoch.as_secs()).ok()?;
    DateTime::<Utc>::from_timestamp(secs, since_epoch.subsec_nanos())
}

/// Subject of the certificate identified by `signer`, or of the first certificate.
fn signer_subject(signed_data: &SignedData, signer: Option<&SignerInfo>) -> Option<String> {
    let certificates: Vec<Vec<u8>> = signed_data
        .certificates
        .iter()
        .flat_map(|set| set.0.iter())
        .filter_map(|choice| match choice {
            CertificateChoices::Certificate(cert) => cert.to_der().ok(),
            _ => None,
        })
        .collect();

    let parsed: Vec<X509Certificate<'_>> = certificates
        .iter()
        .filter_map(|der| x509_parser::parse_x509_certificate(der).ok())
        .map(|(_, cert)| cert)
        .collect();

    let cert = signer
        .and_then(|signer| parsed.iter().find(|cert| identifies(&signer.sid, cert)))
        .or_else(|| parsed.first())?;
    display_name(cert)
}

/// Whether `cert` is the one `sid` points at (RFC 5652, Section 5.3).
fn identifies(sid: &SignerIdentifier, cert: &X509Certificate<'_>) -> bool {
    match sid {
        SignerIdentifier::IssuerAndSerialNumber(isn) => {
            cert.raw_serial() == isn.serial_number.as_bytes()
        },
        SignerIdentifier::SubjectKeyIdentifier(ski) => {
            cert.extensions().iter().any(|ext| {
                matches!(
                    ext.parsed_extension(),
                    ParsedExtension::SubjectKeyIdentifier(id) if id.0 == ski.0.as_bytes()
                )
            })
        },
    }
}

/// Subject common name, or the whole subject when it has none.
fn display_name(cert: &X509Certificate<'_>) -> Option<String> {
    let subject = cert.subject();
    let common_name = subject
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);
    let name = common_name.unwrap_or_else(|| subject.to_string());
    if name.trim().is_empty() {
        None
    } else {
        Some(name)
    }
}
