//! Signature resolution result types.

use crate::date::DateValue;
use serde::Serialize;
use std::fmt;

/// Which tier produced a [`SignatureInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SignatureSource {
    /// CMS signing time of an embedded signature
    Cryptographic,
    /// Declared /Name and /M of a filled signature field
    FormField,
    /// FreeText annotation drawn as a signature block
    VisibleAnnotation,
    /// No tier produced anything
    #[default]
    None,
}

impl SignatureSource {
    /// The searchable tiers, in the order they are consulted.
    pub const TIERS: [SignatureSource; 3] = [
        SignatureSource::Cryptographic,
        SignatureSource::FormField,
        SignatureSource::VisibleAnnotation,
    ];

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SignatureSource::Cryptographic => "cryptographic",
            SignatureSource::FormField => "form-field",
            SignatureSource::VisibleAnnotation => "visible-annotation",
            SignatureSource::None => "",
        }
    }
}

impl fmt::Display for SignatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signer and signing date found for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignatureInfo {
    /// Signer display name, possibly empty
    pub signer_name: String,
    /// Signing date; `raw` may hold an unparsed visible date
    pub signing_time: DateValue,
    /// Tier that produced this result
    pub source: SignatureSource,
}

impl SignatureInfo {
    /// Whether a tier found a name or a date.
    pub fn is_usable(&self) -> bool {
        !self.signer_name.trim().is_empty() || !self.signing_time.is_empty()
    }
}
