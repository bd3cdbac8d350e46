//! Configuration for metadata resolution.

use crate::signatures::SignatureSource;

/// Options controlling how a [`MetadataRecordBuilder`](crate::builder::MetadataRecordBuilder)
/// treats its inputs.
///
/// # Example
///
/// ```
/// use pdf_dates::config::ExtractorOptions;
/// use pdf_dates::signatures::SignatureSource;
///
/// let options = ExtractorOptions::default()
///     .with_filesystem_probe(false)
///     .with_signature_tiers(&[SignatureSource::Cryptographic]);
/// assert!(!options.probe_filesystem);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// File extension accepted as a document, compared case-insensitively
    pub extension: String,

    /// Fall back to the filesystem creation time when /CreationDate does not resolve
    pub probe_filesystem: bool,

    /// Maximum document size in bytes; larger files are treated as unreadable.
    ///
    /// Default: 500 MB. Set to 0 to disable the check.
    pub max_file_size: u64,

    /// Signature tiers to consult. Their order is fixed regardless of this list.
    pub signature_tiers: Vec<SignatureSource>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            probe_filesystem: true,
            max_file_size: 500 * 1024 * 1024, // 500 MB
            signature_tiers: SignatureSource::TIERS.to_vec(),
        }
    }
}

impl ExtractorOptions {
    /// Only trust what the document itself declares: no filesystem fallback,
    /// no heuristic visible-signature parsing.
    pub fn strict() -> Self {
        Self {
            probe_filesystem: false,
            signature_tiers: vec![SignatureSource::Cryptographic, SignatureSource::FormField],
            ..Self::default()
        }
    }

    /// Enable or disable the filesystem fallback.
    pub fn with_filesystem_probe(mut self, enable: bool) -> Self {
        self.probe_filesystem = enable;
        self
    }

    /// Set the size limit in bytes (0 disables it).
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Choose which signature tiers are consulted.
    pub fn with_signature_tiers(mut self, tiers: &[SignatureSource]) -> Self {
        self.signature_tiers = tiers.to_vec();
        self
    }

    /// Accept a different file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Whether `file_name` ends in the accepted extension.
    pub fn accepts(&self, file_name: &str) -> bool {
        let suffix = format!(".{}", self.extension.to_ascii_lowercase());
        file_name.to_ascii_lowercase().ends_with(&suffix)
    }
}
