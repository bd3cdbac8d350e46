//! Error types for the metadata resolver.
//!
//! Every error defined here is recovered by the component that raises it and
//! turned into a value inside the resulting [`MetadataRecord`](crate::record::MetadataRecord).
//! None of them escapes [`build`](crate::builder::build).

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while resolving document metadata.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path does not carry the accepted document extension
    #[error("Not a PDF file: {0}")]
    NotADocument(String),

    /// Document bytes could not be parsed as a PDF
    #[error("Failed to read PDF: {0}")]
    DocumentRead(String),

    /// XMP packet is present but structurally invalid
    #[error("Invalid XMP packet: {0}")]
    XmpStructure(String),

    /// A signature, form field or annotation could not be read
    #[error("Unreadable signature artifact: {0}")]
    SignatureUnreadable(String),

    /// Host did not expose a usable file timestamp
    #[error("Filesystem timestamp unavailable: {0}")]
    FilesystemProbeUnavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::DocumentRead(err.to_string())
    }
}
