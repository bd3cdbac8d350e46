//! # PDF Dates
//!
//! Find out when a PDF was really created and who signed it.
//!
//! A PDF can carry its creation date in several places that often disagree:
//! the document information dictionary, the XMP packet, the file it lives in,
//! and its signatures. This crate reads all of them and reconciles them into
//! one [`MetadataRecord`] per file, tagged with the source that won.
//!
//! ## Sources
//!
//! - **Info dictionary**: `/Title`, `/Author`, `/CreationDate`, `/ModDate`
//!   (ISO 32000-1:2008, Section 14.3.3), dates normalized to `YYYY-MM-DD HH:MM:SS`
//! - **XMP**: `xmp:CreateDate`, `xmp:ModifyDate`, `xmp:MetadataDate`, passed through
//! - **Filesystem**: creation time of the file, only when `/CreationDate` is unusable
//! - **Signatures**: CMS signing time, signature field `/M`, or a visible
//!   signature block, in that order
//!
//! Failures stay local: a broken XMP packet or an unreadable signature
//! degrades its own fields and nothing else. Only a non-PDF path or an
//! unparseable file produces [`ProvenanceTag::Error`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_dates::{MetadataRecordBuilder, ProvenanceTag};
//!
//! let builder = MetadataRecordBuilder::new();
//! for record in builder.build_batch(&["a.pdf", "b.pdf", "notes.txt"]) {
//!     match record.provenance {
//!         ProvenanceTag::Error => eprintln!("{}: {}", record.file_name, record.title),
//!         _ => println!("{}\t{}\t{}", record.file_name, record.creation_date, record.signer_name),
//!     }
//! }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Document access
pub mod document;
pub mod source;

// Date handling
pub mod date;

// Metadata surfaces
pub mod extractors;
pub mod signatures;

// Result assembly
pub mod builder;
pub mod record;

// Re-exports
pub use builder::{build, MetadataRecordBuilder};
pub use config::ExtractorOptions;
pub use date::{normalize, DateValue};
pub use document::PdfDocument;
pub use error::{Error, Result};
pub use record::{MetadataRecord, ProvenanceTag};
pub use signatures::{SignatureInfo, SignatureResolver, SignatureSource};
pub use source::DocumentSource;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
