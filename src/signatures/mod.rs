//! Signer and signing date resolution.
//!
//! Three sources are searched, most trustworthy first:
//!
//! 1. **Cryptographic**: the CMS `signingTime` of embedded signatures
//!    (ISO 32000-1:2008, Section 12.8)
//! 2. **Form field**: `/Name` and `/M` declared in a filled `/Sig` field
//! 3. **Visible annotation**: FreeText annotations that spell out a signer
//!    and a date
//!
//! Signatures are never verified; the signing time is advisory.
//!
//! ## Example
//!
//! ```no_run
//! use pdf_dates::document::PdfDocument;
//! use pdf_dates::signatures::SignatureResolver;
//! use std::path::Path;
//!
//! let path = Path::new("contract.pdf");
//! let doc = PdfDocument::open(path)?;
//! let info = SignatureResolver::new().resolve(path, &doc);
//! println!("{} signed at {} ({})", info.signer_name, info.signing_time.raw, info.source);
//! # Ok::<(), pdf_dates::Error>(())
//! ```

pub mod contents;
mod resolver;
mod types;
pub mod visible;

pub use resolver::{SignatureResolver, Strategy};
pub use types::{SignatureInfo, SignatureSource};
pub use visible::{parse_signature_block, parse_visible_date, DateGrammar, VisibleSignature};
