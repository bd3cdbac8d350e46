//! Per-surface metadata extraction.
//!
//! Each extractor reads one metadata surface and recovers from its own
//! failures, so a broken surface never hides the others.

pub mod filesystem;
pub mod info;
pub mod xmp;

pub use filesystem::{probe, FilesystemDate};
pub use info::{DocumentInfo, InfoExtractor};
pub use xmp::{XmpExtractor, XmpInfo};
