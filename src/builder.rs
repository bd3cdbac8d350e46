//! Record assembly.
//!
//! [`MetadataRecordBuilder::build`] is the entry point front-ends call: one
//! path in, exactly one [`MetadataRecord`] out, whatever happens in between.

use crate::config::ExtractorOptions;
use crate::document::PdfDocument;
use crate::error::Error;
use crate::extractors::{probe, InfoExtractor, XmpExtractor};
use crate::record::{MetadataRecord, NOT_A_PDF, READ_ERROR};
use crate::signatures::SignatureResolver;
use crate::source::DocumentSource;
use rayon::prelude::*;
use std::path::Path;

/// Builds [`MetadataRecord`]s. Stateless apart from its options, so one
/// builder can serve any number of threads.
#[derive(Debug, Clone)]
pub struct MetadataRecordBuilder {
    options: ExtractorOptions,
    resolver: SignatureResolver,
}

impl Default for MetadataRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataRecordBuilder {
    /// Builder with default options.
    pub fn new() -> Self {
        Self::with_options(ExtractorOptions::default())
    }

    /// Builder with custom options.
    pub fn with_options(options: ExtractorOptions) -> Self {
        let resolver = SignatureResolver::with_tiers(&options.signature_tiers);
        Self { options, resolver }
    }

    /// Options in effect.
    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Resolve the metadata record for one path.
    ///
    /// The extension is checked before the file is touched. The document is
    /// opened once and dropped before this returns.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_dates::builder::MetadataRecordBuilder;
    /// use pdf_dates::record::ProvenanceTag;
    ///
    /// let record = MetadataRecordBuilder::new().build("invoice.pdf");
    /// if record.provenance == ProvenanceTag::CreationDateResolved {
    ///     println!("{} created {}", record.file_name, record.creation_date);
    /// }
    /// ```
    pub fn build(&self, path: impl AsRef<Path>) -> MetadataRecord {
        let path = path.as_ref();
        let file_name = file_name_of(path);

        if !self.options.accepts(&file_name) {
            log::debug!("{}: rejected by extension", path.display());
            return MetadataRecord::error(file_name, NOT_A_PDF);
        }

        let doc = match PdfDocument::open_with_limit(path, self.options.max_file_size) {
            Ok(doc) => doc,
            Err(Error::Io(e)) => {
                log::warn!("{}: {}", path.display(), e);
                return MetadataRecord::error(file_name, format!("Unexpected error: {}", e));
            },
            Err(e) => {
                log::warn!("{}: {}", path.display(), e);
                return MetadataRecord::error(file_name, READ_ERROR);
            },
        };

        self.build_from_source(path, &doc)
    }

    /// Assemble a record from an already open document.
    ///
    /// `path` names the record and is probed for a filesystem date when the
    /// document declares no usable creation date.
    pub fn build_from_source(&self, path: &Path, doc: &dyn DocumentSource) -> MetadataRecord {
        let info = InfoExtractor::extract(doc);
        let xmp = XmpExtractor::extract(doc);

        let filesystem = if self.options.probe_filesystem && info.creation_date.resolved.is_none() {
            Some(probe(path))
        } else {
            None
        };

        let signature = self.resolver.resolve(path, doc);
        MetadataRecord::assemble(file_name_of(path), info, xmp, filesystem, signature)
    }

    /// Build records for a batch of paths in parallel.
    ///
    /// Records come back in input order.
    pub fn build_batch<P>(&self, paths: &[P]) -> Vec<MetadataRecord>
    where
        P: AsRef<Path> + Sync,
    {
        paths.par_iter().map(|path| self.build(path)).collect()
    }
}

/// Resolve one path with default options.
pub fn build(path: impl AsRef<Path>) -> MetadataRecord {
    MetadataRecordBuilder::new().build(path)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
