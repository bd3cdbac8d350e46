//! The per-file result handed to front-ends.

use crate::extractors::{DocumentInfo, FilesystemDate, XmpInfo};
use crate::signatures::{SignatureInfo, SignatureSource};
use serde::Serialize;
use std::fmt;

/// Title shown for a path that is not a PDF.
pub const NOT_A_PDF: &str = "Not a PDF file";

/// Title shown for a file that could not be parsed as a PDF.
pub const READ_ERROR: &str = "Error reading PDF";

/// Which source determined a record's primary date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProvenanceTag {
    /// Rejected by extension, or the document could not be opened
    Error,
    /// /CreationDate resolved
    CreationDateResolved,
    /// No usable /CreationDate; filesystem timestamp available
    FilesystemDateResolved,
    /// Neither source produced a date
    Unresolved,
}

impl ProvenanceTag {
    /// Classify a successfully opened document.
    pub fn classify(info: &DocumentInfo, filesystem: FilesystemDate) -> Self {
        if info.creation_date.resolved.is_some() {
            ProvenanceTag::CreationDateResolved
        } else if filesystem.is_available() {
            ProvenanceTag::FilesystemDateResolved
        } else {
            ProvenanceTag::Unresolved
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ProvenanceTag::Error => "error",
            ProvenanceTag::CreationDateResolved => "creation-date",
            ProvenanceTag::FilesystemDateResolved => "filesystem-date",
            ProvenanceTag::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything resolved for one input path, as display-ready text.
///
/// Records own their data and hold nothing from the document they were read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// File name without directories
    pub file_name: String,
    /// /Title, or the diagnostic for error records
    pub title: String,
    /// /Author
    pub author: String,
    /// /CreationDate
    pub creation_date: String,
    /// /ModDate
    pub mod_date: String,
    /// xmp:CreateDate
    pub xmp_create_date: String,
    /// xmp:ModifyDate
    pub xmp_modify_date: String,
    /// xmp:MetadataDate
    pub xmp_metadata_date: String,
    /// Filesystem creation time, only probed without a usable /CreationDate
    pub filesystem_date: String,
    /// Resolved signer
    pub signer_name: String,
    /// Resolved signing date
    pub signing_time: String,
    /// Tier the signer came from
    pub signature_source: SignatureSource,
    /// Which source won
    pub provenance: ProvenanceTag,
}

impl MetadataRecord {
    /// An error record: only the file name and the diagnostic are set.
    pub fn error(file_name: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            title: diagnostic.into(),
            author: String::new(),
            creation_date: String::new(),
            mod_date: String::new(),
            xmp_create_date: String::new(),
            xmp_modify_date: String::new(),
            xmp_metadata_date: String::new(),
            filesystem_date: String::new(),
            signer_name: String::new(),
            signing_time: String::new(),
            signature_source: SignatureSource::None,
            provenance: ProvenanceTag::Error,
        }
    }

    /// Assemble a record from the outputs of every extractor.
    ///
    /// `filesystem` is `None` when the probe was not run.
    pub fn assemble(
        file_name: impl Into<String>,
        info: DocumentInfo,
        xmp: XmpInfo,
        filesystem: Option<FilesystemDate>,
        signature: SignatureInfo,
    ) -> Self {
        let provenance =
            ProvenanceTag::classify(&info, filesystem.unwrap_or(FilesystemDate::Unavailable));
        Self {
            file_name: file_name.into(),
            title: info.title,
            author: info.author,
            creation_date: info.creation_date.raw,
            mod_date: info.mod_date.raw,
            xmp_create_date: xmp.create_date,
            xmp_modify_date: xmp.modify_date,
            xmp_metadata_date: xmp.metadata_date,
            filesystem_date: filesystem.map(|date| date.render()).unwrap_or_default(),
            signer_name: signature.signer_name,
            signing_time: signature.signing_time.raw,
            signature_source: signature.source,
            provenance,
        }
    }

    /// Whether this record describes a rejected or unreadable file.
    pub fn is_error(&self) -> bool {
        self.provenance == ProvenanceTag::Error
    }

    /// Column headers matching [`MetadataRecord::columns`].
    pub const HEADERS: [&'static str; 13] = [
        "File",
        "Title",
        "Author",
        "CreationDate",
        "ModDate",
        "XMPCreateDate",
        "XMPModifyDate",
        "XMPMetadataDate",
        "FileSystemDate",
        "Signer",
        "SigningTime",
        "SignatureSource",
        "Provenance",
    ];

    /// Field values in column order.
    pub fn columns(&self) -> [String; 13] {
        [
            self.file_name.clone(),
            self.title.clone(),
            self.author.clone(),
            self.creation_date.clone(),
            self.mod_date.clone(),
            self.xmp_create_date.clone(),
            self.xmp_modify_date.clone(),
            self.xmp_metadata_date.clone(),
            self.filesystem_date.clone(),
            self.signer_name.clone(),
            self.signing_time.clone(),
            self.signature_source.to_string(),
            self.provenance.to_string(),
        ]
    }
}
