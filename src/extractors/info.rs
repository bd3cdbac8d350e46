//! Document information dictionary extraction.

use crate::date::{normalize_opt, DateValue};
use crate::source::DocumentSource;
use serde::Serialize;

/// Identity and date entries of the info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// /Title, empty when absent
    pub title: String,
    /// /Author, empty when absent
    pub author: String,
    /// /CreationDate, normalized
    pub creation_date: DateValue,
    /// /ModDate, normalized
    pub mod_date: DateValue,
}

/// Info dictionary extractor.
pub struct InfoExtractor;

impl InfoExtractor {
    /// Read title, author and both dates from an open document. Never fails.
    pub fn extract(doc: &dyn DocumentSource) -> DocumentInfo {
        let info = doc.info_dictionary();
        DocumentInfo {
            title: info.title.unwrap_or_default(),
            author: info.author.unwrap_or_default(),
            creation_date: normalize_opt(info.creation_date.as_deref()),
            mod_date: normalize_opt(info.mod_date.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::source::{EmbeddedSignature, FormField, InfoDictionary, Page};

    struct InfoOnly(InfoDictionary);

    impl DocumentSource for InfoOnly {
        fn info_dictionary(&self) -> InfoDictionary {
            self.0.clone()
        }
        fn xmp_packet(&self) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
        fn pages(&self) -> Result<Vec<Page>> {
            Ok(Vec::new())
        }
        fn acroform_fields(&self) -> Result<Vec<FormField>> {
            Ok(Vec::new())
        }
        fn embedded_signatures(&self) -> Result<Vec<EmbeddedSignature>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_extract_full_dictionary() {
        let doc = InfoOnly(InfoDictionary {
            title: Some("Quarterly Report".to_string()),
            author: Some("Finance".to_string()),
            creation_date: Some("D:20230501100000+02'00'".to_string()),
            mod_date: Some("D:20230502120000Z".to_string()),
        });
        let info = InfoExtractor::extract(&doc);
        assert_eq!(info.title, "Quarterly Report");
        assert_eq!(info.author, "Finance");
        assert_eq!(info.creation_date.raw, "2023-05-01 10:00:00");
        assert!(info.creation_date.resolved.is_some());
        assert_eq!(info.mod_date.raw, "2023-05-02 12:00:00");
    }

    #[test]
    fn test_extract_missing_dictionary() {
        let info = InfoExtractor::extract(&InfoOnly(InfoDictionary::default()));
        assert_eq!(info, DocumentInfo::default());
        assert!(info.creation_date.is_empty());
    }

    #[test]
    fn test_unparseable_date_kept_verbatim() {
        let doc = InfoOnly(InfoDictionary {
            creation_date: Some("sometime in May".to_string()),
            ..InfoDictionary::default()
        });
        let info = InfoExtractor::extract(&doc);
        assert_eq!(info.creation_date.raw, "sometime in May");
        assert!(info.creation_date.resolved.is_none());
    }
}
