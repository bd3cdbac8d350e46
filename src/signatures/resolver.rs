//! Tiered signer/date search.
//!
//! Tiers are consulted strictly in order and the first one that yields a name
//! or a date ends the search. A tier that fails to read its part of the
//! document counts as having found nothing.

use super::types::{SignatureInfo, SignatureSource};
use super::visible::parse_signature_block;
use crate::date::{normalize_opt, DateValue};
use crate::source::{DocumentSource, FieldType};
use chrono::Local;
use std::path::Path;

/// A single tier: `None` means "nothing here, try the next one".
pub type Strategy = fn(&dyn DocumentSource) -> Option<SignatureInfo>;

/// Finds the best available signer and signing date of a document.
#[derive(Debug, Clone)]
pub struct SignatureResolver {
    tiers: Vec<SignatureSource>,
}

impl Default for SignatureResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureResolver {
    /// Resolver consulting every tier.
    pub fn new() -> Self {
        Self {
            tiers: SignatureSource::TIERS.to_vec(),
        }
    }

    /// Resolver consulting only `enabled` tiers. Their order stays fixed.
    pub fn with_tiers(enabled: &[SignatureSource]) -> Self {
        Self {
            tiers: SignatureSource::TIERS
                .into_iter()
                .filter(|tier| enabled.contains(tier))
                .collect(),
        }
    }

    /// Tiers this resolver will consult, in order.
    pub fn tiers(&self) -> &[SignatureSource] {
        &self.tiers
    }

    /// Run the tiers against `doc`. `path` only labels log output.
    pub fn resolve(&self, path: &Path, doc: &dyn DocumentSource) -> SignatureInfo {
        let found = self.tiers.iter().find_map(|tier| {
            let strategy = strategy_for(*tier)?;
            let info = strategy(doc).filter(SignatureInfo::is_usable);
            if info.is_none() {
                log::debug!("{}: no {} signature", path.display(), tier);
            }
            info
        });

        match found {
            Some(info) => {
                log::debug!("{}: signer resolved from {} tier", path.display(), info.source);
                info
            },
            None => SignatureInfo::default(),
        }
    }
}

fn strategy_for(tier: SignatureSource) -> Option<Strategy> {
    match tier {
        SignatureSource::Cryptographic => Some(cryptographic_tier),
        SignatureSource::FormField => Some(form_field_tier),
        SignatureSource::VisibleAnnotation => Some(visible_annotation_tier),
        SignatureSource::None => None,
    }
}

/// First embedded signature with a readable signing time.
fn cryptographic_tier(doc: &dyn DocumentSource) -> Option<SignatureInfo> {
    let signatures = doc
        .embedded_signatures()
        .map_err(|e| log::debug!("Embedded signatures unreadable: {}", e))
        .ok()?;

    signatures.iter().enumerate().find_map(|(index, sig)| match sig.signing_time() {
        Ok(time) => Some(SignatureInfo {
            signer_name: sig.signer_name().unwrap_or_default(),
            signing_time: DateValue::resolved(time.with_timezone(&Local).naive_local()),
            source: SignatureSource::Cryptographic,
        }),
        Err(e) => {
            log::debug!("Skipping embedded signature #{}: {}", index, e);
            None
        },
    })
}

/// First filled /Sig field with a declared name or date.
fn form_field_tier(doc: &dyn DocumentSource) -> Option<SignatureInfo> {
    let fields = doc
        .acroform_fields()
        .map_err(|e| log::debug!("AcroForm unreadable: {}", e))
        .ok()?;

    fields
        .iter()
        .filter(|field| field.field_type == FieldType::Signature)
        .filter_map(|field| field.signature.as_ref())
        .map(|sig| SignatureInfo {
            signer_name: sig.name.clone().unwrap_or_default(),
            signing_time: normalize_opt(sig.signing_date.as_deref()),
            source: SignatureSource::FormField,
        })
        .find(SignatureInfo::is_usable)
}

/// First FreeText annotation that reads as a signature block.
fn visible_annotation_tier(doc: &dyn DocumentSource) -> Option<SignatureInfo> {
    let pages = doc
        .pages()
        .map_err(|e| log::debug!("Page tree unreadable: {}", e))
        .ok()?;

    pages
        .iter()
        .flat_map(|page| page.annotations.iter())
        .filter(|annot| annot.is_free_text())
        .filter_map(|annot| annot.contents.as_deref())
        .filter(|text| !text.trim().is_empty())
        .map(|text| {
            let block = parse_signature_block(text);
            SignatureInfo {
                signer_name: block.name,
                signing_time: block.date,
                source: SignatureSource::VisibleAnnotation,
            }
        })
        .find(SignatureInfo::is_usable)
}
