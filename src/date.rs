//! PDF date normalization.
//!
//! Info-dictionary dates use the form `D:YYYYMMDDHHmmSSOHH'mm'` (ISO 32000-1:2008,
//! Section 7.9.4). Only the fourteen leading digits are interpreted; the UT offset
//! that may follow is dropped rather than applied, so a resolved value is the
//! wall-clock time written in the file.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Rendering used for every resolved timestamp shown to consumers.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PDF_DATE_PREFIX: &str = "D:";
const PDF_DATE_DIGITS: usize = 14;

/// A date as found in a document, paired with its resolved instant.
///
/// `raw` is what consumers display: the canonical rendering when the token
/// resolved, the untouched token when it did not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateValue {
    /// Display string
    pub raw: String,
    /// Resolved timestamp, if the token parsed
    pub resolved: Option<NaiveDateTime>,
}

impl DateValue {
    /// A value with no token at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A resolved value rendered canonically.
    pub fn resolved(instant: NaiveDateTime) -> Self {
        Self {
            raw: format_timestamp(&instant),
            resolved: Some(instant),
        }
    }

    /// An unresolved value that keeps the original text.
    pub fn unresolved(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            resolved: None,
        }
    }

    /// True when there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.resolved.is_none()
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(instant: &NaiveDateTime) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

/// Normalize a raw info-dictionary date token.
///
/// Never fails: a token that does not follow the PDF date grammar comes back
/// verbatim with `resolved = None`.
///
/// # Example
///
/// ```
/// use pdf_dates::date::normalize;
///
/// let value = normalize("D:20230501120000+02'00'");
/// assert_eq!(value.raw, "2023-05-01 12:00:00");
/// assert!(value.resolved.is_some());
///
/// let bad = normalize("yesterday");
/// assert_eq!(bad.raw, "yesterday");
/// assert!(bad.resolved.is_none());
/// ```
pub fn normalize(token: &str) -> DateValue {
    if token.is_empty() {
        return DateValue::empty();
    }

    match parse_pdf_date(token) {
        Some(instant) => DateValue::resolved(instant),
        None => {
            log::debug!("Unparseable PDF date {:?}, keeping it verbatim", token);
            DateValue::unresolved(token)
        },
    }
}

/// Normalize an optional token; `None` behaves like an empty token.
pub fn normalize_opt(token: Option<&str>) -> DateValue {
    normalize(token.unwrap_or_default())
}

/// Parse the fourteen date digits of a PDF date, discarding any offset.
fn parse_pdf_date(token: &str) -> Option<NaiveDateTime> {
    let body = token.strip_prefix(PDF_DATE_PREFIX).unwrap_or(token);
    let body = match body.find(['+', '-', 'Z']) {
        Some(cut) => &body[..cut],
        None => body,
    };

    let digits: String = body.chars().take(PDF_DATE_DIGITS).collect();
    if digits.len() != PDF_DATE_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDateTime::parse_from_str(&digits, "%Y%m%d%H%M%S").ok()
}
