//! Heuristic reading of visible signature blocks.
//!
//! Signature stamps drawn as FreeText annotations usually carry the signer on
//! the first line and a date on the second (`"Jane Doe\n01.05.2023 10:00"`),
//! or both on one line separated by a comma (`"Jane Doe, 01.05.2023"`).

use crate::date::DateValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `name, tail` where the tail after the last comma starts with a digit
    static ref RE_NAME_COMMA_TAIL: Regex =
        Regex::new(r"^(?P<name>.+),\s*(?P<date>\d.*?)\s*$").unwrap();

    /// Digits and date punctuation only, starting and ending with a digit
    static ref RE_DATE_LIKE: Regex = Regex::new(r"^\d[\d.:/\-T ]*\d$").unwrap();
}

/// One date grammar, tried in a fixed order by [`parse_visible_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGrammar {
    /// RFC 3339 / ISO 8601, with or without offset, or a bare date
    Iso8601,
    /// `31.12.2024 13:45`
    DottedDateTime,
    /// `31.12.2024`
    DottedDate,
    /// `31/12/2024 13:45`
    SlashedDateTime,
    /// `31/12/2024`
    SlashedDate,
}

impl DateGrammar {
    /// Every grammar in the order they are attempted.
    pub const ORDER: [DateGrammar; 5] = [
        DateGrammar::Iso8601,
        DateGrammar::DottedDateTime,
        DateGrammar::DottedDate,
        DateGrammar::SlashedDateTime,
        DateGrammar::SlashedDate,
    ];

    /// Try to parse `text` with this grammar alone.
    pub fn parse(self, text: &str) -> Option<NaiveDateTime> {
        match self {
            DateGrammar::Iso8601 => parse_iso8601(text),
            DateGrammar::DottedDateTime => NaiveDateTime::parse_from_str(text, "%d.%m.%Y %H:%M").ok(),
            DateGrammar::DottedDate => date_only(text, "%d.%m.%Y"),
            DateGrammar::SlashedDateTime => NaiveDateTime::parse_from_str(text, "%d/%m/%Y %H:%M").ok(),
            DateGrammar::SlashedDate => date_only(text, "%d/%m/%Y"),
        }
    }
}

fn date_only(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// ISO 8601 as written: an offset, if any, is not applied.
fn parse_iso8601(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| date_only(text, "%Y-%m-%d"))
}

/// Parse a date string with the first grammar that accepts it.
///
/// Returns the grammar that matched so callers and tests can see which one won.
pub fn parse_visible_date(text: &str) -> Option<(DateGrammar, NaiveDateTime)> {
    DateGrammar::ORDER
        .iter()
        .find_map(|grammar| grammar.parse(text).map(|instant| (*grammar, instant)))
}

/// Name and date read from a visible signature block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSignature {
    /// Signer as written
    pub name: String,
    /// Date, resolved when one grammar accepted it
    pub date: DateValue,
}

fn date_value(text: &str) -> DateValue {
    if text.is_empty() {
        return DateValue::empty();
    }
    match parse_visible_date(text) {
        Some((_, instant)) => DateValue::resolved(instant),
        None => DateValue::unresolved(text),
    }
}

fn is_date_tail(tail: &str) -> bool {
    parse_visible_date(tail).is_some() || RE_DATE_LIKE.is_match(tail)
}

/// Split annotation text into signer name and date.
pub fn parse_signature_block(text: &str) -> VisibleSignature {
    let text = text.trim();
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim();

    if let Some(second) = lines.next() {
        return VisibleSignature {
            name: first.to_string(),
            date: date_value(second.trim()),
        };
    }

    // PDF text often breaks lines with a bare CR, which `lines` does not split on
    if let Some((name, date)) = text.split_once('\r') {
        return VisibleSignature {
            name: name.trim().to_string(),
            date: date_value(date.trim().lines().next().unwrap_or_default().trim()),
        };
    }

    // The tail only counts as a date when a grammar accepts it or it is
    // made of date characters; "Mustermann, 3rd floor" stays a name.
    let split = RE_NAME_COMMA_TAIL
        .captures(text)
        .filter(|caps| is_date_tail(&caps["date"]));

    match split {
        Some(caps) => VisibleSignature {
            name: caps["name"].trim().to_string(),
            date: date_value(caps["date"].trim()),
        },
        None => VisibleSignature {
            name: text.to_string(),
            date: DateValue::empty(),
        },
    }
}
