//! Receipt-scan draft parsing.
//!
//! The scanner backend returns loosely-structured JSON. Parsing is
//! best-effort by contract: whatever fields can be understood become a
//! pre-filled draft, everything else is dropped, and malformed payloads
//! yield an empty draft rather than an error. The user reviews the draft
//! before it is recorded as a real expense.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// A pre-filled expense draft extracted from a scanned receipt. Every field
/// is optional; the draft is never recorded directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryDraft {
    /// Receipt total in minor units
    pub base_amount: Option<i64>,
    /// Purchase date, when the receipt carried a parseable one
    pub date: Option<NaiveDate>,
    /// Merchant name or free-form note
    pub notes: Option<String>,
    /// Category name suggested by the scanner, matched client-side
    pub category_hint: Option<String>,
}

/// Whether `sep` acts as a thousands separator in `s`: every group after
/// the first is exactly three digits ("15.000", "1.234.567").
fn is_thousands_grouped(s: &str, sep: char) -> bool {
    let mut groups = s.split(sep);
    let Some(head) = groups.next() else {
        return false;
    };
    if head.is_empty() || head.len() > 3 || !head.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut rest = groups.peekable();
    rest.peek().is_some()
        && rest.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Parses a string total. Amounts are whole minor units, so separators are
/// only dropped when they group thousands; anything else ("15.50") is a
/// decimal and is rounded like a float total.
fn parse_string_amount(s: &str) -> Option<i64> {
    let s = s.trim();
    for sep in ['.', ','] {
        if is_thousands_grouped(s, sep) {
            return s.replace(sep, "").parse().ok();
        }
    }
    if let Ok(whole) = s.parse::<i64>() {
        return Some(whole);
    }
    #[allow(clippy::cast_possible_truncation)]
    s.parse::<f64>().ok().map(|f| f.round() as i64)
}

fn amount_from(value: &Value) -> Option<i64> {
    let amount = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // Backends sometimes send totals as floats.
            #[allow(clippy::cast_possible_truncation)]
            n.as_f64().map(|f| f.round() as i64)
        }),
        Value::String(s) => parse_string_amount(s),
        _ => None,
    };
    amount.filter(|a| *a > 0)
}

fn string_from(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn first_present<'a>(object: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(key))
}

/// Parses a scanner payload into a draft. Never fails: unusable input
/// produces an empty draft.
#[must_use]
pub fn parse_draft(payload: &str) -> EntryDraft {
    let Ok(parsed) = serde_json::from_str::<Value>(payload) else {
        return EntryDraft::default();
    };
    if !parsed.is_object() {
        return EntryDraft::default();
    }

    let base_amount =
        first_present(&parsed, &["base_amount", "amount", "total"]).and_then(amount_from);
    let date = first_present(&parsed, &["date", "purchase_date"])
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
    let notes = first_present(&parsed, &["notes", "merchant", "description"]).and_then(string_from);
    let category_hint = first_present(&parsed, &["category", "category_hint"]).and_then(string_from);

    EntryDraft {
        base_amount,
        date,
        notes,
        category_hint,
    }
}
