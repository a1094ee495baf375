//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same rules.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

pub(crate) const MAX_NAME_LEN: usize = 64;
pub(crate) const MAX_DESCRIPTION_LEN: usize = 255;

/// Largest magnitude accepted for a transaction amount or an opening balance,
/// in minor units (10 trillion in major units).
///
/// Keeps every single input far below `i64::MAX`; the ledger store refuses
/// the remaining cumulative overflow.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000_000;

/// Trim and collapse inner whitespace of a user supplied name.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let display = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if display.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if display.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "{label} name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(display)
}

/// Comparison key for names: accents stripped, lowercased, punctuation
/// folded into single spaces.
///
/// "Café  Wallet" and "cafe wallet" share the key `cafe wallet`.
pub(crate) fn name_key(value: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in value.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    if prev_space {
        out.pop();
    }
    out
}

/// Trim free text, mapping blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(EngineError::InvalidName(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Icons are free-form identifiers chosen by the client; blank means default.
pub(crate) fn normalize_icon(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Accept `#rrggbb`, returned lowercased.
pub(crate) fn normalize_color(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(EngineError::InvalidName(format!(
            "invalid color '{trimmed}', expected #rrggbb"
        )));
    }
    Ok(trimmed.to_ascii_lowercase())
}

pub(crate) fn ensure_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    if amount_minor > MAX_AMOUNT_MINOR {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at most {MAX_AMOUNT_MINOR}"
        )));
    }
    Ok(())
}

/// Opening balances may be negative (credit cards), but not unbounded.
pub(crate) fn ensure_opening_balance(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor.unsigned_abs() > MAX_AMOUNT_MINOR.unsigned_abs() {
        return Err(EngineError::InvalidAmount(format!(
            "opening balance must be between -{MAX_AMOUNT_MINOR} and {MAX_AMOUNT_MINOR}"
        )));
    }
    Ok(())
}
