//! Field encoders: typed value to the fixed textual form a record leaf expects.
//!
//! Every encoder maps `None` to the empty string, which marks the leaf for
//! omission. Values that break a constraint fail with [`FormatError`];
//! nothing is silently truncated or coerced.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::FormatError;

/// Maximum lengths of the string leaves.
pub mod max_len {
    pub const CODE: usize = 2;
    pub const FOREIGN_ID: usize = 20;
    pub const SOFTWARE_NAME: usize = 30;
    pub const SOFTWARE_ID: usize = 30;
    pub const TIMESTAMP: usize = 30;
    pub const VERSION: usize = 50;
    pub const SERIAL: usize = 60;
    pub const FINGERPRINT: usize = 64;
    pub const INSTALLATION: usize = 100;
    pub const NAME: usize = 120;
    pub const DESCRIPTION: usize = 500;
}

/// Bounded-length string. Exceeding `max` characters is an error.
pub fn bounded(value: Option<&str>, max: usize) -> Result<String, FormatError> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    if value.chars().count() > max {
        return Err(FormatError::TooLong {
            max,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Spanish tax identifier (NIF): `A1234567B`, `12345678Z` or `B12345678`.
pub fn tax_id(value: Option<&str>) -> Result<String, FormatError> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    if is_nif_shape(value) {
        Ok(value.to_string())
    } else {
        Err(FormatError::TaxId {
            value: value.to_string(),
        })
    }
}

fn is_nif_shape(value: &str) -> bool {
    let b = value.as_bytes();
    if b.len() != 9 {
        return false;
    }
    let digits = |s: &[u8]| s.iter().all(u8::is_ascii_digit);
    let (first, middle, last) = (b[0], &b[1..8], b[8]);

    // letter + 7 digits + letter
    (first.is_ascii_alphabetic() && digits(middle) && last.is_ascii_alphabetic())
        // 8 digits + letter
        || (first.is_ascii_digit() && digits(middle) && last.is_ascii_alphabetic())
        // letter + 8 digits
        || (first.is_ascii_alphabetic() && digits(middle) && last.is_ascii_digit())
}

/// Two-decimal amount, rounded half away from zero: `21` → `"21.00"`.
pub fn amount(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// `DD-MM-YYYY`.
pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_default()
}

/// Parse a `DD-MM-YYYY` leaf back into a date.
pub fn parse_date(value: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(value, "%d-%m-%Y").map_err(|_| FormatError::Code {
        kind: "DD-MM-YYYY date",
        value: value.to_string(),
    })
}

/// `S` / `N`.
pub fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "S".to_string(),
        Some(false) => "N".to_string(),
        None => String::new(),
    }
}

/// Generation timestamp in RFC 3339 UTC with milliseconds,
/// e.g. `2024-03-18T12:00:00.000Z`.
pub fn timestamp(value: Option<DateTime<Utc>>) -> Result<String, FormatError> {
    let text = value.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true));
    bounded(text.as_deref(), max_len::TIMESTAMP)
}

/// Two-digit regime key (`ClaveRegimen`).
pub fn regime_key(value: Option<&str>) -> Result<String, FormatError> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    if value.len() == 2 && value.bytes().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(FormatError::Code {
            kind: "regime key",
            value: value.to_string(),
        })
    }
}

/// ISO 3166-1 alpha-2 country code (`CodigoPais`).
pub fn country(value: Option<&str>) -> Result<String, FormatError> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    if super::countries::is_iso_country(value) {
        Ok(value.to_string())
    } else {
        Err(FormatError::Code {
            kind: "ISO 3166-1 country code",
            value: value.to_string(),
        })
    }
}
