use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Canonical flight code, e.g. "BA679".
///
/// Two codes refer to the same flight iff their canonical forms are
/// byte-equal, so every comparison in the system goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightCode(String);

impl FlightCode {
    /// Parse free-form input into a canonical flight code.
    ///
    /// Fails with `InvalidCode` when nothing survives normalization.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let canonical = Self::normalize(raw);
        if canonical.is_empty() {
            return Err(CoreError::InvalidCode);
        }
        Ok(Self(canonical))
    }

    /// Normalize a scanned or typed flight identifier.
    ///
    /// Trims, uppercases and strips everything outside `[A-Z0-9]` (barcode
    /// scanners inject separators and control characters), then folds
    /// leading zeros out of the numeric suffix: "ba0679" and "BA679" are
    /// the same flight. Inputs that are not letters-then-digits (pure
    /// numeric, pure alphabetic) are kept as cleaned. Idempotent.
    pub fn normalize(raw: &str) -> String {
        let cleaned: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();

        if cleaned.is_empty() {
            return cleaned;
        }

        let digits_start = match cleaned.find(|c: char| c.is_ascii_digit()) {
            Some(idx) if idx > 0 => idx,
            // No letter prefix, or no digits at all: already canonical.
            _ => return cleaned,
        };

        let (prefix, rest) = cleaned.split_at(digits_start);
        if !rest.chars().all(|c| c.is_ascii_digit()) {
            // Mixed tail like "BA6A7" does not fit letters-then-digits.
            return cleaned;
        }

        let digits = rest.trim_start_matches('0');
        // An all-zero run still names a flight number: keep a single zero.
        let digits = if digits.is_empty() { "0" } else { digits };

        format!("{}{}", prefix, digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for FlightCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
