//! UPI identifier predicates shared by the rule table.
//!
//! A UPI address is `local-part@provider`. These checks are pure and total:
//! empty or malformed identifiers are classified, never rejected with an
//! error.

use regex::Regex;

/// Keywords that mark a local part as a throwaway or probe identity.
const SUSPICIOUS_KEYWORDS: [&str; 7] = ["test", "fake", "dummy", "fraud", "scam", "admin", "temp"];

/// Minimum local-part length accepted as plausible.
const MIN_LOCAL_LEN: usize = 3;

/// Fraction of digits in the local part above which it reads as machine
/// generated.
const NUMERIC_LOCAL_RATIO: f64 = 0.7;

/// Validates the `local-part@provider` shape of UPI addresses.
pub struct UpiValidator {
    format: Regex,
}

impl UpiValidator {
    pub fn new() -> Self {
        Self {
            format: Regex::new(r"^[a-zA-Z0-9.\-_]{3,}@[a-zA-Z]{3,}$").unwrap(),
        }
    }

    /// Whether the identifier matches the expected UPI address format.
    pub fn is_valid_format(&self, upi: &str) -> bool {
        self.format.is_match(upi)
    }
}

impl Default for UpiValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// The part of a UPI address before the first `@` (the whole string when
/// there is none).
pub fn local_part(upi: &str) -> &str {
    upi.split('@').next().unwrap_or(upi)
}

/// Suspicious-pattern check: absent identifiers, local parts shorter than
/// three characters, and throwaway keywords all count.
pub fn is_suspicious(upi: &str) -> bool {
    if upi.trim().is_empty() {
        return true;
    }

    let local = local_part(upi).to_lowercase();
    if local.chars().count() < MIN_LOCAL_LEN {
        return true;
    }

    SUSPICIOUS_KEYWORDS.iter().any(|k| local.contains(k))
}

/// Whether the local part is mostly digits (e.g. `9876543210@paytm`).
pub fn has_numeric_local(upi: &str) -> bool {
    let local = local_part(upi);
    let total = local.chars().count();
    if total == 0 {
        return false;
    }

    let digits = local.chars().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / total as f64 > NUMERIC_LOCAL_RATIO
}
