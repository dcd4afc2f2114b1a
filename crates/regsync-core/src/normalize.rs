//! Upstream error normalization
//!
//! Registrar error strings are terse codes. Known ones are replaced with a
//! message saying what actually happened; anything else passes through.

use regex::Regex;
use std::sync::LazyLock;

/// Ordered (pattern, replacement) pairs; the first match wins
static KNOWN_ERRORS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"FO405", "Domain is in Status PENDING => no changes can be made!"),
        (
            r"Order rejected because of '.*?' order '.*?' on same object",
            "After contact/owner-updates it can take some minutes before another change can be performed!",
        ),
        (
            r"Partner (.*?) blocked",
            "The monthly account-balance has exceeded a maximum threshold! \
             You need to transfer some money to the registrar to unblock your account!",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, message)| Regex::new(pattern).ok().map(|re| (re, message)))
    .collect()
});

/// Replace recognized error strings, keeping order and unknown strings
pub fn normalize(errors: Vec<String>) -> Vec<String> {
    errors.into_iter().map(normalize_one).collect()
}

fn normalize_one(error: String) -> String {
    KNOWN_ERRORS
        .iter()
        .find(|(re, _)| re.is_match(&error))
        .map(|(_, message)| (*message).to_string())
        .unwrap_or(error)
}
