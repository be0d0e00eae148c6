//! Field validation and normalization rules.
//!
//! Each rule validates one transaction field independently. Two of them are
//! deliberately permissive: malformed currency and locale codes are ignored
//! rather than rejected, matching the gateway client behavior that existing
//! integrations rely on. Do not tighten them.

use crate::domain::method::MethodProfile;
use crate::error::{Result, TargetPayError};
use std::net::IpAddr;
use url::Url;

/// Maximum description length accepted by the gateway.
pub const DESCRIPTION_MAX_CHARS: usize = 32;

/// Parses a sub-account layout code (rtlo) from text.
///
/// The layout code is required on every outbound request. Non-numeric input
/// is rejected with the gateway's TP0001 error.
pub fn parse_layout_code(input: &str) -> Result<u32> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| TargetPayError::MissingLayoutCode(input.to_string()))
}

/// Parses an amount in cents from text.
pub fn parse_amount(input: &str) -> Result<u32> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| TargetPayError::InvalidAmount(input.to_string()))
}

/// Checks an amount in cents against the bounds of a method profile.
pub fn validate_amount(amount: u32, profile: &MethodProfile) -> Result<u32> {
    if amount < profile.minimum_amount {
        return Err(TargetPayError::AmountTooLow {
            amount,
            minimum: profile.minimum_amount,
        });
    }
    if amount > profile.maximum_amount {
        return Err(TargetPayError::AmountTooHigh {
            amount,
            maximum: profile.maximum_amount,
        });
    }
    Ok(amount)
}

/// Normalizes an ISO 4217 currency code: trimmed and upper-cased.
///
/// Returns `None` for anything that is not exactly three characters; the
/// field is then left unset and reads back as the "EUR" default.
pub fn normalize_currency(input: &str) -> Option<String> {
    let code = input.trim().to_uppercase();
    if code.chars().count() == 3 { Some(code) } else { None }
}

/// Normalizes an ISO 639 language code: trimmed and lower-cased.
///
/// Returns `None` for anything that is not exactly two characters.
pub fn normalize_language(input: &str) -> Option<String> {
    let code = input.trim().to_lowercase();
    if code.chars().count() == 2 { Some(code) } else { None }
}

/// Normalizes a payment description.
///
/// The gateway does not accept the euro sign, so it is substituted before
/// whitespace runs are collapsed and the result is trimmed and truncated to
/// 32 characters. Normalization is idempotent. An empty result is rejected.
pub fn normalize_description(input: &str) -> Result<String> {
    let substituted = input
        .replace("€ ", "EUR ")
        .replace(" €", " euro")
        .replace('€', " EUR ");
    let collapsed = substituted.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(DESCRIPTION_MAX_CHARS).collect();
    // Truncation can cut right after a word boundary and leave a trailing
    // space, which a second pass would collapse away.
    let trimmed = truncated.trim_end();
    if trimmed.is_empty() {
        Err(TargetPayError::EmptyDescription)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Checks that `input` is an absolute URL.
pub fn is_absolute_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Validates an IPv4 or IPv6 address.
pub fn validate_client_ip(input: &str) -> Result<String> {
    let trimmed = input.trim();
    trimmed
        .parse::<IpAddr>()
        .map(|_| trimmed.to_string())
        .map_err(|_| TargetPayError::InvalidClientIp(input.to_string()))
}

/// Checks the shape of an issuer id: exactly four ASCII digits.
///
/// Membership in the live issuer list is checked separately.
pub fn is_issuer_id_format(input: &str) -> bool {
    input.len() == 4 && input.bytes().all(|b| b.is_ascii_digit())
}
