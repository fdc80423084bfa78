//! Recipient address parsing and validation.
//!
//! Addresses arrive as a single string delimited by `,` or `;`. Every token
//! is classified individually so callers can report exactly which entries
//! were rejected and why. Validation is structural only; no DNS or mailbox
//! checks are performed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Separators accepted between addresses in a recipient list.
pub const ADDRESS_SEPARATORS: &[char] = &[',', ';'];

/// Final structural check applied after the step-by-step rules pass.
///
/// Local part is alphanumeric with optional inner `._%-`, domain labels are
/// alphanumeric with optional inner `.-`, and the TLD is at least two letters.
pub const ADDRESS_PATTERN: &str =
    r"^[a-zA-Z0-9]([a-zA-Z0-9._%-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$";

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADDRESS_PATTERN).expect("valid regex"));

/// Human-readable rejection reasons, one per rule.
pub mod reasons {
    pub const EMPTY_OR_NULL: &str = "empty or null address";
    pub const MISSING_AT: &str = "missing '@'";
    pub const ENDS_WITH_AT: &str = "incomplete, ends with '@'";
    pub const STARTS_WITH_AT: &str = "invalid format, starts with '@'";
    pub const AT_COUNT: &str = "multiple or missing '@'";
    pub const INVALID_STRUCTURE: &str = "invalid structure";
    pub const MISSING_LOCAL_PART: &str = "missing local part";
    pub const MISSING_DOMAIN: &str = "missing domain";
    pub const DOMAIN_MISSING_DOT: &str = "domain missing dot";
    pub const DOMAIN_ENDS_WITH_DOT: &str = "domain ends with dot";
    pub const FAILS_REGEX: &str = "fails format regex";
    pub const EMPTY_TOKEN: &str = "empty address";
    pub const NO_ADDRESSES: &str = "no addresses provided";
    pub const VALID: &str = "valid address";
}

// ---------------------------------------------------------------------------
// EmailAddressValidation
// ---------------------------------------------------------------------------

/// Outcome of validating a single address token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddressValidation {
    /// The trimmed address as supplied by the caller.
    pub address: String,
    pub is_valid: bool,
    /// Why the address was rejected, or [`reasons::VALID`].
    pub reason: String,
}

impl EmailAddressValidation {
    fn valid(address: &str) -> Self {
        Self {
            address: address.to_string(),
            is_valid: true,
            reason: reasons::VALID.to_string(),
        }
    }

    fn invalid(address: &str, reason: &str) -> Self {
        Self {
            address: address.to_string(),
            is_valid: false,
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Single-address validation
// ---------------------------------------------------------------------------

/// Validate one address. Rules are applied in order; the first failure wins.
pub fn validate_address(address: &str) -> EmailAddressValidation {
    let address = address.trim();
    let result = check_address(address);
    if !result.is_valid {
        tracing::warn!(address, reason = %result.reason, "Rejected email address");
    }
    result
}

fn check_address(address: &str) -> EmailAddressValidation {
    let reject = |reason: &str| EmailAddressValidation::invalid(address, reason);

    if address.is_empty() {
        return reject(reasons::EMPTY_OR_NULL);
    }
    if !address.contains('@') {
        return reject(reasons::MISSING_AT);
    }
    if address.ends_with('@') {
        return reject(reasons::ENDS_WITH_AT);
    }
    if address.starts_with('@') {
        return reject(reasons::STARTS_WITH_AT);
    }
    if address.matches('@').count() != 1 {
        return reject(reasons::AT_COUNT);
    }

    let parts: Vec<&str> = address.split('@').collect();
    let [local, domain] = parts.as_slice() else {
        return reject(reasons::INVALID_STRUCTURE);
    };

    if local.is_empty() {
        return reject(reasons::MISSING_LOCAL_PART);
    }
    if domain.is_empty() {
        return reject(reasons::MISSING_DOMAIN);
    }
    if !domain.contains('.') {
        return reject(reasons::DOMAIN_MISSING_DOT);
    }
    if domain.ends_with('.') {
        return reject(reasons::DOMAIN_ENDS_WITH_DOT);
    }
    if !ADDRESS_RE.is_match(address) {
        return reject(reasons::FAILS_REGEX);
    }

    EmailAddressValidation::valid(address)
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Validate every token of a delimited recipient list, preserving order.
///
/// Empty tokens (e.g. `"a@b.com,,c@d.com"`) are reported as invalid rather
/// than dropped. A wholly blank input yields a single invalid entry.
pub fn parse_address_list(raw: &str) -> Vec<EmailAddressValidation> {
    if raw.trim().is_empty() {
        return vec![EmailAddressValidation::invalid("", reasons::NO_ADDRESSES)];
    }

    raw.split(ADDRESS_SEPARATORS)
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                EmailAddressValidation::invalid(token, reasons::EMPTY_TOKEN)
            } else {
                validate_address(token)
            }
        })
        .collect()
}

/// Return only the addresses that validate, in input order.
///
/// Used to build the outbound message; never for validation decisions.
pub fn filter_valid_addresses(raw: &str) -> Vec<String> {
    raw.split(ADDRESS_SEPARATORS)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| check_address(token).is_valid)
        .map(str::to_string)
        .collect()
}

/// Whether every entry in `results` is valid.
pub fn all_valid(results: &[EmailAddressValidation]) -> bool {
    results.iter().all(|r| r.is_valid)
}

// ---------------------------------------------------------------------------
// AddressValidationFault
// ---------------------------------------------------------------------------

/// One or more recipient addresses failed structural validation.
///
/// Carries the complete per-address result list, valid entries included, so
/// the caller can show the full picture.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AddressValidationFault {
    pub message: String,
    pub results: Vec<EmailAddressValidation>,
}

impl AddressValidationFault {
    /// Build a fault whose message summarises the invalid entries.
    pub fn new(results: Vec<EmailAddressValidation>) -> Self {
        let message = summarize_invalid(&results);
        Self { message, results }
    }

    /// Build a fault with an explicit message (e.g. for the CC field).
    pub fn with_message(message: impl Into<String>, results: Vec<EmailAddressValidation>) -> Self {
        Self {
            message: message.into(),
            results,
        }
    }

    /// Only the rejected entries.
    pub fn invalid(&self) -> Vec<&EmailAddressValidation> {
        self.results.iter().filter(|r| !r.is_valid).collect()
    }

    /// Rejection reasons of the invalid entries, in order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.invalid().into_iter().map(|r| r.reason.as_str()).collect()
    }
}

fn summarize_invalid(results: &[EmailAddressValidation]) -> String {
    let invalid: Vec<_> = results.iter().filter(|r| !r.is_valid).collect();
    match invalid.as_slice() {
        [] => "email address validation failed".to_string(),
        [single] => format!("invalid email address '{}': {}", single.address, single.reason),
        many => {
            let listed: Vec<String> = many
                .iter()
                .map(|r| format!("'{}' ({})", r.address, r.reason))
                .collect();
            format!("invalid email addresses found: {}", listed.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
