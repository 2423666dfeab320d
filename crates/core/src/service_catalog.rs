//! Service catalog rules and the default catalog.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;

/// Titles are URL-safe slugs.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

/// Maximum accepted service name length (characters).
pub const MAX_NAME_LENGTH: usize = 200;

/// Catalog inserted by the bootstrap seeder into an empty store, as
/// `(name, title)` pairs in display order.
pub const DEFAULT_SERVICES: &[(&str, &str)] = &[
    ("ISO 27001 Certification", "iso27001certification"),
    ("Mobile Application Testing", "mobileapplicationtesting"),
    ("Phishing Simulation", "phishingsimulation"),
    ("Red Team Assessment", "redteamassessment"),
    ("Secure Code Review", "securecodereview"),
    ("Silver Subscription", "silversubscription"),
    ("Vulnerability Assessment", "vulnerabilityassessment"),
    ("API Penetration Testing", "apipenetrationtesting"),
    ("Bronze Subscription", "bronzesubscription"),
    ("Cloud Assessment", "cloudassessment"),
    ("Cyber Awareness", "cyberawareness"),
    ("Cyber Essential", "cyberessential"),
    ("Cyber Essentials Plus", "cyberessentialsplus"),
    ("Gold Subscription", "goldsubscription"),
    ("Infrastructure Testing", "infrastructuretesting"),
    ("Test & Authorization order form", "testauthorization"),
    ("Web Application Penetration Testing", "wapt"),
];

/// Derive a title slug from a display name: lower-cased ASCII alphanumerics
/// with everything else dropped.
pub fn derive_title(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Validate a single catalog entry.
pub fn validate_service(name: &str, title: &str, display_order: i32) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Service name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Service name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    if !TITLE_RE.is_match(title) {
        return Err(CoreError::Validation(format!(
            "Service title '{title}' must contain only lowercase letters, digits, and '-'"
        )));
    }
    if display_order < 0 {
        return Err(CoreError::Validation(format!(
            "Service '{name}' has a negative display order"
        )));
    }
    Ok(())
}

/// Reject a bulk payload that mentions the same id twice.
pub fn validate_unique_ids<I>(ids: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = Option<DbId>>,
{
    let mut seen = HashSet::new();
    for id in ids.into_iter().flatten() {
        if !seen.insert(id) {
            return Err(CoreError::Validation(format!(
                "Service id {id} appears more than once"
            )));
        }
    }
    Ok(())
}
