//! Slug and Email Validation
//!
//! Normalization and grammar checks shared by the services. Both grammars are
//! deliberately simple and must stay stable for compatibility:
//!
//! - Slug: `^[a-z0-9]+(?:-[a-z0-9]+)*$` after trim + lowercase
//! - Email: `^[^\s@]+@[^\s@]+\.[^\s@]+$` after trim + lowercase - a loose
//!   `local@domain.tld` shape check, not full RFC grammar

use regex::Regex;
use std::sync::OnceLock;

fn slug_regex() -> &'static Regex {
    static SLUG_RE: OnceLock<Regex> = OnceLock::new();
    SLUG_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Normalize a raw slug: trim whitespace, lowercase
///
/// Idempotent: normalizing an already-normalized slug returns it unchanged.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check a normalized slug against the token grammar
pub fn is_valid_slug(slug: &str) -> bool {
    slug_regex().is_match(slug)
}

/// Normalize a raw email: trim whitespace, lowercase
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check a normalized email against the loose shape grammar
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Derive a slug from a title
///
/// ASCII alphanumeric runs are lowercased and joined by single hyphens;
/// everything else collapses into the separators. The result always matches
/// the slug grammar, or is empty when the title has no usable characters.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !slug.is_empty() && !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
