//! Canonical identifiers derived from display names.
//!
//! Every character and location id is expected to be the slug of its name.
//! The upkeep pass rewrites any model-supplied id that drifts from this rule.

/// Derive the canonical slug for a display name.
///
/// Spaces become underscores, anything outside `[A-Za-z0-9_]` is dropped,
/// runs of underscores collapse to one, and the result is lowercased.
/// Input made only of punctuation yields an empty slug.
///
/// # Example
/// ```
/// use worldsim_domain::slugify;
///
/// assert_eq!(slugify("Dr. Aria O'Neil"), "dr_aria_oneil");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = if ch == ' ' { '_' } else { ch };
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if ch == '_' && slug.ends_with('_') {
            continue;
        }
        slug.push(ch.to_ascii_lowercase());
    }
    slug
}
