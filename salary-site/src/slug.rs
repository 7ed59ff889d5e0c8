//! URL slugs for city and neighborhood names.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*?\)\s*").expect("parenthetical pattern is valid"));

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

/// Derives the URL slug for a display name.
///
/// The name is lowercased and parenthetical asides are removed together
/// with the whitespace around them, so an aside in the middle of a name
/// joins its neighbors ("Soho (West End) North" is `sohonorth`). Every run
/// of characters outside `[a-z0-9]` (spaces, punctuation, accented letters)
/// becomes one hyphen, and hyphens are trimmed from both ends. A name made
/// only of such characters yields an empty slug.
///
/// ```
/// use salary_site::slug::slugify;
///
/// assert_eq!(slugify("New York"), "new-york");
/// assert_eq!(slugify("Washington (DC)"), "washington");
/// assert_eq!(slugify("São Paulo"), "s-o-paulo");
/// ```
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let without_asides = PARENTHETICAL.replace_all(&lower, "");
    SEPARATORS
        .replace_all(&without_asides, "-")
        .trim_matches('-')
        .to_string()
}
