//! URL slugs for categories.

use regex::Regex;
use std::sync::OnceLock;

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Anything that is not a letter, mark or digit separates words.
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{M}\p{N}]+").expect("static slug regex"))
}

/// Lowercases `name` and joins its words with `-`. Non-Latin scripts are
/// kept as they are; a name with no word characters becomes `category`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = separators().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "category".to_string()
    } else {
        slug.to_string()
    }
}

/// Picks the first of `base`, `base-2`, `base-3`, … for which `taken`
/// returns `false`.
pub fn unique_slug<F, E>(base: &str, mut taken: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<bool, E>,
{
    if !taken(base)? {
        return Ok(base.to_string());
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}
