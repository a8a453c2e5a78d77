/// Matching key for vocabulary lookups: lowercase, all whitespace removed.
///
/// Only used for comparisons. Callers keep the original text for display and
/// serial extraction.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
