//! Keyboard layout helper for ingredient search.
//!
//! Users often type a Russian ingredient name with the English layout active
//! ("vjkjrj" for "молоко"). Search matches both the raw needle and the needle
//! re-typed on the other layout.

const LATIN: &str = "qwertyuiop[]asdfghjkl;'zxcvbnm,./`";
const CYRILLIC: &str = "йцукенгшщзхъфывапролджэячсмитьбю.ё";

/// Lowercase `input` and map every key to the same key on the other layout
/// (QWERTY ↔ ЙЦУКЕН). Characters without a counterpart are kept as-is.
pub fn swap_keyboard_layout(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| {
            if let Some(idx) = LATIN.chars().position(|l| l == c) {
                CYRILLIC.chars().nth(idx).unwrap_or(c)
            } else if let Some(idx) = CYRILLIC.chars().position(|r| r == c) {
                LATIN.chars().nth(idx).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}
