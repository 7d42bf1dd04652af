//! Lowercase, strip non-letters, delete blacklisted phrases.

use regex::Regex;
use std::sync::OnceLock;

fn non_letter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z]").expect("non-letter regex is valid"))
}

/// Normalize `text` so it contains only lowercase ASCII letters and spaces.
///
/// Every non-letter character becomes exactly one space; runs are kept, not
/// collapsed. Blacklisted phrases are then deleted outright, so the words on
/// either side of a removed phrase are separated only by whatever spaces
/// surrounded it (and may join if there were none).
pub fn normalize<S: AsRef<str>>(text: &str, blacklist: &[S]) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = non_letter().replace_all(&lowered, " ").into_owned();
    for phrase in blacklist {
        let phrase = phrase.as_ref().to_lowercase();
        if phrase.is_empty() {
            continue;
        }
        cleaned = cleaned.replace(&phrase, "");
    }
    cleaned
}
