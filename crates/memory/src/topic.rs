//! Topic vocabulary — which model a customer is talking about.
//!
//! Matching is case-insensitive substring containment, first entry in list
//! order wins, and a few common misspellings map onto one canonical name.

/// Model names recognized in messages, in match order.
pub const VOCABULARY: &[&str] = &[
    "beat", "bit", "vario", "scoopy", "scopy", "genio", "pcx", "adv", "stylo", "forza", "cbr",
    "cb150", "sonic", "gtr", "supra", "revo", "crf", "em1", "icon", "cuv",
];

/// Spelling → canonical topic.
pub const ALIASES: &[(&str, &str)] = &[("bit", "beat"), ("scopy", "scoopy")];

fn canonical(entry: &'static str) -> &'static str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == entry)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(entry)
}

/// The first vocabulary entry named in `text`, in canonical form.
pub fn detect_topic(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    VOCABULARY
        .iter()
        .find(|entry| lower.contains(*entry))
        .map(|entry| canonical(entry))
}

/// Whether `text` names any model itself.
pub fn mentions_topic(text: &str) -> bool {
    detect_topic(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_in_list_order_wins() {
        // "vario" appears first in the text, but "beat" is earlier in the list
        assert_eq!(detect_topic("Vario atau Beat yang lebih irit?"), Some("beat"));
        assert_eq!(detect_topic("harga PCX 160 berapa"), Some("pcx"));
    }

    #[test]
    fn aliases_are_canonicalized() {
        assert_eq!(detect_topic("mau tanya motor bit"), Some("beat"));
        assert_eq!(detect_topic("SCOPY warna merah"), Some("scoopy"));
    }

    #[test]
    fn no_entity_in_follow_up() {
        assert_eq!(detect_topic("dp nya berapa kak?"), None);
        assert!(!mentions_topic("warnanya apa aja?"));
        assert!(mentions_topic("kalau genio?"));
    }
}
