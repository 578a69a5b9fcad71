//! Title normalization into significant keywords.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Function words dropped after normalization. English and Portuguese share
/// one list; there is no language detection. Only tokens longer than two
/// characters can reach this filter, so shorter words are not listed.
const STOP_WORDS: &[&str] = &[
    // English
    "the", "and", "for", "with", "from", "into", "onto", "about", "after", "before",
    "over", "under", "than", "then", "that", "this", "these", "those", "there", "here",
    "are", "was", "were", "been", "being", "has", "have", "had", "having", "will",
    "would", "can", "could", "should", "shall", "may", "might", "must", "does", "did",
    "doing", "not", "but", "nor", "yet", "its", "his", "her", "hers", "him", "she",
    "they", "them", "their", "theirs", "you", "your", "yours", "our", "ours", "who",
    "whom", "whose", "what", "which", "when", "where", "why", "how", "all", "any",
    "some", "more", "most", "much", "many", "such", "also", "just", "only", "very",
    "out", "off", "via", "per", "says", "said", "amid", "against", "between", "during",
    "while", "because", "through", "upon",
    // Portuguese
    "que", "para", "com", "uma", "umas", "uns", "por", "pelo", "pela", "pelos", "pelas",
    "dos", "das", "nos", "nas", "num", "numa", "aos", "não", "nao", "mais", "menos",
    "como", "mas", "foi", "foram", "ser", "ter", "tem", "têm", "são", "sao", "está",
    "esta", "estão", "este", "esse", "essa", "isso", "isto", "aquele", "aquela", "sobre",
    "entre", "após", "apos", "até", "ate", "sem", "seu", "sua", "seus", "suas", "ele",
    "ela", "eles", "elas", "quem", "qual", "quais", "quando", "onde", "porque", "porquê",
    "pode", "podem", "vai", "vão", "muito", "muita", "também", "tambem", "desde", "ainda",
    "diz", "contra", "durante",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

fn quote_dash_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"['"`´‘’‚‛“”„‟«»‐‑‒–—―−-]"#).expect("quote/dash pattern is valid")
    })
}

fn outside_alphabet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^a-z0-9àáâãäèéêëìíîïòóôõöùúûüçñ\s]").expect("alphabet pattern is valid")
    })
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Lowercase, blank out quotes/dashes and anything outside the alphabet,
/// collapse whitespace and trim. The order of these steps is fixed.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let unquoted = quote_dash_regex().replace_all(&lowered, " ");
    let filtered = outside_alphabet_regex().replace_all(&unquoted, " ");
    whitespace_regex()
        .replace_all(&filtered, " ")
        .trim()
        .to_string()
}

/// Significant keywords of `text`, in input order, duplicates kept.
///
/// Tokens of two characters or fewer and stop words are dropped. Never
/// fails: garbage input simply yields an empty sequence.
pub fn significant_words(text: &str) -> Vec<String> {
    let stop = stop_words();
    normalize(text)
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .filter(|token| !stop.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_steps() {
        assert_eq!(
            normalize("  Breaking:   U.S. “Tariffs” — China's   reply!! "),
            "breaking u s tariffs china s reply"
        );
    }

    #[test]
    fn test_normalize_keeps_accented_latin() {
        assert_eq!(normalize("Eleições em São Paulo"), "eleições em são paulo");
        assert_eq!(normalize("Niño ÇA"), "niño ça");
    }

    #[test]
    fn test_significant_words_filters_short_and_stop_words() {
        let words = significant_words("The President and the Congress agree on a new budget");
        assert_eq!(words, vec!["president", "congress", "agree", "new", "budget"]);
    }

    #[test]
    fn test_significant_words_portuguese_stop_words() {
        let words = significant_words("Governo anuncia medidas para a economia após crise");
        assert_eq!(words, vec!["governo", "anuncia", "medidas", "economia", "crise"]);
    }

    #[test]
    fn test_significant_words_preserves_order_and_duplicates() {
        let words = significant_words("rust rust cargo rust");
        assert_eq!(words, vec!["rust", "rust", "cargo", "rust"]);
    }

    #[test]
    fn test_significant_words_dashes_split_tokens() {
        let words = significant_words("Self-driving cars–robotaxis");
        assert_eq!(words, vec!["self", "driving", "cars", "robotaxis"]);
    }

    #[test]
    fn test_digits_are_kept() {
        let words = significant_words("iPhone 2026 launch 5G");
        assert_eq!(words, vec!["iphone", "2026", "launch"]);
    }

    #[test]
    fn test_garbage_input_degrades_to_empty() {
        assert!(significant_words("").is_empty());
        assert!(significant_words("!!! ??? ... 🚀🚀").is_empty());
        assert!(significant_words("a an of to").is_empty());
    }
}
