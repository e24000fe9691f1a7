use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::agencies::count_occurrences;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFrequencies {
    pub keywords: Vec<String>,
    pub frequencies: BTreeMap<String, u64>,
}

/// Splits a comma-separated keyword list.
///
/// Pieces are trimmed, empty pieces dropped, and case-insensitive duplicates
/// collapse onto the first spelling. A list with nothing usable yields an
/// empty vector rather than an error.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| seen.insert(keyword.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive, non-overlapping substring count of each keyword.
pub fn keyword_frequencies(text: &str, keywords: &[String]) -> KeywordFrequencies {
    if keywords.is_empty() {
        return KeywordFrequencies::default();
    }

    let lowered = text.to_lowercase();
    let frequencies = keywords
        .iter()
        .map(|keyword| (keyword.clone(), count_occurrences(&lowered, keyword)))
        .collect();

    KeywordFrequencies {
        keywords: keywords.to_vec(),
        frequencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_guidance_scenario() {
        let text = "The Department of Energy issued energy guidance on energy policy.";
        let result = keyword_frequencies(text, &parse_keyword_list("energy,guidance"));
        assert_eq!(result.keywords, vec!["energy", "guidance"]);
        assert_eq!(result.frequencies["energy"], 3);
        assert_eq!(result.frequencies["guidance"], 1);
    }

    #[test]
    fn test_matches_inside_longer_words() {
        let result = keyword_frequencies("nonenergy energy", &parse_keyword_list("energy"));
        assert_eq!(result.frequencies["energy"], 2);
    }

    #[test]
    fn test_parse_trims_and_drops_empty() {
        assert_eq!(
            parse_keyword_list(" privacy , ,records,, information "),
            vec!["privacy", "records", "information"]
        );
    }

    #[test]
    fn test_parse_dedups_case_insensitively() {
        assert_eq!(
            parse_keyword_list("Privacy,privacy,PRIVACY,records"),
            vec!["Privacy", "records"]
        );
    }

    #[test]
    fn test_empty_or_malformed_list_is_noop() {
        assert!(parse_keyword_list("").is_empty());
        assert!(parse_keyword_list(" , ,, ").is_empty());
        let result = keyword_frequencies("energy", &parse_keyword_list(",,"));
        assert_eq!(result, KeywordFrequencies::default());
    }

    #[test]
    fn test_keyword_key_keeps_original_spelling() {
        let result = keyword_frequencies("Privacy Act privacy", &parse_keyword_list("PRIVACY"));
        assert_eq!(result.frequencies["PRIVACY"], 2);
    }
}
