use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Minimal English stopword list excluded from frequency tables.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "of", "to", "in", "a", "for", "on", "is", "that", "with", "by", "at", "an", "be",
    "are", "as", "or", "this",
];

pub fn default_stopwords() -> HashSet<String> {
    DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTally {
    pub count: u64,
    /// Token position of the first occurrence, used to break ties.
    pub first_seen: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    /// Every token in the text, stopwords included.
    pub total_tokens: u64,
    pub words: HashMap<String, WordTally>,
}

impl WordCounts {
    pub fn get(&self, word: &str) -> Option<u64> {
        self.words.get(word).map(|tally| tally.count)
    }

    pub fn counted_tokens(&self) -> u64 {
        self.words.values().map(|tally| tally.count).sum()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Runs of alphanumeric characters in already-lowercased text.
fn split_tokens(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

pub fn count_words(text: &str, stopwords: &HashSet<String>) -> WordCounts {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = split_tokens(&lowered).collect();

    let words = tokens
        .par_iter()
        .enumerate()
        .filter(|(_, token)| !stopwords.contains(**token))
        .fold(HashMap::new, |mut acc: HashMap<String, WordTally>, (pos, token)| {
            acc.entry((*token).to_string())
                .and_modify(|tally| {
                    tally.count += 1;
                    tally.first_seen = tally.first_seen.min(pos);
                })
                .or_insert(WordTally {
                    count: 1,
                    first_seen: pos,
                });
            acc
        })
        .reduce(HashMap::new, merge_tallies);

    WordCounts {
        total_tokens: tokens.len() as u64,
        words,
    }
}

fn merge_tallies(
    mut left: HashMap<String, WordTally>,
    right: HashMap<String, WordTally>,
) -> HashMap<String, WordTally> {
    if left.len() < right.len() {
        return merge_tallies(right, left);
    }
    for (word, tally) in right {
        left.entry(word)
            .and_modify(|existing| {
                existing.count += tally.count;
                existing.first_seen = existing.first_seen.min(tally.first_seen);
            })
            .or_insert(tally);
    }
    left
}

/// Highest-count entries first; equal counts keep source order.
pub fn top_n(counts: &WordCounts, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(&String, &WordTally)> = counts.words.iter().collect();
    ranked.sort_by(|a, b| {
        b.1.count
            .cmp(&a.1.count)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(word, tally)| (word.clone(), tally.count))
        .collect()
}
