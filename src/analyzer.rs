use anyhow::Result;
use std::collections::HashSet;
use std::time::Instant;
use tracing::debug;

use crate::agencies::{count_agency_mentions, default_agency_names};
use crate::stats::AnalysisResult;
use crate::tokenizer::{count_words, default_stopwords, top_n};

pub const DEFAULT_TOP_WORDS: usize = 10;

/// Computes word, agency and top-word statistics for snapshot text.
#[derive(Debug, Clone)]
pub struct Analyzer {
    agencies: Vec<String>,
    stopwords: HashSet<String>,
    top_words: usize,
}

impl Analyzer {
    pub fn new(agencies: Vec<String>, top_words: usize) -> Self {
        Self {
            agencies,
            stopwords: default_stopwords(),
            top_words,
        }
    }

    /// Analyzer over the embedded default agency list.
    pub fn with_default_agencies() -> Result<Self> {
        Ok(Self::new(default_agency_names()?, DEFAULT_TOP_WORDS))
    }

    pub fn with_stopwords(mut self, stopwords: HashSet<String>) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn agencies(&self) -> &[String] {
        &self.agencies
    }

    pub fn top_words(&self) -> usize {
        self.top_words
    }

    /// `word_count` is the raw token count, taken before stopwords are removed.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let start_time = Instant::now();

        let counts = count_words(text, &self.stopwords);
        let agencies = count_agency_mentions(text, &self.agencies);
        let top_words = top_n(&counts, self.top_words);

        debug!(
            action = "complete",
            component = "snapshot_analysis",
            word_count = counts.total_tokens,
            unique_words = counts.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Snapshot analysis completed"
        );

        AnalysisResult {
            word_count: counts.total_tokens,
            agencies,
            top_words,
        }
    }
}
