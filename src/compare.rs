use std::collections::BTreeMap;

use crate::stats::{AnalysisResult, ComparisonResult};

/// Differences from snapshot `a` to snapshot `b`.
///
/// Agencies missing on either side count as zero. Top words are not diffed.
pub fn compare(a: &AnalysisResult, b: &AnalysisResult) -> ComparisonResult {
    let word_count_delta = signed(b.word_count) - signed(a.word_count);

    let mut agency_deltas = BTreeMap::new();
    for name in a.agencies.keys().chain(b.agencies.keys()) {
        if agency_deltas.contains_key(name) {
            continue;
        }
        let old_count = a.agencies.get(name).copied().unwrap_or(0);
        let new_count = b.agencies.get(name).copied().unwrap_or(0);
        agency_deltas.insert(name.clone(), signed(new_count) - signed(old_count));
    }

    ComparisonResult {
        word_count_delta,
        agency_deltas,
    }
}

fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
