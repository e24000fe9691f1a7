pub mod agencies;
pub mod analyzer;
pub mod args;
pub mod cache;
pub mod compare;
pub mod ecfr;
pub mod error;
pub mod keywords;
pub mod routes;
pub mod stats;
pub mod tokenizer;
pub mod utils;

pub use agencies::{count_agency_mentions, init_default_agencies, load_agency_names};
pub use analyzer::Analyzer;
pub use args::Args;
pub use cache::ResultCache;
pub use compare::compare;
pub use ecfr::{EcfrClient, SnapshotSource};
pub use error::AppError;
pub use keywords::{keyword_frequencies, parse_keyword_list, KeywordFrequencies};
pub use routes::{build_router, AppState};
pub use stats::{AnalysisResult, ComparisonResult, Snapshot};
pub use tokenizer::{count_words, top_n, WordCounts};
