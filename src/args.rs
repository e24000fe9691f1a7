use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::analyzer::DEFAULT_TOP_WORDS;
use crate::ecfr::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "ecfr-analyzer",
    about = "Serve word, agency and keyword statistics for eCFR title snapshots",
    version,
    long_about = None
)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "ECFR_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Root of the eCFR Versioner API
    #[arg(long, env = "ECFR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "ECFR_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Number of top words to report per snapshot
    #[arg(short, long, env = "ECFR_TOP_WORDS", default_value_t = DEFAULT_TOP_WORDS)]
    pub top: usize,

    /// Path to custom agency list file
    #[arg(short, long, env = "ECFR_AGENCIES")]
    pub agencies: Option<PathBuf>,

    /// Number of worker threads used for word counting
    #[arg(short, long, env = "ECFR_WORKERS")]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize agencies.txt with the default agency list
    #[arg(long)]
    pub init: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ecfr-analyzer"]).unwrap();
        assert_eq!(args.bind, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
        assert_eq!(args.timeout_secs, 30);
        assert_eq!(args.top, 10);
        assert!(args.agencies.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "ecfr-analyzer",
            "--bind",
            "0.0.0.0:8080",
            "-t",
            "20",
            "-a",
            "agencies.txt",
            "-w",
            "2",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.bind.port(), 8080);
        assert_eq!(args.top, 20);
        assert_eq!(args.agencies, Some(PathBuf::from("agencies.txt")));
        assert_eq!(args.workers, Some(2));
        assert!(args.verbose);
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        assert!(Args::try_parse_from(["ecfr-analyzer", "--bind", "localhost"]).is_err());
    }
}
