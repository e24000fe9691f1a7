use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .init();
}

/// Worker count for the counting pool: explicit value, else CPUs capped at 8.
pub fn resolve_workers(workers: Option<usize>) -> usize {
    workers.unwrap_or_else(|| {
        let cpu_count = num_cpus::get();
        std::cmp::min(cpu_count, 8)
    })
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.top == 0 {
        anyhow::bail!("--top must be greater than 0");
    }

    if args.timeout_secs == 0 {
        anyhow::bail!("--timeout-secs must be greater than 0");
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use clap::Parser;

    #[test]
    fn test_validate_args() {
        let ok = Args::try_parse_from(["ecfr-analyzer"]).unwrap();
        assert!(validate_args(&ok).is_ok());

        for flags in [["--top", "0"], ["--workers", "0"], ["--timeout-secs", "0"]] {
            let args = Args::try_parse_from(["ecfr-analyzer", flags[0], flags[1]]).unwrap();
            assert!(validate_args(&args).is_err(), "{:?} should be rejected", flags);
        }
    }

    #[test]
    fn test_resolve_workers() {
        assert_eq!(resolve_workers(Some(3)), 3);
        let default = resolve_workers(None);
        assert!((1..=8).contains(&default));
    }
}
