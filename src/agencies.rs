use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

// Include default agency list at compile time
const DEFAULT_AGENCIES_BYTES: &[u8] = include_bytes!("../default_agencies.txt");

pub const DEFAULT_AGENCIES_FILE: &str = "agencies.txt";

/// Parses one agency name per line, skipping blanks and `#` comments.
pub fn parse_agency_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn default_agency_names() -> Result<Vec<String>> {
    let default_content = std::str::from_utf8(DEFAULT_AGENCIES_BYTES)
        .context("Failed to decode embedded default agency list")?;
    Ok(parse_agency_list(default_content))
}

pub fn load_agency_names(agency_file_path: Option<&Path>) -> Result<Vec<String>> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "agency_loading",
        "Starting agency list loading"
    );

    let mut agencies = Vec::new();

    if let Some(path) = agency_file_path {
        info!(action = "load", component = "agency_file", file_path = ?path, "Loading agencies from specified file");
        if !path.exists() {
            anyhow::bail!("Agency file not found: {:?}", path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read agency file {:?}", path))?;
        agencies = parse_agency_list(&content);
        if agencies.is_empty() {
            warn!(action = "parse", component = "agency_file", file_path = ?path, "Agency file lists no agencies");
        }
        info!(action = "loaded", component = "agency_file", agency_count = agencies.len(), file_path = ?path, "Loaded agencies from file");
    } else {
        // Try default file
        let default_file = Path::new(DEFAULT_AGENCIES_FILE);
        if default_file.exists() {
            info!(action = "load", component = "default_agency_file", file_path = ?default_file, "Loading agencies from default file");
            match fs::read_to_string(default_file) {
                Ok(content) => agencies = parse_agency_list(&content),
                Err(e) => {
                    warn!(action = "load", component = "default_agency_file", error = %e, "Failed to read default agency file")
                }
            }
            info!(action = "loaded", component = "default_agency_file", agency_count = agencies.len(), file_path = ?default_file, "Loaded agencies from default file");
        }

        // If no agencies loaded, use embedded defaults
        if agencies.is_empty() {
            info!(
                action = "load",
                component = "embedded_agencies",
                "Using embedded default agencies"
            );
            agencies = default_agency_names()?;
        }
    }

    info!(
        action = "complete",
        component = "agency_loading",
        agency_count = agencies.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Agency list ready"
    );
    Ok(agencies)
}

pub fn init_default_agencies() -> Result<()> {
    init_default_agencies_at(Path::new(DEFAULT_AGENCIES_FILE))
}

pub fn init_default_agencies_at(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            path.display()
        );
    }

    let default_content = std::str::from_utf8(DEFAULT_AGENCIES_BYTES)
        .context("Failed to decode embedded default agency list")?;

    fs::write(path, default_content)?;
    println!("Created {} with default agencies", path.display());

    Ok(())
}

/// Counts non-overlapping occurrences of `needle` in already-lowercased text.
pub(crate) fn count_occurrences(lowered_text: &str, needle: &str) -> u64 {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    lowered_text.matches(needle.as_str()).count() as u64
}

/// Case-insensitive substring count of each agency name in `text`.
///
/// Names are matched as plain strings, not whole words: "NARA" is also
/// counted inside "NARAS", and overlapping names are each counted.
pub fn count_agency_mentions(text: &str, agency_names: &[String]) -> BTreeMap<String, u64> {
    if agency_names.is_empty() {
        return BTreeMap::new();
    }

    let lowered = text.to_lowercase();
    agency_names
        .iter()
        .map(|name| (name.clone(), count_occurrences(&lowered, name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_multi_word_agency() {
        let text = "The Department of Energy and the department of energy both appear.";
        let counts = count_agency_mentions(text, &names(&["Department of Energy"]));
        assert_eq!(counts["Department of Energy"], 2);
    }

    #[test]
    fn test_substring_inside_longer_word_is_counted() {
        let counts = count_agency_mentions("NARA and NARAS records", &names(&["NARA"]));
        assert_eq!(counts["NARA"], 2);
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
    }

    #[test]
    fn test_zero_counts_are_reported() {
        let counts = count_agency_mentions("nothing relevant", &names(&["OMB", "OPM"]));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["OMB"], 0);
        assert_eq!(counts["OPM"], 0);
    }

    #[test]
    fn test_empty_agency_list() {
        assert!(count_agency_mentions("OMB OMB", &[]).is_empty());
    }

    #[test]
    fn test_blank_agency_name_counts_zero() {
        let counts = count_agency_mentions("OMB", &names(&[""]));
        assert_eq!(counts[""], 0);
    }

    #[test]
    fn test_parse_agency_list_skips_comments() {
        let parsed = parse_agency_list("# header\n\n  OMB  \nDepartment of Energy\n# tail\n");
        assert_eq!(parsed, names(&["OMB", "Department of Energy"]));
    }

    #[test]
    fn test_default_agencies() {
        assert_eq!(
            default_agency_names().unwrap(),
            names(&["NCPC", "OMB", "OPM", "NARA", "CIO"])
        );
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        fs::write(&path, "EPA\nFDA\n").unwrap();
        assert_eq!(load_agency_names(Some(&path)).unwrap(), names(&["EPA", "FDA"]));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(load_agency_names(Some(&path)).is_err());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_AGENCIES_FILE);
        init_default_agencies_at(&path).unwrap();
        assert_eq!(
            parse_agency_list(&fs::read_to_string(&path).unwrap()),
            default_agency_names().unwrap()
        );
        assert!(init_default_agencies_at(&path).is_err());
    }
}
