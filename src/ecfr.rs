//! eCFR Versioner API client and XML flattening.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://www.ecfr.gov/api/versioner/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of snapshot text, keyed by date and title.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Plain text of `title` as of `date`.
    async fn fetch_snapshot(&self, date: NaiveDate, title: u32) -> Result<String, AppError>;

    /// Most recent date a snapshot of `title` is available for.
    async fn latest_snapshot_date(&self, title: u32) -> Result<NaiveDate, AppError>;
}

#[derive(Debug, Deserialize)]
struct ContentVersion {
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionsPayload {
    Wrapped { content_versions: Vec<ContentVersion> },
    Bare(Vec<ContentVersion>),
}

impl VersionsPayload {
    fn latest(self) -> Option<NaiveDate> {
        let versions = match self {
            VersionsPayload::Wrapped { content_versions } => content_versions,
            VersionsPayload::Bare(versions) => versions,
        };
        versions.into_iter().map(|version| version.date).max()
    }
}

/// Flattens XML into the space-joined text of its elements.
#[derive(Debug, Clone)]
pub struct XmlFlattener {
    markup: Regex,
    entity: Regex,
}

impl XmlFlattener {
    pub fn new() -> Result<Self> {
        Ok(Self {
            markup: Regex::new(r#"(?s)<!\[CDATA\[(.*?)\]\]>|<!--.*?-->|<(?:[^>"']|"[^"]*"|'[^']*')*>"#)
                .context("Failed to compile XML markup pattern")?,
            entity: Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);")
                .context("Failed to compile XML entity pattern")?,
        })
    }

    pub fn flatten(&self, xml: &str) -> String {
        let mut fragments: Vec<String> = Vec::new();
        let mut last_end = 0;

        for captures in self.markup.captures_iter(xml) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            self.push_fragment(&mut fragments, &self.decode_entities(&xml[last_end..whole.start()]));
            if let Some(cdata) = captures.get(1) {
                self.push_fragment(&mut fragments, cdata.as_str());
            }
            last_end = whole.end();
        }
        self.push_fragment(&mut fragments, &self.decode_entities(&xml[last_end..]));

        fragments.join(" ")
    }

    fn push_fragment(&self, fragments: &mut Vec<String>, fragment: &str) {
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            fragments.push(fragment.to_string());
        }
    }

    fn decode_entities(&self, text: &str) -> String {
        self.entity
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                let decoded = match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => {
                        let code = if let Some(hex) = name
                            .strip_prefix("#x")
                            .or_else(|| name.strip_prefix("#X"))
                        {
                            u32::from_str_radix(hex, 16).ok()
                        } else {
                            name[1..].parse::<u32>().ok()
                        };
                        code.and_then(char::from_u32)
                    }
                };
                decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
            })
            .into_owned()
    }
}

/// HTTP client for the eCFR Versioner service.
#[derive(Debug, Clone)]
pub struct EcfrClient {
    client: reqwest::Client,
    base_url: Url,
    flattener: XmlFlattener,
}

impl EcfrClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid eCFR base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("eCFR base URL cannot carry a path: {}", base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ecfr-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            flattener: XmlFlattener::new()?,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, AppError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            warn!(action = "fetch", component = "ecfr_client", url = %url, status = %response.status(), "Upstream returned error status");
        }
        Ok(response.error_for_status()?)
    }
}

#[async_trait]
impl SnapshotSource for EcfrClient {
    async fn fetch_snapshot(&self, date: NaiveDate, title: u32) -> Result<String, AppError> {
        let start_time = Instant::now();
        let date_segment = date.format("%Y-%m-%d").to_string();
        let title_segment = format!("title-{}.xml", title);
        let url = self.endpoint(&["full", &date_segment, &title_segment])?;
        info!(action = "start", component = "snapshot_fetch", url = %url, "Fetching snapshot");

        let xml = self.get(url).await?.text().await?;
        let text = self.flattener.flatten(&xml);

        info!(
            action = "complete",
            component = "snapshot_fetch",
            title,
            date = %date,
            xml_bytes = xml.len(),
            text_bytes = text.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Snapshot fetched"
        );
        Ok(text)
    }

    async fn latest_snapshot_date(&self, title: u32) -> Result<NaiveDate, AppError> {
        let start_time = Instant::now();
        let title_segment = format!("title-{}.json", title);
        let url = self.endpoint(&["versions", &title_segment])?;
        info!(action = "start", component = "version_lookup", url = %url, "Looking up latest snapshot date");

        let payload: VersionsPayload = self.get(url).await?.json().await?;
        let latest = payload.latest().ok_or_else(|| {
            AppError::UpstreamUnavailable(format!("No version data found for title {}", title))
        })?;

        info!(
            action = "complete",
            component = "version_lookup",
            title,
            latest_date = %latest,
            duration_ms = start_time.elapsed().as_millis(),
            "Latest snapshot date resolved"
        );
        Ok(latest)
    }
}
