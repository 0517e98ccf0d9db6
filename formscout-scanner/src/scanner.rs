use crate::domain::parse_target;
use crate::error::{Result, ScanError};
use crate::forms::extract_forms;
use crate::links::extract_links;
use crate::result::{FormExtraction, LinkExtraction};
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub user_agent: String,
    /// Whole-request timeout in seconds; 0 leaves requests unbounded
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_redirects: 5,
        }
    }
}

/// Fetches single pages and runs the extractors over them.
///
/// Holds no per-scan state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Scanner {
    client: Client,
    config: ScannerConfig,
}

impl Scanner {
    pub fn new() -> Result<Self> {
        Self::with_config(ScannerConfig::default())
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::with_config(ScannerConfig {
            timeout_secs,
            ..ScannerConfig::default()
        })
    }

    pub fn with_config(config: ScannerConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if config.timeout_secs > 0 {
            builder = builder
                .timeout(Duration::from_secs(config.timeout_secs))
                .connect_timeout(Duration::from_secs(config.timeout_secs.div_ceil(2)));
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// GET a page and return its body; any non-2xx status is an error
    pub async fn fetch_page(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes in {:?})",
            url,
            body.len(),
            start.elapsed()
        );
        Ok(body)
    }

    /// Fetch `target` (scheme optional) and extract its deduplicated forms
    pub async fn scan_forms(&self, target: &str) -> Result<FormExtraction> {
        let (label, page_url) = parse_target(target)?;
        info!("Extracting forms from {}", label);

        let html = self.fetch_page(&page_url).await?;
        let extraction = extract_forms(&html, &label, &page_url)?;

        info!(
            "Found {} forms across {} domains on {} ({} duplicates skipped)",
            extraction.forms.len(),
            extraction.domains.len(),
            label,
            extraction.duplicates_skipped
        );
        Ok(extraction)
    }

    /// Fetch `target` (scheme optional) and split its anchors into internal and external
    pub async fn scan_links(&self, target: &str) -> Result<LinkExtraction> {
        let (label, page_url) = parse_target(target)?;
        info!("Extracting links from {}", label);

        let html = self.fetch_page(&page_url).await?;
        let extraction = extract_links(&html, &label, &page_url)?;

        info!(
            "Found {} internal and {} external links on {}",
            extraction.internal_links.len(),
            extraction.external_links.len(),
            label
        );
        Ok(extraction)
    }
}
