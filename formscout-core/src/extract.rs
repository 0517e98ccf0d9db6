use formscout_scanner::{
    FormExtraction, FormRecord, LinkExtraction, LinkRecord, ScanError, Scanner,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Response shape requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Flat `page#id` link list
    Legacy,
    /// Unique submission origins only
    Domains,
    /// Full per-form records plus domains
    #[default]
    Detailed,
}

impl ExtractionMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Some(ExtractionMode::Legacy),
            "domains" => Some(ExtractionMode::Domains),
            "detailed" => Some(ExtractionMode::Detailed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Legacy => "legacy",
            ExtractionMode::Domains => "domains",
            ExtractionMode::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExtractionResponse {
    Legacy {
        forms: Vec<String>,
        total_forms: usize,
    },
    Domains {
        domains: Vec<String>,
        total_domains: usize,
    },
    Detailed {
        forms: Vec<FormRecord>,
        domains: Vec<String>,
        total_forms: usize,
        total_domains: usize,
    },
}

/// Project an extraction into the requested response shape
pub fn shape_extraction(extraction: &FormExtraction, mode: ExtractionMode) -> ExtractionResponse {
    match mode {
        ExtractionMode::Legacy => {
            let forms = extraction.form_links();
            ExtractionResponse::Legacy {
                total_forms: forms.len(),
                forms,
            }
        }
        ExtractionMode::Domains => ExtractionResponse::Domains {
            domains: extraction.domains.clone(),
            total_domains: extraction.domains.len(),
        },
        ExtractionMode::Detailed => ExtractionResponse::Detailed {
            forms: extraction.forms.clone(),
            domains: extraction.domains.clone(),
            total_forms: extraction.forms.len(),
            total_domains: extraction.domains.len(),
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinksResponse {
    pub internal_links: Vec<LinkRecord>,
    pub external_links: Vec<LinkRecord>,
    pub total: usize,
    pub status: &'static str,
}

impl From<LinkExtraction> for LinksResponse {
    fn from(extraction: LinkExtraction) -> Self {
        Self {
            total: extraction.total(),
            internal_links: extraction.internal_links,
            external_links: extraction.external_links,
            status: "success",
        }
    }
}

/// Options for a one-shot extraction
pub struct ExtractOptions {
    pub url: String,
    pub show_progress: bool,
}

fn spinner(show: bool, message: String) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Some(pb)
}

/// Run a form extraction, showing a spinner while the page is fetched
pub async fn execute_extraction(
    scanner: &Scanner,
    options: ExtractOptions,
) -> Result<FormExtraction, ScanError> {
    let ExtractOptions { url, show_progress } = options;
    let progress = spinner(show_progress, format!("Extracting forms from {}...", url));

    let result = scanner.scan_forms(&url).await;
    debug!("Extraction of {} finished, ok={}", url, result.is_ok());

    if let Some(pb) = progress {
        match &result {
            Ok(extraction) => pb.finish_with_message(format!(
                "Extraction complete! {} forms found",
                extraction.forms.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}

/// Run a link extraction, showing a spinner while the page is fetched
pub async fn execute_link_scan(
    scanner: &Scanner,
    options: ExtractOptions,
) -> Result<LinkExtraction, ScanError> {
    let ExtractOptions { url, show_progress } = options;
    let progress = spinner(show_progress, format!("Extracting links from {}...", url));

    let result = scanner.scan_links(&url).await;

    if let Some(pb) = progress {
        match &result {
            Ok(extraction) => pb.finish_with_message(format!(
                "Link scan complete! {} links found",
                extraction.total()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
