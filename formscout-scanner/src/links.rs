use crate::domain::is_http;
use crate::error::{Result, ScanError};
use crate::result::{LinkExtraction, LinkRecord};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

const MAX_LINK_TEXT: usize = 100;

/// Collect anchors from `html`, split by whether they stay on the page's host
pub fn extract_links(html: &str, page_label: &str, page_url: &Url) -> Result<LinkExtraction> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| ScanError::ParseError(format!("invalid selector 'a[href]': {}", e)))?;

    let base_host = page_url.host_str().unwrap_or_default();
    let mut extraction = LinkExtraction::new(page_label.to_string());
    let mut seen_internal: HashSet<String> = HashSet::new();
    let mut seen_external: HashSet<String> = HashSet::new();

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute) = resolve_href(page_url, href) else {
            continue;
        };

        let text: String = element
            .text()
            .collect::<String>()
            .trim()
            .chars()
            .take(MAX_LINK_TEXT)
            .collect();
        let title = element.value().attr("title").unwrap_or_default().to_string();
        let url = absolute.to_string();

        if absolute.host_str() == Some(base_host) {
            if seen_internal.insert(url.clone()) {
                debug!("Internal link: {}", url);
                extraction.internal_links.push(LinkRecord { url, text, title });
            }
        } else if seen_external.insert(url.clone()) {
            debug!("External link: {}", url);
            extraction.external_links.push(LinkRecord { url, text, title });
        }
    }

    Ok(extraction)
}

fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    // Skip empty, in-page anchors, javascript: and mailto:
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    if !is_http(&resolved) {
        return None;
    }
    Some(resolved)
}
