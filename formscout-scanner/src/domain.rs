// URL normalization and origin helpers shared by the form and link extractors

use crate::error::{Result, ScanError};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;
use url::{Host, Url};

/// Prepend `https://` to a target that carries no http(s) scheme
pub fn normalize_target_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidUrl("URL is required".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{}", trimmed))
    }
}

/// Normalize a user-supplied target and parse it, returning both forms.
///
/// The string form is kept verbatim for `page#id` links; the parsed form is
/// the base for resolving relative URLs.
pub fn parse_target(input: &str) -> Result<(String, Url)> {
    let normalized = normalize_target_url(input)?;
    let parsed = Url::parse(&normalized)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", normalized, e)))?;

    if parsed.host_str().is_none() {
        return Err(ScanError::InvalidUrl(format!("{}: missing host", normalized)));
    }

    Ok((normalized, parsed))
}

/// Resolve a form `action` attribute against the page it was found on.
///
/// Empty actions submit to the page itself. Anything that cannot be joined, or
/// that resolves to a non-http(s) scheme such as `javascript:`, falls back to
/// the page URL.
pub fn resolve_action(page_url: &Url, action: &str) -> Url {
    let action = action.trim();
    if action.is_empty() {
        return page_url.clone();
    }

    match page_url.join(action) {
        Ok(resolved) if is_http(&resolved) => resolved,
        Ok(resolved) => {
            warn!(
                "Form action '{}' on {} resolved to non-http URL {}, using page URL",
                action, page_url, resolved
            );
            page_url.clone()
        }
        Err(e) => {
            warn!(
                "Could not resolve form action '{}' against {}: {}, using page URL",
                action, page_url, e
            );
            page_url.clone()
        }
    }
}

pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// `scheme://host[:port]` of a URL; the port only appears when it is not the scheme default
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Group origins by their top-level label.
///
/// Unparseable entries land under `invalid`, IP hosts under `ip`, single-label
/// hosts under `unknown`. Order within a group is input order.
pub fn group_domains_by_tld(domains: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for domain in domains {
        let key = match Url::parse(domain) {
            Ok(parsed) => match parsed.host() {
                Some(Host::Domain(host)) => match host.rsplit_once('.') {
                    Some((_, tld)) if !tld.is_empty() => tld.to_ascii_lowercase(),
                    _ => "unknown".to_string(),
                },
                Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => "ip".to_string(),
                None => "invalid".to_string(),
            },
            Err(_) => "invalid".to_string(),
        };
        grouped.entry(key).or_default().push(domain.clone());
    }

    grouped
}

/// Insertion-ordered set of origins
#[derive(Debug, Default, Clone)]
pub struct DomainSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the domain was already present
    pub fn insert(&mut self, domain: &str) -> bool {
        if self.seen.contains(domain) {
            return false;
        }
        self.seen.insert(domain.to_string());
        self.ordered.push(domain.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
