// Human-readable and JSON reports for one-shot extractions

use crate::extract::{ExtractionMode, ExtractionResponse, shape_extraction};
use crate::summary::FormSummary;
use colored::Colorize;
use formscout_scanner::domain::group_domains_by_tld;
use formscout_scanner::{FormExtraction, FormRecord, LinkExtraction, LinkRecord};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

fn method_badge(method: &str) -> String {
    let padded = format!("{:<6}", method);
    match method {
        "GET" => padded.green().to_string(),
        "POST" => padded.yellow().to_string(),
        _ => padded.cyan().to_string(),
    }
}

/// Text report for a form extraction, honouring the requested output mode
pub fn generate_forms_report(extraction: &FormExtraction, mode: ExtractionMode) -> String {
    let summary = FormSummary::from_records(&extraction.forms);

    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Page: {}\n", extraction.page_url));
    report.push_str(&format!("  Total forms: {}\n", summary.total_forms));
    report.push_str(&format!("  Total domains: {}\n", extraction.domains.len()));
    if extraction.duplicates_skipped > 0 {
        report.push_str(&format!(
            "  Duplicates skipped: {}\n",
            extraction.duplicates_skipped
        ));
    }
    if mode == ExtractionMode::Detailed && summary.total_forms > 0 {
        let by_method: Vec<String> = summary
            .forms_by_method
            .iter()
            .map(|(method, count)| format!("{} {}", method, count))
            .collect();
        report.push_str(&format!("  By method: {}\n", by_method.join(", ")));
        report.push_str(&format!(
            "  Average fields per form: {:.1}\n",
            summary.average_fields_per_form
        ));
        if summary.forms_without_fields > 0 {
            report.push_str(&format!(
                "  Forms without fields: {}\n",
                summary.forms_without_fields
            ));
        }
        if summary.forms_with_file_upload > 0 {
            report.push_str(&format!(
                "  Forms with file upload: {}\n",
                summary.forms_with_file_upload
            ));
        }
        if summary.forms_with_required_fields > 0 {
            report.push_str(&format!(
                "  Forms with required fields: {}\n",
                summary.forms_with_required_fields
            ));
        }
    }

    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");

    match shape_extraction(extraction, mode) {
        ExtractionResponse::Legacy { forms, .. } => {
            report.push_str(&format!("## {}\n", "Forms".bold()));
            for link in forms {
                report.push_str(&format!("  {}\n", link));
            }
        }
        ExtractionResponse::Domains { domains, .. } => push_domains(&mut report, &domains),
        ExtractionResponse::Detailed { forms, domains, .. } => {
            report.push_str(&format!("## {}\n", "Forms".bold()));
            for form in &forms {
                report.push_str(&format!(
                    "  {} #{}  {}\n",
                    method_badge(&form.method),
                    form.id,
                    form.action
                ));
                report.push_str(&format!(
                    "         inputs {}  textareas {}  selects {}  total {}\n",
                    form.input_count, form.textarea_count, form.select_count, form.total_fields
                ));
                push_form_details(&mut report, form);
            }
            report.push('\n');
            push_domains(&mut report, &domains);
        }
    }

    report
}

fn push_form_details(report: &mut String, form: &FormRecord) {
    let mut flags = vec![format!("enctype {}", form.enctype)];
    if form.has_file_upload {
        flags.push("file upload".to_string());
    }
    if form.has_required_fields {
        flags.push("required fields".to_string());
    }
    report.push_str(&format!("         {}\n", flags.join("  ")));

    if !form.fields.is_empty() {
        let fields: Vec<String> = form
            .fields
            .iter()
            .map(|f| {
                let name = if f.name.is_empty() { &f.id } else { &f.name };
                let marker = if f.required { "*" } else { "" };
                format!("{}{} ({})", name, marker, f.field_type)
            })
            .collect();
        report.push_str(&format!("         fields: {}\n", fields.join(", ")));
    }
}

/// Domains grouped under their top-level label
fn push_domains(report: &mut String, domains: &[String]) {
    report.push_str(&format!("## {}\n", "Domains".bold()));
    for (tld, group) in group_domains_by_tld(domains) {
        let heading = match tld.as_str() {
            "invalid" | "unknown" | "ip" => tld.clone(),
            _ => format!(".{}", tld),
        };
        report.push_str(&format!("  {} ({})\n", heading, group.len()));
        for domain in group {
            report.push_str(&format!("    {}\n", domain));
        }
    }
}

fn push_links(report: &mut String, heading: &str, links: &[LinkRecord]) {
    report.push_str(&format!("## {} ({})\n", heading.bold(), links.len()));
    for link in links {
        if link.text.is_empty() {
            report.push_str(&format!("  {}\n", link.url));
        } else {
            report.push_str(&format!("  {} {}\n", link.url, link.text.dimmed()));
        }
    }
    report.push('\n');
}

pub fn generate_links_report(extraction: &LinkExtraction) -> String {
    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Page: {}\n", extraction.page_url));
    report.push_str(&format!(
        "  Internal links: {}\n",
        extraction.internal_links.len()
    ));
    report.push_str(&format!(
        "  External links: {}\n",
        extraction.external_links.len()
    ));
    report.push_str(&format!("  Total links: {}\n", extraction.total()));
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");

    push_links(&mut report, "Internal", &extraction.internal_links);
    push_links(&mut report, "External", &extraction.external_links);

    report
}

/// Pretty JSON of any response body, wrapped with generator metadata
pub fn generate_json_report<T: Serialize>(
    page_url: &str,
    body: &T,
) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "metadata": {
            "generator": "formscout",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "page_url": page_url,
        },
        "result": body,
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
