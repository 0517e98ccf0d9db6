use clap::ArgMatches;
use colored::Colorize;
use formscout_core::report::{
    ReportFormat, generate_forms_report, generate_json_report, generate_links_report, save_report,
};
use formscout_core::{
    ExtractOptions, ExtractionMode, LinksResponse, execute_extraction, execute_link_scan,
    shape_extraction,
};
use formscout_scanner::{FormExtraction, LinkExtraction, Scanner};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigOverrides, ServerConfig};
use crate::server;

/// Install the global subscriber; RUST_LOG wins over the default level
pub fn init_tracing(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so report output on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand `~` in a user supplied output path
pub fn expand_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn render_forms_output(
    extraction: &FormExtraction,
    mode: ExtractionMode,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_forms_report(extraction, mode)),
        ReportFormat::Json => generate_json_report(
            &extraction.page_url,
            &shape_extraction(extraction, mode),
        ),
    }
}

pub fn render_links_output(
    extraction: LinkExtraction,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_links_report(&extraction)),
        ReportFormat::Json => {
            let page_url = extraction.page_url.clone();
            generate_json_report(&page_url, &LinksResponse::from(extraction))
        }
    }
}

/// Print the report, or save it when an output path was given
pub fn emit_report(content: &str, output: Option<&str>) -> std::io::Result<Option<PathBuf>> {
    match output {
        Some(path) => {
            let path = expand_output_path(path);
            save_report(content, &path)?;
            Ok(Some(path))
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(None)
        }
    }
}

pub fn serve_overrides(sub_matches: &ArgMatches) -> ConfigOverrides {
    ConfigOverrides {
        bind: sub_matches.get_one::<String>("bind").cloned(),
        autofill_backend: sub_matches.get_one::<String>("autofill-url").cloned(),
        request_timeout_secs: sub_matches.get_one::<String>("timeout").cloned(),
    }
}

pub async fn handle_serve(sub_matches: &ArgMatches) {
    let config = ServerConfig::default()
        .apply(&ConfigOverrides::from_env())
        .and_then(|config| config.apply(&serve_overrides(sub_matches)));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "\n📋 Serving on {} (autofill backend: {})\n",
        config.bind.to_string().bright_cyan(),
        config.autofill_backend
    );

    if let Err(e) = server::serve(config).await {
        eprintln!("✗ Server failed: {}", e);
        std::process::exit(1);
    }
}

fn report_format(sub_matches: &ArgMatches) -> ReportFormat {
    sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

fn build_scanner(sub_matches: &ArgMatches) -> Scanner {
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap_or(&30);
    match Scanner::with_timeout(timeout) {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("✗ Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    }
}

fn finish_output(content: &str, output: Option<&str>) {
    match emit_report(content, output) {
        Ok(Some(path)) => println!("✓ Report saved to {}", display_path(&path)),
        Ok(None) => {}
        Err(e) => {
            eprintln!("✗ Failed to write report: {}", e);
            std::process::exit(1);
        }
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string().bright_cyan().to_string()
}

pub async fn handle_forms(sub_matches: &ArgMatches, quiet: bool) {
    let url = sub_matches.get_one::<String>("URL").cloned().unwrap_or_default();
    let mode = sub_matches
        .get_one::<String>("type")
        .and_then(|t| ExtractionMode::from_str(t))
        .unwrap_or_default();
    let format = report_format(sub_matches);
    let output = sub_matches.get_one::<String>("output").map(String::as_str);

    let scanner = build_scanner(sub_matches);
    let options = ExtractOptions {
        url,
        show_progress: !quiet,
    };

    let extraction = match execute_extraction(&scanner, options).await {
        Ok(extraction) => extraction,
        Err(e) => {
            eprintln!("✗ Form extraction failed: {}", e);
            std::process::exit(1);
        }
    };

    match render_forms_output(&extraction, mode, format) {
        Ok(content) => finish_output(&content, output),
        Err(e) => {
            eprintln!("✗ Failed to render report: {}", e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_links(sub_matches: &ArgMatches, quiet: bool) {
    let url = sub_matches.get_one::<String>("URL").cloned().unwrap_or_default();
    let format = report_format(sub_matches);
    let output = sub_matches.get_one::<String>("output").map(String::as_str);

    let scanner = build_scanner(sub_matches);
    let options = ExtractOptions {
        url,
        show_progress: !quiet,
    };

    let extraction = match execute_link_scan(&scanner, options).await {
        Ok(extraction) => extraction,
        Err(e) => {
            eprintln!("✗ Analysis failed: {}", e);
            std::process::exit(1);
        }
    };

    match render_links_output(extraction, format) {
        Ok(content) => finish_output(&content, output),
        Err(e) => {
            eprintln!("✗ Failed to render report: {}", e);
            std::process::exit(1);
        }
    }
}
