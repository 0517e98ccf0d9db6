pub mod extract;
pub mod report;
pub mod summary;

pub use extract::{
    ExtractOptions, ExtractionMode, ExtractionResponse, LinksResponse, execute_extraction,
    execute_link_scan, shape_extraction,
};
pub use summary::FormSummary;

use colored::Colorize;

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "formscout".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("{}", "form and link discovery for web pages".dimmed());
    eprintln!();
}
