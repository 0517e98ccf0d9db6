use commands::command_argument_builder;
use formscout::handlers::{handle_forms, handle_links, handle_serve, init_tracing};
use formscout_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the help
        let _ = command_argument_builder().print_help();
        return;
    }

    match chosen_command.subcommand() {
        Some(("serve", primary_command)) => {
            init_tracing(verbose, "info");
            handle_serve(primary_command).await
        }
        Some(("forms", primary_command)) => {
            init_tracing(verbose, "warn");
            handle_forms(primary_command, quiet).await
        }
        Some(("links", primary_command)) => {
            init_tracing(verbose, "warn");
            handle_links(primary_command, quiet).await
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
