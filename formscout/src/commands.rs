use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("formscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("formscout")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Enable debug logging (RUST_LOG takes precedence)")
                .required(false),
        )
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about("Runs the HTTP API used by the dashboard")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to listen on (default: 0.0.0.0:3000, env FORMSCOUT_BIND)"),
                )
                .arg(
                    arg!(--"autofill-url" <URL>)
                        .required(false)
                        .help(
                            "Autofill backend endpoint (default: http://localhost:5000/autofill, \
                        env FORMSCOUT_AUTOFILL_URL)",
                        ),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Outbound request timeout in seconds, 0 for none (env FORMSCOUT_TIMEOUT)"),
                ),
        )
        .subcommand(
            command!("forms")
                .about("Extracts the forms found on a single page")
                .arg(
                    arg!(<URL>)
                        .required(true)
                        .help("Page to inspect; https:// is assumed when no scheme is given"),
                )
                .arg(
                    arg!(-t --"type" <MODE>)
                        .required(false)
                        .help("Output shape: legacy, domains or detailed")
                        .value_parser(["legacy", "domains", "detailed"])
                        .default_value("detailed"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds, 0 for none")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                ),
        )
        .subcommand(
            command!("links")
                .about("Lists the internal and external links found on a single page")
                .arg(
                    arg!(<URL>)
                        .required(true)
                        .help("Page to inspect; https:// is assumed when no scheme is given"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds, 0 for none")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                ),
        )
}
