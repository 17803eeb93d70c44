use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitecheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitecheck")
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("audit")
                .about(
                    "Crawl a single site, run every SEO and security check over the pages \
                found, and print a scored report.",
                )
                .arg(
                    arg!(<URL>)
                        .required(true)
                        .help("The URL of the site to audit")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM>)
                        .required(false)
                        .help("Maximum number of pages to fetch")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("25"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(-r --"rate" <REQ_PER_SEC>)
                        .required(false)
                        .help("Request rate ceiling; robots.txt crawl-delay still wins when slower")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("4.0"),
                )
                .arg(
                    arg!(--"user-agent" <STRING>)
                        .required(false)
                        .help("Override the User-Agent header sent with every request"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
}
