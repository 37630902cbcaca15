//! Command-line interface for geolens.
//!
//! Besides the window, the binary offers a one-shot `lookup` subcommand that
//! performs a single lookup and prints the highlighted result to stdout,
//! handy for scripts and for checking a service deployment without a
//! display.

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::highlight::{self, SpanKind};

/// geolens - Desktop IP geolocation lookup widget
#[derive(Parser)]
#[command(name = "geolens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Look up this IP address as soon as the window opens
    #[arg(long, value_name = "IP")]
    pub ip: Option<String>,

    /// Base URL of the lookup service (overrides the config file)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Exit after the specified number of seconds
    #[arg(long, value_name = "SECONDS")]
    pub exit_after: Option<f64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up an IP address and print the result without opening a window
    Lookup {
        /// IP address to look up
        ip: String,

        /// Print the plain JSON without colors
        #[arg(long)]
        plain: bool,

        /// Base URL of the lookup service (overrides the config file)
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// IP address to look up immediately after startup
    pub ip: Option<String>,
    /// Service base URL override
    pub endpoint: Option<String>,
    /// Exit after this many seconds
    pub exit_after: Option<f64>,
    /// Log level for the `log` facade
    pub log_level: Option<log::LevelFilter>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal application startup, with runtime options
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Lookup {
            ip,
            plain,
            endpoint,
        }) => {
            let code = match run_lookup(&ip, plain, endpoint.as_deref()) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("geolens: error: {e:#}");
                    1
                }
            };
            CliResult::Exit(code)
        }
        None => {
            let options = RuntimeOptions {
                ip: cli.ip,
                endpoint: cli.endpoint,
                exit_after: cli.exit_after,
                log_level: cli.log_level.and_then(|level| level.parse().ok()),
            };
            CliResult::Continue(options)
        }
    }
}

/// Perform one blocking lookup and print the result.
fn run_lookup(ip: &str, plain: bool, endpoint_override: Option<&str>) -> anyhow::Result<()> {
    let ip = ip.trim();
    if ip.is_empty() {
        anyhow::bail!("no IP address given");
    }

    let endpoint = match endpoint_override {
        Some(endpoint) => endpoint.to_string(),
        None => crate::config::Config::load()?.endpoint,
    };

    let agent = crate::http::agent();
    let result = crate::lookup::fetch_lookup(&agent, &endpoint, ip)?;
    let doc = highlight::highlight_value(result.payload());

    if plain {
        println!("{}", doc.plain_text());
    } else {
        for span in doc.spans() {
            print!("{}", paint_span(span.kind, &span.text));
        }
        println!();

        // Human-friendly summary line under the JSON.
        if let Some(record) = result.record()
            && let Some(code) = record.code
        {
            let place = [record.city, record.country]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            if !place.is_empty() {
                println!("{}", format!("{place} ({code})").bright_black());
            }
        }
    }
    Ok(())
}

/// ANSI styling for one span, mirroring the window's color scheme.
fn paint_span(kind: SpanKind, text: &str) -> colored::ColoredString {
    match kind {
        SpanKind::Key => text.cyan(),
        SpanKind::Str => text.green(),
        SpanKind::Num => text.yellow(),
        SpanKind::Bool => text.magenta(),
        SpanKind::Null => text.bright_black(),
        SpanKind::Punct => text.normal(),
    }
}
