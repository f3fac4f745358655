//! Compile command-line proxy specifications into a passage
//! configuration.
//!
//! Each `-L` flag is one service to listen on and each `-F` flag is one
//! node of the forwarding chain, both in the compact URL form understood
//! by [`passage_spec`].  The compiled configuration graph is printed to
//! stdout; the process exits nonzero on the first malformed spec.

#![warn(missing_docs)]

use std::env;

use anyhow::{bail, Result};
use argh::FromArgs;
use passage_config::{ApiConfig, Config, LogConfig, MetricsConfig, ProfilingConfig};
use passage_registry::BuiltinIndex;
use tracing::{info, Level};

#[derive(FromArgs, Debug, Clone)]
/// Compile proxy specifications into a configuration document.
///
/// Example: passage -L socks5://:1080 -F relay+wss://exit.example.com:443
struct Args {
    /// a service to listen on, as a spec URL (repeatable)
    #[argh(option, short = 'L', long = "listen")]
    listen: Vec<String>,

    /// a chain node to forward through, as a spec URL (repeatable)
    #[argh(option, short = 'F', long = "forward")]
    forward: Vec<String>,

    /// log at debug level
    #[argh(switch, short = 'D', long = "debug")]
    debug: bool,

    /// output format for the compiled configuration
    #[argh(option, short = 'O', long = "output", default = "String::from(\"json\")")]
    output: String,
}

/// Fold the environment-derived singleton settings into a configuration.
///
/// These are opportunistic: an unset variable leaves the corresponding
/// section absent.
fn apply_env_settings(cfg: &mut Config) {
    if let Ok(addr) = env::var("PASSAGE_PROFILING") {
        if !addr.is_empty() {
            cfg.profiling = Some(ProfilingConfig { addr });
        }
    }
    if let Ok(addr) = env::var("PASSAGE_METRICS") {
        if !addr.is_empty() {
            cfg.metrics = Some(MetricsConfig {
                addr,
                ..Default::default()
            });
        }
    }
    if let Ok(level) = env::var("PASSAGE_LOGGER_LEVEL") {
        if !level.is_empty() {
            cfg.log = Some(LogConfig {
                level,
                ..Default::default()
            });
        }
    }
    if let Ok(addr) = env::var("PASSAGE_API") {
        if !addr.is_empty() {
            cfg.api = Some(ApiConfig {
                addr,
                ..Default::default()
            });
        }
    }
}

/// Pick the log level: `-D` wins, then `PASSAGE_LOGGER_LEVEL`, then info.
fn log_level(args: &Args) -> Level {
    if args.debug {
        return Level::DEBUG;
    }
    env::var("PASSAGE_LOGGER_LEVEL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Level::INFO)
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_max_level(log_level(&args))
        .with_writer(std::io::stderr)
        .init();

    if args.listen.is_empty() && args.forward.is_empty() {
        info!("Nothing to do: no -L service and no -F node specified.");
        return Ok(());
    }

    let mut cfg = passage_spec::build_config(&args.listen, &args.forward, &BuiltinIndex)?;
    apply_env_settings(&mut cfg);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&cfg)?),
        other => bail!("unsupported output format {:?}", other),
    }

    Ok(())
}
