use dagscan::cli::{handle_scan, CliArgs};
use dagscan::util::{init_logging, parse_level, LoggingConfig};
use dagscan::{DagscanConfig, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();

    let mut config = match DagscanConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply_to(&mut config);

    init_logging(logging_config(&args, &config));

    debug!("dagscan v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_scan(&args, &config);

    std::process::exit(exit_code);
}

fn logging_config(args: &CliArgs, config: &DagscanConfig) -> LoggingConfig {
    let level = if args.log_level.is_some() {
        parse_level(&config.log_level)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    let use_json = args.log_json
        || env::var("DAGSCAN_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

    LoggingConfig {
        use_json,
        ..LoggingConfig::with_level(level)
    }
}
