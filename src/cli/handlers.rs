use super::commands::CliArgs;
use super::output::OutputFormatter;
use crate::config::DagscanConfig;
use crate::scan::{FileScanner, ScanConfig};
use std::io::{self, Write};
use tracing::{debug, error, info};

/// Runs a scan for the parsed command line and returns the process exit code.
pub fn handle_scan(args: &CliArgs, config: &DagscanConfig) -> i32 {
    info!("Starting DAG artifact scan");
    debug!("Configuration: {:?}", config);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your DAGSCAN_* environment variables and command-line arguments.");
        return 1;
    }

    if args.show_config {
        eprint!("{}", config);
    }

    let scanner = FileScanner::new(ScanConfig::from(config));
    let report = match scanner.scan_directory(&args.root) {
        Ok(report) => report,
        Err(e) => {
            error!("Scan failed: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format(&report) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    if let Some(output_file) = &args.output {
        match std::fs::write(output_file, &output) {
            Ok(_) => {
                info!("Output written to: {}", output_file.display());
            }
            Err(e) => {
                error!("Failed to write output to file: {}", e);
                return 1;
            }
        }
    } else {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
            error!("Failed to write output: {}", e);
            return 1;
        }
    }

    0
}
