use crate::infrastructure::DEFAULT_SERVICE_URL;
use clap::Parser;
use std::path::PathBuf;

/// Terminal loan calculator.
///
/// Collects loan parameters, validates them, and asks the remote loan
/// service for the monthly payment and amortization breakdown.
#[derive(Debug, Clone, Parser)]
#[command(name = "loancalc", version, about)]
pub struct Config {
    /// Base URL of the loan calculation service.
    #[arg(long, env = "LOANCALC_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,

    /// File that receives log output.
    #[arg(long, env = "LOANCALC_LOG_FILE", default_value = "loancalc.log")]
    pub log_file: PathBuf,

    /// Log level or filter directive; `RUST_LOG` takes precedence.
    #[arg(long, env = "LOANCALC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
