pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "whois-pivot")]
#[command(about = "Discover related domains through historical and reverse WHOIS records")]
pub struct CliConfig {
    /// Seed domain(s) to start the discovery from
    #[arg(required = true)]
    pub domains: Vec<String>,

    /// Whoxy API key (overrides the config file)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the result files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Registrar list, one name per line
    #[arg(long)]
    pub registrars: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable debug output")]
    pub debug: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies the command line overrides to the values from the config file.
    pub fn apply_to(&self, settings: settings::Settings) -> settings::Settings {
        settings
            .with_api_key(self.api_key.clone())
            .with_output_path(self.output_dir.clone())
            .with_timeout(self.timeout)
            .with_registrars_file(self.registrars.clone())
    }
}
