use crate::api::{ApiConfig, DEFAULT_TIMEOUT};
use crate::columns;
use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Get the default directory for saved exports
/// Uses the platform download directory:
/// - Linux: ~/Downloads (XDG_DOWNLOAD_DIR)
/// - macOS: ~/Downloads
/// - Windows: {FOLDERID_Downloads}
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "weather-export")]
#[command(about = "Export weather pipeline columns to CSV, with a terminal preview")]
#[command(version)]
pub struct CliArgs {
    /// Name of the export; also the saved file name (default: "unknown")
    #[arg(long, short = 'n', value_name = "NAME", default_value = "")]
    pub name: String,

    /// Columns to export, as "<table>:<field>" ids (default: all columns)
    /// Can repeat or comma-separate: -c cities:name,weather_readings:date
    #[arg(long = "column", short = 'c', value_name = "ID", value_delimiter = ',')]
    pub columns: Vec<String>,

    /// List the available columns and exit
    #[arg(long)]
    pub list_columns: bool,

    /// Directory the CSV file is saved into
    /// Default: the user's download directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only preview the export; do not save a file
    #[arg(long)]
    pub no_download: bool,

    /// Print the preview as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Run an interactive session reading commands from stdin
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Override console width (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    /// Timeout in seconds for each HTTP request (default: 30)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Export generation endpoint
    #[arg(long, env = "WEATHER_EXPORT_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Credential sent as x-api-key
    #[arg(long, env = "WEATHER_EXPORT_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();
        args.columns = args.columns.iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect();
        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.interactive && self.json {
            return Err("Cannot combine --interactive with --json".to_string());
        }

        if self.timeout == Some(0) {
            return Err("--timeout must be at least 1 second".to_string());
        }

        let mut seen = HashSet::new();
        for id in &self.columns {
            if columns::find(id).is_none() {
                return Err(format!("Unknown column '{}'. Use --list-columns to see the available ids", id));
            }
            if !seen.insert(id.as_str()) {
                return Err(format!("Column '{}' is listed more than once", id));
            }
        }

        Ok(())
    }

    /// Endpoint configuration; missing values surface at submit time
    pub fn api_config(&self) -> ApiConfig {
        let timeout = self.timeout.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT);
        ApiConfig::new(self.api_url.clone(), self.api_key.clone(), timeout)
    }

    /// Get the output directory, using the download directory if not specified
    pub fn get_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }
}
