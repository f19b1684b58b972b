use crate::core::batch::DEFAULT_CONCURRENCY;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "isincountry")]
#[command(about = "Check whether a coordinate lies inside a country")]
pub struct CliConfig {
    #[arg(long, global = true, env = "ISINCOUNTRY_SERVER_URL")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check explicit coordinates against a country
    Check {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        country: String,
        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },
    /// Check the device location, defaulting to the device country
    Here {
        #[arg(long)]
        country: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },
    /// Check every row of a latitude,longitude,country_code CSV file
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, help = "Report path, stdout when omitted")]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
}
