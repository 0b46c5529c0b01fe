use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "fleetcalc", author, version, about)]
pub struct CliArgs {
    /// Path to the store config YAML (defaults to fleetcalc.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a scenario file and print fleet size and costs
    Evaluate {
        /// Scenario YAML or JSON file
        #[arg(short, long, required_unless_present = "defaults", conflicts_with = "defaults")]
        input: Option<String>,
        /// Evaluate the reference scenario instead of a file
        #[arg(long)]
        defaults: bool,
        /// Output file (format follows the extension unless --format is given)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Manage saved scenarios
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommands,
    },
    /// Write a printable report, optionally with a cost chart
    Report {
        /// Scenario YAML or JSON file
        #[arg(short, long, required_unless_present = "id", conflicts_with = "id")]
        input: Option<String>,
        /// Saved scenario id
        #[arg(long)]
        id: Option<String>,
        /// Scenario name shown in the report
        #[arg(short, long)]
        name: Option<String>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: String,
        /// Also write a PNG cost chart
        #[arg(long)]
        chart: bool,
        /// Report date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_report_date())]
        date: String,
    },
    /// Check that the configured scenario store is reachable
    Health,
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// Save a new scenario
    Create {
        /// Scenario name
        #[arg(short, long)]
        name: String,
        /// Scenario YAML or JSON file
        #[arg(short, long)]
        input: String,
    },
    /// Print a saved scenario
    Show { id: String },
    /// Rename a scenario or replace its input
    Update {
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// Replacement scenario YAML or JSON file
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Delete a saved scenario
    Delete { id: String },
    /// List saved scenarios, most recently updated first
    List,
    /// Evaluate a saved scenario
    Evaluate {
        id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn default_report_date() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
