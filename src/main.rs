use std::process::ExitCode;

use clap::Parser;
use fleetcalc::commands::base_commands::{CliArgs, Commands};
use fleetcalc::commands::completions_cmd::completions_command;
use fleetcalc::commands::evaluate_cmd::evaluate_command;
use fleetcalc::commands::health_cmd::health_command;
use fleetcalc::commands::report_cmd::report_command;
use fleetcalc::commands::scenario_cmd::scenario_command;
use fleetcalc::logging::init_logging;

fn main() -> ExitCode {
    init_logging();
    let args = CliArgs::parse();
    let config = args.config.as_deref();
    match args.command {
        cmd @ Commands::Evaluate { .. } => evaluate_command(cmd),
        Commands::Scenario { command } => scenario_command(config, command),
        cmd @ Commands::Report { .. } => report_command(config, cmd),
        Commands::Health => health_command(config),
        Commands::Completions { shell } => completions_command(shell),
    }
}
