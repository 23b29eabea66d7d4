mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, ports, report, scan};
use portsweep_common::config::Config;
use portsweep_common::error::SweepError;
use terminal::{logging, print, spinner};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands: CommandLine = CommandLine::parse_args();

    logging::init_logging(commands.quiet);
    print::banner(commands.no_banner, commands.quiet);

    match run(commands).await {
        Ok(()) => {
            print::end_of_program();
            ExitCode::SUCCESS
        }
        Err(e) => {
            spinner::finish();
            error!("{e:#}");
            let code: u8 = e.downcast_ref::<SweepError>().map_or(1, SweepError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(commands: CommandLine) -> anyhow::Result<()> {
    let cfg: Config = commands.config()?;

    match &commands.command {
        Commands::Scan { .. } => scan::scan(&cfg).await,
        Commands::Report { xml, .. } => report::report(xml, &cfg),
        Commands::Ports { .. } => {
            ports::ports(&cfg);
            Ok(())
        }
    }
}
