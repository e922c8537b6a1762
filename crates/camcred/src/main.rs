mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    use commands::{Context, config_cmd, devices, lookup, mappings, resolve};

    let global = &cli.global;
    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        // Pure MAC helpers need neither config nor secrets
        Command::Sanitize { mac } => commands::mac::sanitize(&mac, global),
        Command::Reverse { mac } => commands::mac::reverse(&mac, global),

        Command::Config(args) => config_cmd::handle(args, global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "camcred", &mut std::io::stdout());
            Ok(())
        }

        // Everything else works against the loaded configuration
        Command::Group { mac } => lookup::group(&Context::load(global)?, &mac, global),
        Command::Match { text } => lookup::find(&Context::load(global)?, &text, global),
        Command::Devices => devices::handle(&Context::load(global)?, global),
        Command::Resolve(args) => resolve::handle(&Context::load(global)?, &args, global),
        Command::Mappings => mappings::handle(&Context::load(global)?, global),
    }
}
