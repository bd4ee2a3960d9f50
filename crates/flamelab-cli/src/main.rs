//! `flamelab` entry point.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use flamelab_cli::{Cli, CliError, Commands, bootstrap, handlers, init_tracing, load_env};

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(cli.config)?;
    match command {
        Commands::Run(args) => handlers::run::execute(&ctx, args).await,
        Commands::Chemicals => handlers::chemicals::list(&ctx),
        Commands::Explain { symbol } => handlers::chemicals::explain(&symbol),
        Commands::Mixtures => handlers::chemicals::mixtures(),
        Commands::Controls => handlers::controls::execute(),
        Commands::Config { command } => handlers::config::execute(&ctx, command),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
