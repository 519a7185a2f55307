use anyhow::Result;
use clap::Parser;
use nightfall::{
    app,
    cli::{handle_agents_command, Cli, CliCommand, ServeArgs},
    config::Config,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Nightfall {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Agents) => {
            let config = load_config(cli.config.as_deref())?;
            handle_agents_command(&config);
            Ok(())
        }
        Some(CliCommand::Serve(args)) => {
            app::run_service(load_config(cli.config.as_deref())?, args).await
        }
        None => app::run_service(load_config(cli.config.as_deref())?, ServeArgs::default()).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
