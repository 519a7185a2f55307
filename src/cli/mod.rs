use crate::config::Config;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nightfall")]
#[command(about = "Meeting agent orchestration backend", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: <config dir>/nightfall/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the API server (default)
    Serve(ServeArgs),
    /// List configured agent profiles
    Agents,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub fn handle_agents_command(config: &Config) {
    let agents = &config.agents;
    if agents.profiles.is_empty() {
        println!("No agent profiles configured.");
        return;
    }

    for (id, profile) in &agents.profiles {
        let marker = if *id == agents.default_agent { "*" } else { " " };
        println!(
            "{} {:<4} {:<28} prompt: {}",
            marker, id, profile.name, profile.prompt_file
        );
    }
}
