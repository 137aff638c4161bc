mod cli;
mod commands;

use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands};
use commands::{render, stats};

/// Logs go to stderr so `stats` can own stdout. `RUST_LOG` wins over `-v`.
fn init_tracing(cli: &Cli) {
    let default = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.log_json { builder.json().init() } else { builder.init() }
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(&cli);
    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
        Commands::Stats(args) => stats::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
