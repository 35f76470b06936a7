mod config;
mod core;
mod logging;
mod render;
mod types;
mod ui;

use std::path::PathBuf;

use clap::Parser;

use crate::logging::Verbosity;

/// Falling currency symbols in your terminal.
#[derive(Debug, Parser)]
#[command(name = "moneyrain", version, about)]
struct Cli {
    /// Fixed seed for a reproducible rain.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames drawn per second.
    #[arg(long, default_value_t = config::RENDER_HZ)]
    render_hz: f32,

    /// Write logs here. Logging is off without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// More log detail (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(
        Verbosity::from_flags(cli.quiet, cli.verbose),
        cli.log_file.as_deref(),
    )?;
    let render_interval = config::render_interval(cli.render_hz)?;
    ui::run(ui::RunOptions {
        seed: cli.seed,
        render_interval,
    })
}
