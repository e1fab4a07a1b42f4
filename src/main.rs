mod actions;
mod collectors;
mod config;
mod models;
mod util;

use clap::Parser;
use config::Config;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use util::command::{CommandRunner, SystemRunner};

#[derive(Parser, Debug, Default)]
#[command(
    name = "drivemon",
    about = "Waybar module for newly attached partitions",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Read overrides from this TOML file instead of ~/.config/drivemon/drivemon.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// `sync` flushes buffers, `unmount` unmounts unknown partitions.
    /// Anything else prints the status JSON.
    #[arg(value_name = "ACTION", trailing_var_arg = true, allow_hyphen_values = true)]
    action: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Report,
    Sync,
    Unmount,
}

impl Mode {
    fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("sync")    => Mode::Sync,
            Some("unmount") => Mode::Unmount,
            _               => Mode::Report,
        }
    }
}

fn main() {
    init_logging();

    let cli = parse_cli(std::env::args_os());
    let cfg = Config::load(cli.config.as_deref());
    let mode = Mode::from_arg(cli.action.first().map(String::as_str));
    tracing::debug!(?mode, known = ?cfg.partitions.known, "starting");

    run(mode, &SystemRunner, &cfg);
}

/// Arguments that do not parse select report mode with default settings.
fn parse_cli<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).unwrap_or_else(|e| {
        tracing::debug!(kind = ?e.kind(), "unrecognised arguments, falling back to report");
        Cli::default()
    })
}

/// Logs go to stderr; stdout carries the status JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_env("DRIVEMON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run(mode: Mode, runner: &dyn CommandRunner, cfg: &Config) {
    match mode {
        Mode::Sync => {
            actions::sync_drives(runner, cfg);
        }
        Mode::Unmount => {
            actions::unmount_unknown(runner, cfg);
        }
        Mode::Report => {
            if let Err(e) = run_report(runner, cfg, &mut io::stdout().lock()) {
                tracing::warn!("could not write status: {:#}", e);
            }
        }
    }
}

fn run_report(runner: &dyn CommandRunner, cfg: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    use collectors::partitions;
    use util::report;

    let found = partitions::enumerate(runner, &cfg.commands.lsblk, &cfg.partitions);
    let payload = report::build_status(&found, &cfg.display);
    writeln!(out, "{}", payload.to_json()?)?;
    out.flush()?;
    Ok(())
}
