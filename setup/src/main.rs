use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;

use wp_setup::core::types::Mode;
use wp_setup::io::composer_file::ComposerCli;
use wp_setup::io::db::MysqlCli;
use wp_setup::io::wp_cli::WpCli;
use wp_setup::io::{download, input};
use wp_setup::phases::{Collaborators, run_pipeline};
use wp_setup::{exit_codes, logging, report};

/// Set up and validate a Composer-managed WordPress project.
#[derive(Debug, Parser)]
#[command(name = "wp-setup", version, about)]
struct Cli {
    /// Report deviations without touching anything (default).
    #[arg(long, conflicts_with = "fix")]
    check: bool,
    /// Apply corrections, then re-validate.
    #[arg(long)]
    fix: bool,
}

fn main() -> ExitCode {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    ExitCode::from(exit_codes::OK as u8)
                }
                _ => ExitCode::from(exit_codes::INVALID as u8),
            };
        }
    };
    let mode = if cli.fix { Mode::Fix } else { Mode::Check };

    match run(mode) {
        Ok(()) => {
            report::success(&format!("All conditions met ({mode} mode)"));
            ExitCode::from(exit_codes::OK as u8)
        }
        Err(err) => {
            report::error(&format!("{err:#}"));
            ExitCode::from(exit_codes::INVALID as u8)
        }
    }
}

fn run(mode: Mode) -> Result<()> {
    let root = env::current_dir().context("determine working directory")?;
    report::banner(&format!("WordPress Composer setup — {mode} mode"));
    report::info(&format!("Project root: {}", root.display()));

    let home = resolve_home()?;
    download::fetch_templates(&root)?;

    let input = input::detect();
    let collab = Collaborators {
        package_manager: &ComposerCli,
        wordpress: &WpCli,
        database: &MysqlCli,
        input: input.as_ref(),
    };
    run_pipeline(&root, &home, mode, &collab)?;
    Ok(())
}

/// Home directory, with the Windows fallback pair.
fn resolve_home() -> Result<PathBuf> {
    if let Ok(home) = env::var("HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    if let (Ok(drive), Ok(path)) = (env::var("HOMEDRIVE"), env::var("HOMEPATH")) {
        return Ok(PathBuf::from(format!("{drive}{path}")));
    }
    Err(anyhow!("cannot determine home directory"))
}
