//! Cybr Console - terminal workflow runner
//!
//! Runs the demonstration workflow behind animated progress indicators,
//! then tours the interactive widgets. Logs go to a session file because
//! the terminal belongs to the UI.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cybr_console::demo::{DEMO_WORKFLOW, demo_workflow, showcase};
use cybr_console::{
    Banner, Cli, Config, CrosstermSurface, Error, EventLoop, RunOptions, RunReport,
    StepOutcome, WorkflowManager,
};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code for an unusable terminal.
const EXIT_UNSUPPORTED: i32 = 2;

/// Exit code after Ctrl-C or a termination signal.
const EXIT_CANCELLED: i32 = 130;

mod cli_output {
    //! Styled output for after the terminal is restored.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stderr;

    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
    }

    pub fn print_error(msg: &str) {
        let _ = stderr().execute(Print(style("✖ ").with(CliTheme::ERROR).bold()));
        let _ = stderr().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_success(msg: &str) {
        let _ = stderr().execute(Print(style("✔ ").with(CliTheme::SUCCESS).bold()));
        let _ = stderr().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_hint(msg: &str) {
        let _ = stderr().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stderr().execute(Print(style(format!("{}\n", msg)).with(CliTheme::HINT)));
    }
}

fn main() -> Result<()> {
    let code = run()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Everything up to the exit code, so the log guard flushes before exit.
fn run() -> Result<i32> {
    let cli = Cli::parse();
    let exe_dir = get_executable_dir()?;
    let config = load_config(&cli, &exe_dir)?;

    if cli.print_config {
        let toml = toml::to_string_pretty(&config).context("serializing configuration")?;
        print!("{}", toml);
        return Ok(0);
    }

    let log_path = get_log_path(&exe_dir, &config);
    let _guard = setup_file_only_logging(&cli, &log_path)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        tick_ms = config.tick_interval().as_millis() as u64,
        "Cybr Console starting"
    );

    let surface = match CrosstermSurface::new() {
        Ok(surface) => surface,
        Err(Error::UnsupportedTerminal(reason)) => {
            warn!(%reason, "Terminal not supported");
            eprintln!("cybr-console needs an interactive terminal: {}", reason);
            return Ok(EXIT_UNSUPPORTED);
        }
        Err(e) => return Err(e.into()),
    };

    let mut ev = EventLoop::new(surface, config.tick_interval())?;
    let mut manager = WorkflowManager::new();
    demo_workflow(&mut manager, cli.fail_step.as_deref(), 1.0);

    let outcome = session(&mut ev, &mut manager, &config);
    ev.finish()?;
    drop(ev);

    let report = match ending(outcome)? {
        Ending::Finished(report) => report,
        Ending::Cancelled => {
            info!("Session cancelled by user");
            return Ok(EXIT_CANCELLED);
        }
    };
    let code = report_outcome(&report);
    cli_output::print_hint(&format!("Log file: {}", log_path.display()));
    info!(exit_code = code, "Session finished");
    Ok(code)
}

/// How a session ended once the terminal is restored.
#[derive(Debug)]
enum Ending {
    Finished(RunReport),
    Cancelled,
}

/// Cancellation is a normal ending; any other error propagates.
fn ending(outcome: cybr_console::Result<RunReport>) -> cybr_console::Result<Ending> {
    match outcome {
        Ok(report) => Ok(Ending::Finished(report)),
        Err(e) if e.is_cancelled() => Ok(Ending::Cancelled),
        Err(e) => Err(e),
    }
}

/// Banner, demo workflow, then the widget tour if the run got that far.
fn session(
    ev: &mut EventLoop<CrosstermSurface>,
    manager: &mut WorkflowManager,
    config: &Config,
) -> cybr_console::Result<RunReport> {
    ev.show(&mut Banner::new("Welcome to CybrConsole"))?;
    let report = manager.run(DEMO_WORKFLOW, ev, RunOptions::from(config))?;
    if !report.is_success() {
        return Ok(report);
    }
    showcase(ev)?;
    Ok(report)
}

/// Print failures once the terminal is back to normal.
fn report_outcome(report: &RunReport) -> i32 {
    if report.is_success() {
        cli_output::print_success(&format!("{}: {}", report.workflow, report.summary()));
        return 0;
    }
    for failed in report.failures() {
        let reason = match &failed.outcome {
            StepOutcome::Failed(reason) => reason.to_string(),
            other => other.to_string(),
        };
        let error = Error::StepFailed {
            step: failed.name.clone(),
            reason,
        };
        cli_output::print_error(&error.to_string());
    }
    cli_output::print_hint(&report.summary());
    report.exit_code()
}

/// Get the directory containing the executable
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// `<log_dir>/Session_<timestamp>.log`, with `Log/` beside the executable
/// when no directory is configured
fn get_log_path(exe_dir: &Path, config: &Config) -> PathBuf {
    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(|| exe_dir.join("Log"));
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("Session_{}.log", timestamp))
}

/// Resolve config path - supports shorthand syntax
///
/// `--config demo` finds `demo`, `demo.toml`, or `Config/demo.toml` beside
/// the executable, in that order.
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    if with_extension.exists() {
        return with_extension;
    }

    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());
    let mut in_config_dir = exe_dir.join("Config").join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }

    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let config = match cli.config {
        Some(ref config_path) => {
            let resolved_path = resolve_config_path(exe_dir, config_path);
            let file_config = Config::load_from_file(&resolved_path)?;
            cli.merge_with_config(file_config)
        }
        None => cli.to_config(),
    };
    Ok(config)
}

/// Setup file-only logging; the terminal is owned by the UI
fn setup_file_only_logging(cli: &Cli, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}
