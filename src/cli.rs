//! CLI argument parsing with clap

use crate::config::{Config, SpinnerStyle};
use clap::Parser;
use std::path::PathBuf;

/// Cybr Console - terminal workflow runner
///
/// Runs the built-in demonstration workflow with animated progress, then
/// walks through the interactive prompts. Ctrl-C cancels at any point.
#[derive(Parser, Debug)]
#[command(name = "cybr-console")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long, env = "CYBR_CONSOLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Animation tick interval in milliseconds (16-1000)
    #[arg(short = 't', long)]
    pub tick_ms: Option<u64>,

    /// Keep running steps after one fails
    #[arg(short = 'k', long)]
    pub continue_on_error: bool,

    /// Spinner glyph set
    #[arg(short, long, value_enum)]
    pub spinner: Option<SpinnerStyle>,

    /// Hide elapsed time next to running steps
    #[arg(long)]
    pub hide_elapsed: bool,

    /// Force the named demo step to fail
    #[arg(long, value_name = "STEP")]
    pub fail_step: Option<String>,

    /// Directory for session log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.continue_on_error {
            config.continue_on_error = true;
        }
        if let Some(spinner) = self.spinner {
            config.spinner = spinner;
        }
        if self.hide_elapsed {
            config.show_elapsed = false;
        }
        if let Some(ref log_dir) = self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let cli = Cli::parse_from([
            "cybr-console",
            "--tick-ms",
            "50",
            "--spinner",
            "arc",
            "--continue-on-error",
            "--hide-elapsed",
        ]);
        let file = Config {
            tick_interval_ms: 200,
            spinner: SpinnerStyle::Line,
            ..Config::default()
        };
        let merged = cli.merge_with_config(file);
        assert_eq!(merged.tick_interval_ms, 50);
        assert_eq!(merged.spinner, SpinnerStyle::Arc);
        assert!(merged.continue_on_error);
        assert!(!merged.show_elapsed);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let cli = Cli::parse_from(["cybr-console"]);
        let file = Config {
            tick_interval_ms: 250,
            continue_on_error: true,
            ..Config::default()
        };
        assert_eq!(cli.merge_with_config(file.clone()), file);
        assert_eq!(cli.to_config(), Config::default());
    }

    #[test]
    fn fail_step_is_captured() {
        let cli = Cli::parse_from(["cybr-console", "--fail-step", "Process data"]);
        assert_eq!(cli.fail_step.as_deref(), Some("Process data"));
    }
}
