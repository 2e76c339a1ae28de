//! Command-line interface definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Validated configuration updates for the media server.
#[derive(Parser, Debug)]
#[command(name = "media-config", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.yml", env = "MEDIA_CONFIG_PATH", global = true)]
    pub config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Report attempted changes instead of failing when the file cannot be written.
    #[arg(long, env = "MEDIA_ALLOW_READ_ONLY", global = true)]
    pub allow_read_only: bool,

    /// Override a setting for this run; overridden settings cannot be changed.
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    pub overrides: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level based on verbosity flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Settings groups with a materialized view.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    General,
    Interface,
    Dlna,
    Scraping,
    Defaults,
    Ui,
}

/// Settings groups accepting a partial update record.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputGroup {
    General,
    Interface,
    Dlna,
    Scraping,
    Defaults,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current settings of a group.
    Show {
        #[arg(value_enum)]
        group: Group,
    },

    /// Apply a partial update record read from a YAML or JSON file.
    Configure {
        #[arg(value_enum)]
        group: InputGroup,

        /// File holding the partial update.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Replace the UI configuration, or merge into it with --partial.
    Ui {
        /// File holding the UI configuration mapping.
        #[arg(short, long)]
        input: PathBuf,

        /// Merge the mapping into the existing configuration.
        #[arg(long, default_value = "false")]
        partial: bool,
    },

    /// Set one UI value by dotted path.
    #[command(name = "ui-setting")]
    UiSetting {
        /// Dotted path, e.g. `scene.autoplay`.
        key: String,

        /// JSON value; anything unparseable is stored as a string.
        value: String,
    },

    /// Replace the configuration of one plugin.
    Plugin {
        /// Plugin identifier.
        id: String,

        /// File holding the plugin configuration mapping.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Regenerate the API key for the configured user.
    #[command(name = "api-key")]
    ApiKey {
        /// Remove the key instead of issuing a new one.
        #[arg(long, default_value = "false")]
        clear: bool,
    },

    /// Check the stored configuration and report every problem found.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_configure_with_overrides() {
        let cli = Cli::try_parse_from([
            "media-config",
            "--config",
            "/srv/media/config.yml",
            "--set",
            "generated=/data/generated",
            "-vv",
            "configure",
            "general",
            "--input",
            "update.yml",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), "trace");
        assert_eq!(cli.overrides, vec!["generated=/data/generated"]);
        assert!(matches!(
            cli.command,
            Commands::Configure {
                group: InputGroup::General,
                ..
            }
        ));
    }

    #[test]
    fn parses_ui_setting() {
        let cli = Cli::try_parse_from(["media-config", "ui-setting", "scene.autoplay", "true"])
            .unwrap();
        match cli.command {
            Commands::UiSetting { key, value } => {
                assert_eq!(key, "scene.autoplay");
                assert_eq!(value, "true");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_group() {
        assert!(Cli::try_parse_from(["media-config", "show", "network"]).is_err());
    }
}
