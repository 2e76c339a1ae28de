//! Media Config - validated configuration updates for a media-management service.
//!
//! Partial updates are checked field by field against path, pattern, binary and
//! policy rules, committed atomically to a YAML document, and announced to the
//! subsystems that cache configuration.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod mutation;
pub mod refresh;
pub mod validation;

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::cli::{Cli, Commands, Group, InputGroup};
use crate::config::loader::{open_store, parse_override_value, LoadOptions};
use crate::config::ConfigService;
use crate::error::{AppError, MutationError, MutationFailure};
use crate::refresh::TracingHooks;
use crate::validation::{report::format_report, validate_document};

/// Runs the gateway with the provided CLI arguments.
pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.log_level())?;

    let options = LoadOptions {
        flag_overrides: cli.overrides.clone(),
        allow_read_only: cli.allow_read_only,
    };
    let store = open_store(&cli.config, &options).map_err(AppError::Store)?;
    info!(path = %cli.config.display(), overrides = ?store.override_keys(), "Configuration loaded");

    let service = ConfigService::new(store, Arc::new(TracingHooks));

    match cli.command {
        Commands::Show { group } => show(&service, group).await,
        Commands::Configure { group, input } => configure(&service, group, &input).await,
        Commands::Ui { input, partial } => {
            let blob: Map<String, Value> = read_input(&input)?;
            let result = if partial {
                service.configure_ui(None, Some(blob)).await
            } else {
                service.configure_ui(Some(blob), None).await
            };
            finish(result)
        }
        Commands::UiSetting { key, value } => {
            finish(service.configure_ui_setting(&key, parse_override_value(&value)).await)
        }
        Commands::Plugin { id, input } => {
            let blob: Map<String, Value> = read_input(&input)?;
            finish(service.configure_plugin(&id, blob).await)
        }
        Commands::ApiKey { clear } => match service.generate_api_key(clear).await {
            Ok(key) => {
                println!("{}", key);
                Ok(())
            }
            Err(failure) => fail(failure),
        },
        Commands::Validate => validate(&service).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(())
}

/// Displays the current view of a settings group.
async fn show(service: &ConfigService, group: Group) -> Result<()> {
    let yaml = match group {
        Group::General => serde_yaml::to_string(&service.general_view().await)?,
        Group::Interface => serde_yaml::to_string(&service.interface_view().await)?,
        Group::Dlna => serde_yaml::to_string(&service.dlna_view().await)?,
        Group::Scraping => serde_yaml::to_string(&service.scraping_view().await)?,
        Group::Defaults => serde_yaml::to_string(&service.defaults_view().await)?,
        Group::Ui => serde_yaml::to_string(&service.ui_configuration().await)?,
    };
    println!("{}", yaml);
    Ok(())
}

/// Applies a partial update record to one settings group.
async fn configure(service: &ConfigService, group: InputGroup, input: &Path) -> Result<()> {
    match group {
        InputGroup::General => finish(service.configure_general(read_input(input)?).await),
        InputGroup::Interface => finish(service.configure_interface(read_input(input)?).await),
        InputGroup::Dlna => finish(service.configure_dlna(read_input(input)?).await),
        InputGroup::Scraping => finish(service.configure_scraping(read_input(input)?).await),
        InputGroup::Defaults => finish(service.configure_defaults(read_input(input)?).await),
    }
}

/// Validates the stored configuration and reports any issues.
async fn validate(service: &ConfigService) -> Result<()> {
    let result = validate_document(&*service.read().await);
    println!("{}", format_report(&result));

    if !result.is_valid() {
        bail!("Configuration has {} error(s)", result.error_count());
    }
    Ok(())
}

/// Reads a YAML or JSON input file.
fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Input(format!("'{}': {}", path.display(), e)))
}

/// Prints the view of a successful mutation.
fn finish<V: Serialize + Debug>(result: Result<V, MutationFailure<V>>) -> Result<()> {
    match result {
        Ok(view) => {
            println!("{}", serde_yaml::to_string(&view)?);
            Ok(())
        }
        Err(failure) => fail(failure),
    }
}

/// Reports a failed mutation.
///
/// A tolerated persistence failure prints the attempted changes so they can be
/// applied by hand, and still exits non-zero.
fn fail<V: Debug>(failure: MutationFailure<V>) -> Result<()> {
    if let MutationError::PersistenceTolerated { changes, source } = &failure.error {
        error!(error = %source, "Configuration file is read-only");
        println!("{}", changes.render());
        bail!("Configuration was not saved; apply the changes above manually");
    }

    Err(AppError::Mutation(failure.error).into())
}
