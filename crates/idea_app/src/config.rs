//! Layered configuration: command line, then environment, then a RON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use idea_core::{stream_endpoint, EndpointError};
use idea_engine::StreamSettings;
use idea_logging::{LogDestination, LogSettings};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "idea_stream.ron";
pub const DEFAULT_OUTPUT_FILE: &str = "ideas.html";
pub const BASE_URL_ENV: &str = "IDEAS_API_BASE_URL";

#[derive(Parser, Debug, Default)]
#[command(
    name = "idea_stream",
    about = "Streams AI-generated business ideas and renders them as they arrive"
)]
pub struct Cli {
    /// Base URL of the idea service; `/stream` is appended.
    #[arg(long, env = BASE_URL_ENV)]
    pub api_base_url: Option<String>,

    /// RON config file. Defaults to ./idea_stream.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// HTML page written by the html surface.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub surface: Option<SurfaceChoice>,

    #[arg(long, value_enum)]
    pub log: Option<LogChoice>,

    /// One of off, error, warn, info, debug, trace.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Give up connecting after this many seconds. No limit by default.
    #[arg(long, value_name = "SECONDS")]
    pub connect_timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceChoice {
    #[default]
    Terminal,
    Html,
    Both,
}

impl SurfaceChoice {
    pub fn terminal(self) -> bool {
        matches!(self, SurfaceChoice::Terminal | SurfaceChoice::Both)
    }

    pub fn html(self) -> bool {
        matches!(self, SurfaceChoice::Html | SurfaceChoice::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogChoice {
    File,
    Terminal,
    Both,
    Off,
}

impl From<LogChoice> for LogDestination {
    fn from(choice: LogChoice) -> Self {
        match choice {
            LogChoice::File => LogDestination::File,
            LogChoice::Terminal => LogDestination::Terminal,
            LogChoice::Both => LogDestination::Both,
            LogChoice::Off => LogDestination::Off,
        }
    }
}

/// Contents of the optional RON config file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub output: Option<PathBuf>,
    pub surface: Option<SurfaceChoice>,
    pub log: Option<LogChoice>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Full stream URL, `<base>/stream`.
    pub endpoint: String,
    pub output: PathBuf,
    pub surface: SurfaceChoice,
    pub logging: LogSettings,
    pub stream: StreamSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("no base URL; pass --api-base-url, set IDEAS_API_BASE_URL, or add api_base_url to the config file")]
    MissingBaseUrl,
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

/// Loads a config file. A missing file is only an error when `required`.
pub fn load_file_config(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

pub fn resolve(cli: Cli) -> Result<AppConfig, ConfigError> {
    let file = match &cli.config {
        Some(path) => load_file_config(path, true)?,
        None => load_file_config(Path::new(DEFAULT_CONFIG_FILE), false)?,
    };
    merge(cli, file)
}

/// Command-line values (which already include the environment) win over the file.
fn merge(cli: Cli, file: FileConfig) -> Result<AppConfig, ConfigError> {
    let base_url = non_blank(cli.api_base_url)
        .or(non_blank(file.api_base_url))
        .ok_or(ConfigError::MissingBaseUrl)?;
    let endpoint = stream_endpoint(&base_url)?;

    let mut logging = LogSettings::default();
    if let Some(choice) = cli.log.or(file.log) {
        logging.destination = choice.into();
    }
    if let Some(name) = cli.log_level.or(file.log_level) {
        logging.level =
            idea_logging::parse_level(&name).ok_or(ConfigError::InvalidLogLevel(name))?;
    }
    if let Some(path) = file.log_file {
        logging.file = path;
    }

    let stream = StreamSettings {
        connect_timeout: cli
            .connect_timeout
            .or(file.connect_timeout_secs)
            .map(Duration::from_secs),
        ..StreamSettings::default()
    };

    Ok(AppConfig {
        endpoint,
        output: cli
            .output
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
        surface: cli.surface.or(file.surface).unwrap_or_default(),
        logging,
        stream,
    })
}

/// An empty flag or variable counts as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|url| !url.trim().is_empty())
}
