//! Configuration management for dagscan
//!
//! Settings come from built-in defaults, then `DAGSCAN_*` environment variables,
//! then command-line flags (applied by the CLI layer).
//!
//! # Environment Variables
//!
//! - `DAGSCAN_WORKFLOW_CONSTRUCTOR`: callee that declares a workflow - default: "DAG"
//! - `DAGSCAN_TASK_OPERATOR`: callee that declares a remote task - default: "KubernetesPodOperator"
//! - `DAGSCAN_WORKFLOW_KEYWORD`: task keyword naming the owning workflow - default: "dag"
//! - `DAGSCAN_ARGUMENTS_KEYWORD`: task keyword holding the argument list - default: "arguments"
//! - `DAGSCAN_PATH_INDEX`: index of the artifact path in the argument list - default: "3"
//! - `DAGSCAN_PATH_PREFIX`: required artifact path prefix - default: "etl/"
//! - `DAGSCAN_EXTENSIONS`: comma-separated source extensions - default: "py"
//! - `DAGSCAN_RESPECT_GITIGNORE`: honor ignore files while walking (true|false) - default: "false"
//! - `DAGSCAN_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use dagscan::DagscanConfig;
//!
//! let config = DagscanConfig::from_env().expect("invalid environment");
//! config.validate().expect("invalid configuration");
//! println!("{}", config);
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_WORKFLOW_CONSTRUCTOR: &str = "DAG";
pub const DEFAULT_TASK_OPERATOR: &str = "KubernetesPodOperator";
pub const DEFAULT_WORKFLOW_KEYWORD: &str = "dag";
pub const DEFAULT_ARGUMENTS_KEYWORD: &str = "arguments";
/// Fourth element of the task's argument list.
pub const DEFAULT_PATH_INDEX: usize = 3;
pub const DEFAULT_PATH_PREFIX: &str = "etl/";
pub const DEFAULT_EXTENSION: &str = "py";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Names and positions that identify workflow and task declarations in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Bare callee name of a workflow declaration, e.g. `DAG("orders_etl")`
    pub workflow_constructor: String,

    /// Bare callee name of a remote task declaration
    pub task_operator: String,

    /// Task keyword whose value is the workflow variable
    pub workflow_keyword: String,

    /// Task keyword whose value is the positional argument list
    pub arguments_keyword: String,

    /// Index of the artifact path inside the argument list
    pub path_index: usize,

    /// Only paths starting with this prefix are reported
    pub path_prefix: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            workflow_constructor: DEFAULT_WORKFLOW_CONSTRUCTOR.to_string(),
            task_operator: DEFAULT_TASK_OPERATOR.to_string(),
            workflow_keyword: DEFAULT_WORKFLOW_KEYWORD.to_string(),
            arguments_keyword: DEFAULT_ARGUMENTS_KEYWORD.to_string(),
            path_index: DEFAULT_PATH_INDEX,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
        }
    }
}

/// Main configuration structure for dagscan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagscanConfig {
    pub markers: Markers,

    /// File extensions (without the dot) considered source files
    pub extensions: Vec<String>,

    /// Apply `.gitignore`/`.ignore` rules while walking
    pub respect_gitignore: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DagscanConfig {
    /// Built-in defaults, without consulting the environment
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            respect_gitignore: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl DagscanConfig {
    /// Loads the configuration from `DAGSCAN_*` environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when a numeric or boolean variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let markers = &mut config.markers;

        if let Ok(value) = env::var("DAGSCAN_WORKFLOW_CONSTRUCTOR") {
            markers.workflow_constructor = value;
        }
        if let Ok(value) = env::var("DAGSCAN_TASK_OPERATOR") {
            markers.task_operator = value;
        }
        if let Ok(value) = env::var("DAGSCAN_WORKFLOW_KEYWORD") {
            markers.workflow_keyword = value;
        }
        if let Ok(value) = env::var("DAGSCAN_ARGUMENTS_KEYWORD") {
            markers.arguments_keyword = value;
        }
        if let Ok(value) = env::var("DAGSCAN_PATH_INDEX") {
            markers.path_index = value
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::ParseError {
                    field: "DAGSCAN_PATH_INDEX".to_string(),
                    error: e.to_string(),
                })?;
        }
        if let Ok(value) = env::var("DAGSCAN_PATH_PREFIX") {
            markers.path_prefix = value;
        }

        if let Ok(value) = env::var("DAGSCAN_EXTENSIONS") {
            config.extensions = parse_extensions(&value);
        }
        if let Ok(value) = env::var("DAGSCAN_RESPECT_GITIGNORE") {
            config.respect_gitignore =
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| ConfigError::ParseError {
                        field: "DAGSCAN_RESPECT_GITIGNORE".to_string(),
                        error: e.to_string(),
                    })?;
        }
        if let Ok(value) = env::var("DAGSCAN_LOG_LEVEL") {
            config.log_level = value.to_lowercase();
        }

        Ok(config)
    }

    /// Validates the configuration
    ///
    /// Checks that every marker identifier is non-empty, at least one
    /// extension is configured, and the log level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let identifiers = [
            ("workflow constructor", &self.markers.workflow_constructor),
            ("task operator", &self.markers.task_operator),
            ("workflow keyword", &self.markers.workflow_keyword),
            ("arguments keyword", &self.markers.arguments_keyword),
        ];
        for (label, value) in identifiers {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "The {} must not be empty",
                    label
                )));
            }
        }

        if self.extensions.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one source extension is required".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

/// Splits a comma-separated extension list, dropping blanks and leading dots.
pub fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for DagscanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dagscan Configuration:")?;
        writeln!(
            f,
            "  Workflow Constructor: {}",
            self.markers.workflow_constructor
        )?;
        writeln!(f, "  Task Operator: {}", self.markers.task_operator)?;
        writeln!(f, "  Workflow Keyword: {}", self.markers.workflow_keyword)?;
        writeln!(f, "  Arguments Keyword: {}", self.markers.arguments_keyword)?;
        writeln!(f, "  Path Index: {}", self.markers.path_index)?;
        writeln!(f, "  Path Prefix: {}", self.markers.path_prefix)?;
        writeln!(f, "  Extensions: {}", self.extensions.join(", "))?;
        writeln!(f, "  Respect Gitignore: {}", self.respect_gitignore)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
