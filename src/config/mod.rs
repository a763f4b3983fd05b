//! Configuration management for `signal_catalog`.
//!
//! Precedence (lowest to highest):
//! 1. Built-in defaults
//! 2. User config (`~/.config/sigcat/config.yaml`)
//! 3. Project config (`.sigcat/config.yaml`, found by walking up)
//! 4. `DATABASE_URL`
//! 5. Environment variables (`SIGCAT_*`)
//! 6. CLI flags
//!
//! YAML files may be flat (`triage-days: 21`) or nested
//! (`defaults: { triage-days: 21 }`). Keys are case-insensitive and `_` and
//! `-` are interchangeable.

use crate::error::{Result, SignalError};
use crate::storage::sqlite::DEFAULT_TABLE;
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

/// Project directory name searched for from the working directory upward.
pub const PROJECT_DIR_NAME: &str = ".sigcat";

/// Config file name inside the project and user config directories.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Database file name inside a project directory.
pub const DEFAULT_DB_FILENAME: &str = "signals.db";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SIGCAT_";

static TABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid table name pattern"));

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Sqlite,
    Postgres,
}

impl Backend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(SignalError::config(format!(
                "unsupported backend '{other}' (expected sqlite or postgres)"
            ))),
        }
    }
}

/// Resolved storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: Backend,
    pub db_path: PathBuf,
    pub dsn: Option<String>,
    pub table: String,
}

/// Default windows and limits for every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDefaults {
    pub digest_days: i64,
    pub digest_limit: usize,
    pub triage_days: i64,
    pub triage_limit: usize,
    pub workload_days: i64,
    pub calendar_days: i64,
    pub calendar_limit: usize,
    pub audit_limit: usize,
    pub stale_days: i64,
    pub metrics_days: i64,
    pub metrics_limit: usize,
    pub stale_limit: usize,
    pub trend_weeks: usize,
    pub activity_days: i64,
    pub activity_limit: usize,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            digest_days: 7,
            digest_limit: 8,
            triage_days: 14,
            triage_limit: 10,
            workload_days: 14,
            calendar_days: 28,
            calendar_limit: 10,
            audit_limit: 5,
            stale_days: 14,
            metrics_days: 7,
            metrics_limit: 5,
            stale_limit: 20,
            trend_weeks: 8,
            activity_days: 7,
            activity_limit: 10,
        }
    }
}

impl ReportDefaults {
    /// Apply overrides from a merged layer.
    ///
    /// # Errors
    ///
    /// Returns a config error if a value is not a non-negative integer.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let mut defaults = Self::default();

        let days: [(&str, &mut i64); 7] = [
            ("digest-days", &mut defaults.digest_days),
            ("triage-days", &mut defaults.triage_days),
            ("workload-days", &mut defaults.workload_days),
            ("calendar-days", &mut defaults.calendar_days),
            ("stale-days", &mut defaults.stale_days),
            ("metrics-days", &mut defaults.metrics_days),
            ("activity-days", &mut defaults.activity_days),
        ];
        for (key, slot) in days {
            if let Some(value) = layer.report_value(key) {
                let parsed = parse_count(key, value)?;
                *slot = i64::try_from(parsed)
                    .map_err(|_| SignalError::config(format!("{key} is out of range")))?;
            }
        }

        let counts: [(&str, &mut usize); 8] = [
            ("digest-limit", &mut defaults.digest_limit),
            ("triage-limit", &mut defaults.triage_limit),
            ("calendar-limit", &mut defaults.calendar_limit),
            ("audit-limit", &mut defaults.audit_limit),
            ("metrics-limit", &mut defaults.metrics_limit),
            ("stale-limit", &mut defaults.stale_limit),
            ("trend-weeks", &mut defaults.trend_weeks),
            ("activity-limit", &mut defaults.activity_limit),
        ];
        for (key, slot) in counts {
            if let Some(value) = layer.report_value(key) {
                *slot = parse_count(key, value)?;
            }
        }

        Ok(defaults)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        SignalError::config(format!(
            "invalid value '{value}' for {key} (expected a non-negative integer)"
        ))
    })
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub store: StoreConfig,
    pub defaults: ReportDefaults,
    /// The `.sigcat` directory in effect, if one was found.
    pub project_dir: Option<PathBuf>,
}

/// A single configuration layer of normalized keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Insert a value under its normalized key.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `SIGCAT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from an explicit set of environment variables.
    #[must_use]
    pub fn from_env_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                if !stripped.is_empty() && !value.trim().is_empty() {
                    layer.insert(stripped, value);
                }
            }
        }
        layer
    }

    fn get(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.values.get(&normalize_key(key)))
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn store_value(&self, key: &str) -> Option<&str> {
        let nested = format!("store.{key}");
        self.get(&[key, nested.as_str()])
    }

    fn report_value(&self, key: &str) -> Option<&str> {
        let nested = format!("defaults.{key}");
        self.get(&[key, nested.as_str()])
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub backend: Option<String>,
    pub dsn: Option<String>,
    pub table: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.insert("db", path.to_string_lossy());
        }
        if let Some(backend) = &self.backend {
            layer.insert("backend", backend.clone());
        }
        if let Some(dsn) = &self.dsn {
            layer.insert("dsn", dsn.clone());
        }
        if let Some(table) = &self.table {
            layer.insert("table", table.clone());
        }

        layer
    }
}

/// Walk up from `start` looking for a `.sigcat` directory.
#[must_use]
pub fn discover_project_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(PROJECT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load user config (`~/.config/sigcat/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config(home: Option<&Path>) -> Result<ConfigLayer> {
    let Some(home) = home else {
        return Ok(ConfigLayer::default());
    };
    ConfigLayer::from_yaml(&home.join(".config").join("sigcat").join(CONFIG_FILE_NAME))
}

/// Load project config (`.sigcat/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&project_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration for the current process.
///
/// # Errors
///
/// Returns a config error for unreadable files, unsupported backends, a
/// missing DSN, an invalid table name, or malformed report defaults.
pub fn load_config(cli: &CliOverrides) -> Result<ResolvedConfig> {
    let cwd = env::current_dir()?;
    let home = env::var_os("HOME").map(PathBuf::from);
    let database_url = env::var("DATABASE_URL").ok();
    load_config_from(
        &cwd,
        home.as_deref(),
        database_url.as_deref(),
        &ConfigLayer::from_env(),
        cli,
    )
}

/// Load configuration from explicit inputs.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from(
    cwd: &Path,
    home: Option<&Path>,
    database_url: Option<&str>,
    env_layer: &ConfigLayer,
    cli: &CliOverrides,
) -> Result<ResolvedConfig> {
    let project_dir = discover_project_dir(cwd);

    let user = load_user_config(home).map_err(config_file_error)?;
    let project = match &project_dir {
        Some(dir) => load_project_config(dir).map_err(config_file_error)?,
        None => ConfigLayer::default(),
    };
    let mut url_layer = ConfigLayer::default();
    if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
        url_layer.insert("dsn", url);
    }

    let merged = ConfigLayer::merge_layers(&[
        user,
        project,
        url_layer,
        env_layer.clone(),
        cli.as_layer(),
    ]);

    let store = store_config_from_layer(&merged, cwd, project_dir.as_deref())?;
    let defaults = ReportDefaults::from_layer(&merged)?;
    tracing::debug!(
        backend = %store.backend,
        table = %store.table,
        project = ?project_dir,
        "Resolved configuration"
    );

    Ok(ResolvedConfig {
        store,
        defaults,
        project_dir,
    })
}

fn config_file_error(err: SignalError) -> SignalError {
    match err {
        SignalError::Config(_) => err,
        other => SignalError::config(format!("cannot load config file: {other}")),
    }
}

fn store_config_from_layer(
    layer: &ConfigLayer,
    cwd: &Path,
    project_dir: Option<&Path>,
) -> Result<StoreConfig> {
    let backend = layer
        .store_value("backend")
        .map_or(Ok(Backend::default()), Backend::from_str)?;

    let table = layer
        .store_value("table")
        .map_or_else(|| DEFAULT_TABLE.to_string(), |t| t.trim().to_string());
    validate_table_name(&table)?;

    let db_path = layer.store_value("db").map_or_else(
        || default_db_path(cwd, project_dir),
        |p| PathBuf::from(p.trim()),
    );

    let dsn = layer.store_value("dsn").map(|d| d.trim().to_string());
    if backend == Backend::Postgres && dsn.is_none() {
        return Err(SignalError::config(
            "postgres backend requires a DSN (--dsn, SIGCAT_DSN or DATABASE_URL)",
        ));
    }

    Ok(StoreConfig {
        backend,
        db_path,
        dsn,
        table,
    })
}

/// Database path used when none is configured.
#[must_use]
pub fn default_db_path(cwd: &Path, project_dir: Option<&Path>) -> PathBuf {
    project_dir.map_or_else(
        || cwd.join("data").join(DEFAULT_DB_FILENAME),
        |dir| dir.join(DEFAULT_DB_FILENAME),
    )
}

/// Reject table names that are not plain SQL identifiers.
///
/// # Errors
///
/// Returns a config error naming the rejected table.
pub fn validate_table_name(table: &str) -> Result<()> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(SignalError::config(format!(
            "invalid table name '{table}' (letters, digits and underscores only)"
        )))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.insert(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
