// Configuration loading and parsing (config/auction.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::auction::rules::AuctionRules;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Fully loaded and validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub auction: AuctionSection,
    pub rules: AuctionRules,
    pub teams: Vec<TeamConfig>,
    /// Directory the config was loaded from; relative paths resolve here.
    pub base_dir: PathBuf,
}

/// Raw deserialization target for auction.toml.
#[derive(Debug, Clone, Deserialize)]
struct AuctionFile {
    auction: AuctionSection,
    #[serde(default)]
    rules: AuctionRules,
    #[serde(default)]
    teams: Vec<TeamConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuctionSection {
    pub name: String,
    /// Player roster CSV, relative to the base directory.
    pub players_csv: String,
    /// Fixed RNG seed for lot selection. Omit for a fresh draw every run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Quick-bid increments offered to the operator.
    #[serde(default = "default_quick_bids")]
    pub quick_bid_increments: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    pub budget: u64,
}

fn default_quick_bids() -> Vec<u64> {
    vec![10_000, 20_000, 50_000, 100_000, 200_000, 500_000]
}

impl Config {
    /// Absolute (or base-relative) path of the player roster CSV.
    pub fn players_path(&self) -> PathBuf {
        self.base_dir.join(&self.auction.players_csv)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/auction.toml` relative to
/// `base_dir`.
///
/// This does not copy defaults; prefer `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("auction.toml");
    let text = read_file(&path)?;
    let file: AuctionFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        auction: file.auction,
        rules: file.rules,
        teams: file.teams,
        base_dir: base_dir.to_path_buf(),
    };

    validate(&config)?;
    Ok(config)
}

/// Copy every file in `defaults/` that has no counterpart in `config/`.
///
/// Returns the newly written paths, sorted. A `config/` file is never
/// replaced, so operator edits survive restarts. Having neither directory is
/// an error; having only `config/` is fine.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    match (defaults_dir.is_dir(), config_dir.is_dir()) {
        (false, true) => return Ok(Vec::new()),
        (false, false) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "no defaults/ or config/ under {}; start gavel from the project root",
                    base_dir.display()
                ),
            })
        }
        (true, _) => {}
    }

    fs::create_dir_all(&config_dir).map_err(copy_error("creating", &config_dir))?;

    let mut installed = Vec::new();
    for source in default_files(&defaults_dir)? {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if install_default(&source, &target)? {
            info!("Installed default config {}", target.display());
            installed.push(target);
        }
    }
    Ok(installed)
}

/// Regular files directly inside `dir`, sorted by path.
fn default_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(copy_error("listing", dir))? {
        let path = entry.map_err(copy_error("listing", dir))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write `source` to `target` unless `target` already exists. The existence
/// check and the create are one `create_new` open.
fn install_default(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error("creating", target)(e)),
    };
    let mut src = fs::File::open(source).map_err(copy_error("reading", source))?;
    io::copy(&mut src, &mut dest).map_err(copy_error("writing", target))?;
    Ok(true)
}

fn copy_error<'a>(action: &'a str, path: &'a Path) -> impl Fn(io::Error) -> ConfigError + 'a {
    move |e| ConfigError::DefaultsCopyError {
        message: format!("{action} {}: {e}", path.display()),
    }
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.auction.players_csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "auction.players_csv".into(),
            message: "must not be empty".into(),
        });
    }

    if config.auction.quick_bid_increments.contains(&0) {
        return Err(ConfigError::ValidationError {
            field: "auction.quick_bid_increments".into(),
            message: "increments must be > 0".into(),
        });
    }

    if config.teams.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "teams".into(),
            message: "at least one team is required".into(),
        });
    }

    let mut seen = HashSet::new();
    for team in &config.teams {
        if team.id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "teams.id".into(),
                message: format!("team '{}' has an empty id", team.name),
            });
        }
        if !seen.insert(team.id.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "teams.id".into(),
                message: format!("duplicate team id '{}'", team.id),
            });
        }
        if team.budget == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("teams.{}.budget", team.id),
                message: "must be greater than 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
