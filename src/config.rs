use std::fmt;
use std::path;
use std::sync;

use lazy_static::lazy_static;
use serde_derive::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fire expansion listeners even when `set_expanded` leaves the flag as it was.
    pub notify_unchanged_expansion: bool,

    /// Drop cached view nodes that fell out of the tree whenever the document
    /// reports changed children.
    pub evict_on_children_changed: bool,

    pub filter_case_sensitive: bool,

    #[serde(skip)]
    pub version: usize, /* incremented when config changes */
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notify_unchanged_expansion: false,
            evict_on_children_changed: false,
            filter_case_sensitive: false,
            version: 0,
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    IoError(std::io::Error),
    TomlError(toml::de::Error),
    XdgError(xdg::BaseDirectoriesError),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> LoadError {
        LoadError::IoError(e)
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> LoadError {
        LoadError::TomlError(e)
    }
}

impl From<xdg::BaseDirectoriesError> for LoadError {
    fn from(e: xdg::BaseDirectoriesError) -> LoadError {
        LoadError::XdgError(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::IoError(e) => write!(f, "failed to read config: {}", e),
            LoadError::TomlError(e) => write!(f, "malformed config: {}", e),
            LoadError::XdgError(e) => write!(f, "couldn't locate config directory: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Config, LoadError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path<P: AsRef<path::Path>>(path: P) -> Result<Config, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Config::from_toml_str(&text)
    }
}

lazy_static! {
    static ref INSTANCE: sync::RwLock<Config> = sync::RwLock::new(Config::default());
}

pub fn get() -> sync::RwLockReadGuard<'static, Config> {
    INSTANCE.read().unwrap_or_else(sync::PoisonError::into_inner)
}

pub fn set() -> sync::RwLockWriteGuard<'static, Config> {
    INSTANCE.write().unwrap_or_else(sync::PoisonError::into_inner)
}

/// Replaces the global config, bumping its version.
pub fn install(config: Config) {
    let mut current = set();
    let version = current.version + 1;
    *current = Config { version, ..config };
}

/// Installs `outline/outline.toml` from the XDG config directories, if one
/// exists. Returns whether a file was found.
pub fn load_user_config() -> Result<bool, LoadError> {
    let dirs = xdg::BaseDirectories::with_prefix("outline")?;

    match dirs.find_config_file("outline.toml") {
        Some(path) => {
            install(Config::load_from_path(path)?);
            Ok(true)
        },
        None => Ok(false),
    }
}
