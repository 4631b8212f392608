use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use payhook_core::domain::phone::{CountryPrefix, PhoneRules};
use payhook_core::nodes::NodeNames;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "payhook";
const CONFIG_FILENAME: &str = "config.toml";

pub const MAX_MIN_DIGITS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub phone: PhoneRules,
    pub nodes: NodeNames,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub envelope: bool,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            envelope: true,
            pretty: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid phone.country_prefix value: {0:?}")]
    InvalidCountryPrefix(String),
    #[error("invalid phone.min_digits value: {0}")]
    InvalidMinDigits(usize),
    #[error("invalid node name for nodes.{field}")]
    InvalidNodeName { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    phone: Option<PhoneFile>,
    nodes: Option<NodesFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    country_prefix: Option<String>,
    min_digits: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodesFile {
    transaction: Option<String>,
    webhook: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    envelope: Option<bool>,
    pretty: Option<bool>,
}

/// Loads the config file, falling back to defaults when the implicit
/// location is unavailable. An explicit `--config` path must exist.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match (resolve_config_path(config_path), required) {
        (Ok(path), _) => path,
        (Err(ConfigError::MissingHomeDir | ConfigError::InvalidConfigPath(_)), false) => {
            return Ok(AppConfig::default())
        }
        (Err(err), _) => return Err(err),
    };
    Ok(load_at_path(&path, required)?.unwrap_or_default())
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom {
        return non_empty_path(path);
    }
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => non_empty_path(PathBuf::from(dir))?,
        None => dirs::home_dir()
            .ok_or(ConfigError::MissingHomeDir)?
            .join(".config"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
}

fn non_empty_path(path: PathBuf) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidConfigPath(path));
    }
    Ok(path)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return if required {
                Err(ConfigError::MissingConfigFile(path.to_path_buf()))
            } else {
                Ok(None)
            };
        }
        Err(source) => return Err(read_error(path, source)),
    };
    ensure_private(path, &metadata)?;

    let contents = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    merge_config(parsed).map(Some)
}

fn read_error(path: &Path, source: io::Error) -> ConfigError {
    ConfigError::Read {
        path: path.to_path_buf(),
        source,
    }
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(phone) = parsed.phone {
        if let Some(prefix) = phone.country_prefix {
            config.phone.country_prefix = CountryPrefix::new(&prefix)
                .map_err(|_| ConfigError::InvalidCountryPrefix(prefix.clone()))?;
        }
        if let Some(min_digits) = phone.min_digits {
            if min_digits == 0 || min_digits > MAX_MIN_DIGITS {
                return Err(ConfigError::InvalidMinDigits(min_digits));
            }
            config.phone.min_digits = min_digits;
        }
    }

    if let Some(nodes) = parsed.nodes {
        if let Some(name) = nodes.transaction {
            config.nodes.transaction = validate_node_name(name, "transaction")?;
        }
        if let Some(name) = nodes.webhook {
            config.nodes.webhook = validate_node_name(name, "webhook")?;
        }
    }

    if let Some(output) = parsed.output {
        if let Some(envelope) = output.envelope {
            config.output.envelope = envelope;
        }
        if let Some(pretty) = output.pretty {
            config.output.pretty = pretty;
        }
    }

    Ok(config)
}

fn validate_node_name(name: String, field: &'static str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidNodeName { field });
    }
    Ok(name)
}

/// Rejects config files readable or writable by group or others.
#[cfg(unix)]
fn ensure_private(path: &Path, metadata: &fs::Metadata) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if metadata.permissions().mode() & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_private(_path: &Path, _metadata: &fs::Metadata) -> Result<()> {
    Ok(())
}
