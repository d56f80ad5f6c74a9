use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use blocksieve_core::domain::phone::{DEFAULT_COUNTRY_CODE, DEFAULT_NATIONAL_NUMBER_LEN};
use blocksieve_core::{OutputFormat, PhoneNormalizer};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "blocksieve";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_USER_AGENT: &str = "blocksieve";
pub const DEFAULT_MAX_ROWS_PER_PART: usize = 50_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub blocklist: BlocklistConfig,
    pub phone: PhoneConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct BlocklistConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct PhoneConfig {
    pub country_code: String,
    pub national_number_len: usize,
}

impl PhoneConfig {
    pub fn normalizer(&self) -> PhoneNormalizer {
        // Values are validated in merge_config.
        PhoneNormalizer::new(&self.country_code, self.national_number_len).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub max_rows_per_part: usize,
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            blocklist: BlocklistConfig {
                url: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            phone: PhoneConfig {
                country_code: DEFAULT_COUNTRY_CODE.to_string(),
                national_number_len: DEFAULT_NATIONAL_NUMBER_LEN,
            },
            output: OutputConfig {
                dir: None,
                max_rows_per_part: DEFAULT_MAX_ROWS_PER_PART,
                format: OutputFormat::Xlsx,
            },
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
    #[error("invalid blocklist url: {0}")]
    InvalidBlocklistUrl(String),
    #[error("invalid blocklist timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid phone settings: {0}")]
    InvalidPhone(String),
    #[error("invalid max_rows_per_part value: {0}")]
    InvalidMaxRowsPerPart(usize),
    #[error("invalid output dir: {0}")]
    InvalidOutputDir(PathBuf),
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
    blocklist: Option<BlocklistFile>,
    phone: Option<PhoneFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlocklistFile {
    url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    country_code: Option<String>,
    national_number_len: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    dir: Option<PathBuf>,
    max_rows_per_part: Option<usize>,
    format: Option<OutputFormat>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Accepts only absolute http(s) URLs.
pub fn validate_blocklist_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBlocklistUrl(redact(trimmed)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidBlocklistUrl(redact(trimmed)));
    }
    Ok(trimmed.to_string())
}

// Blocklist URLs may carry credentials in the query string.
fn redact(raw: &str) -> String {
    match raw.split_once('?') {
        Some((base, _)) => format!("{base}?..."),
        None => raw.to_string(),
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(blocklist) = parsed.blocklist {
        if let Some(url) = blocklist.url {
            config.blocklist.url = Some(validate_blocklist_url(&url)?);
        }
        if let Some(timeout) = blocklist.timeout_secs {
            if timeout == 0 || timeout > MAX_TIMEOUT_SECS {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
            config.blocklist.timeout_secs = timeout;
        }
        if let Some(agent) = blocklist.user_agent {
            let agent = agent.trim();
            if !agent.is_empty() {
                config.blocklist.user_agent = agent.to_string();
            }
        }
    }

    if let Some(phone) = parsed.phone {
        if let Some(code) = phone.country_code {
            config.phone.country_code = code.trim().trim_start_matches('+').to_string();
        }
        if let Some(len) = phone.national_number_len {
            config.phone.national_number_len = len;
        }
        PhoneNormalizer::new(&config.phone.country_code, config.phone.national_number_len)
            .map_err(|err| ConfigError::InvalidPhone(err.to_string()))?;
    }

    if let Some(output) = parsed.output {
        if let Some(dir) = output.dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidOutputDir(dir));
            }
            config.output.dir = Some(dir);
        }
        if let Some(max_rows) = output.max_rows_per_part {
            if max_rows == 0 {
                return Err(ConfigError::InvalidMaxRowsPerPart(max_rows));
            }
            config.output.max_rows_per_part = max_rows;
        }
        if let Some(format) = output.format {
            config.output.format = format;
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
