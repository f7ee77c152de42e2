//! CLI configuration management
//!
//! Handles loading, bootstrapping and layering the `~/.piorc` configuration.

use pio_core::api::DEFAULT_API_URL;
use pio_core::{PioError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file in the home directory
pub const CONFIG_FILE_NAME: &str = ".piorc";

/// Written when the configuration file does not exist yet
///
/// Valid both as TOML and as the older INI-style `.piorc`.
const CONFIG_TEMPLATE: &str = r#"[auth]
token = ""
"#;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT: u64 = 30;

/// `[auth]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthSection {
    /// OAuth token used for every request
    #[serde(default)]
    pub token: String,
}

/// `[api]` section, optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    /// API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// On-disk configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub api: ApiSection,
}

impl ConfigFile {
    /// Read the configuration, creating it with an empty token first if needed
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            eprintln!("Initializing config file in {}", path.display());
            write_private(path, CONFIG_TEMPLATE)?;
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| {
            PioError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Parse TOML, falling back to INI-style `key=value` lines with bare values
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        match toml::from_str(content) {
            Ok(config) => Ok(config),
            Err(e) => {
                debug!(error = %e, "config is not TOML, retrying as INI-style");
                toml::from_str(&quote_bare_values(content)).map_err(|_| e)
            }
        }
    }
}

/// Rewrite `key=value` lines so that unquoted string values become TOML strings
fn quote_bare_values(content: &str) -> String {
    let mut output = String::with_capacity(content.len());

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(comment) = trimmed.strip_prefix(';') {
            output.push('#');
            output.push_str(comment);
        } else if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            output.push_str(trimmed);
        } else if let Some((key, value)) = trimmed.split_once('=') {
            let value = value.trim();
            let keep = value.starts_with('"')
                || value.starts_with('\'')
                || (!value.is_empty() && value.chars().all(|c| c.is_ascii_digit()));
            output.push_str(key.trim());
            output.push_str(" = ");
            if keep {
                output.push_str(value);
            } else {
                output.push('"');
                output.push_str(&value.replace('\\', "\\\\").replace('"', "\\\""));
                output.push('"');
            }
        } else {
            output.push_str(trimmed);
        }
        output.push('\n');
    }

    output
}

#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}

/// Default configuration file path (`~/.piorc`)
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or_else(|| PioError::Config("Cannot determine home directory".to_string()))
}

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Path of the configuration file the token came from
    pub config_path: PathBuf,

    /// OAuth token, never empty
    pub token: String,

    /// API base URL
    pub api_url: String,

    /// Output format ("table" or "json")
    pub output_format: String,

    /// Enable verbose logging
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl CliConfig {
    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    token: Option<String>,
    api_url: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API URL (with validation)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.api_url = Some(url);
        Ok(self)
    }

    /// Set token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Load configuration from file, creating it on first run
    ///
    /// Values already set on the builder take precedence over the file.
    pub fn with_config_file(self, path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => default_config_path()?,
        };
        let file = ConfigFile::load_or_init(&path)?;
        debug!(path = %path.display(), "loaded config file");

        let file_url = match file.api.url {
            Some(url) => {
                Self::validate_url(&url)?;
                Some(url)
            }
            None => None,
        };
        let file_timeout = match file.api.timeout {
            Some(timeout) => {
                Self::validate_timeout(timeout)?;
                Some(timeout)
            }
            None => None,
        };

        Ok(Self {
            config_path: Some(path),
            token: self.token.or(Some(file.auth.token)),
            api_url: self.api_url.or(file_url),
            timeout: self.timeout.or(file_timeout),
            ..self
        })
    }

    /// Apply environment variable overrides
    ///
    /// Unlike the config file, environment values take precedence over
    /// earlier layers. Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var("PIO_TOKEN") {
            if !token.is_empty() {
                self.token = Some(token);
            }
        }

        if let Ok(url) = std::env::var("PIO_API_URL") {
            if Self::validate_url(&url).is_ok() {
                self.api_url = Some(url);
            }
        }

        if let Ok(format) = std::env::var("PIO_FORMAT") {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        if let Ok(verbose) = std::env::var("PIO_VERBOSE") {
            self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
        }

        if let Ok(timeout) = std::env::var("PIO_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        self
    }

    /// Build the final configuration with validation
    ///
    /// # Errors
    ///
    /// Returns [`PioError::MissingToken`] when no layer provided a token.
    pub fn build(self) -> Result<CliConfig> {
        let config_path = match self.config_path {
            Some(path) => path,
            None => default_config_path()?,
        };

        let token = self.token.unwrap_or_default().trim().to_string();
        if token.is_empty() {
            return Err(PioError::MissingToken {
                path: config_path.display().to_string(),
            });
        }

        let api_url = self
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let output_format = self.output_format.unwrap_or_else(|| "table".to_string());
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        // Validate final values
        Self::validate_url(&api_url)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            config_path,
            token,
            api_url,
            output_format,
            verbose: self.verbose.unwrap_or(false),
            timeout,
        })
    }

    /// Validate URL format
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(PioError::Config("API URL cannot be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PioError::Config(
                "API URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(PioError::Config(format!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            ))),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(PioError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if timeout > 300 {
            return Err(PioError::Config(
                "Timeout must be less than or equal to 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}
