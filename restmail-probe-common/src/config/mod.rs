//! Probe configuration.
//!
//! A [`ProbeConfig`] is assembled once at startup (defaults, then an
//! optional RON file, then command-line overrides), validated, and handed to
//! the scenario runner. Nothing reads configuration from global state after
//! that point.
//!
//! ## Modules
//!
//! - [`mode`]: deployment modes and their default ports
//! - [`endpoint`]: a resolved host/port/timeout triple
//! - [`timeouts`]: per-endpoint exchange timeouts

pub mod endpoint;
pub mod mode;
pub mod timeouts;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use endpoint::Endpoint;
pub use mode::Mode;
pub use timeouts::Timeouts;

use crate::ConfigError;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "RESTMAIL_PROBE_CONFIG";

/// Line terminator used inside the mail session transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Bare `\n`, accepted by the restmail receiver's line reader.
    #[default]
    Lf,
    /// `\r\n`, as RFC 5321 requires.
    Crlf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Recipients used by the two policy scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    /// A recipient in a domain the service accepts.
    #[serde(default = "defaults::accepted")]
    pub accepted: String,

    /// A recipient in a domain the service rejects.
    #[serde(default = "defaults::rejected")]
    pub rejected: String,
}

impl Default for Recipients {
    fn default() -> Self {
        Self {
            accepted: defaults::accepted(),
            rejected: defaults::rejected(),
        }
    }
}

/// Everything a probe run needs to know about its targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "defaults::host")]
    pub host: String,

    /// Overrides the mode's default policy port.
    #[serde(default)]
    pub policy_port: Option<u16>,

    /// Overrides the mode's default delivery port.
    #[serde(default)]
    pub delivery_port: Option<u16>,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(default)]
    pub line_ending: LineEnding,

    #[serde(default)]
    pub recipients: Recipients,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            host: defaults::host(),
            policy_port: None,
            delivery_port: None,
            timeouts: Timeouts::default(),
            line_ending: LineEnding::default(),
            recipients: Recipients::default(),
        }
    }
}

impl ProbeConfig {
    /// Parses a configuration from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_ron(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a RON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_ron(&text, path)
    }

    /// Loads the configuration from `explicit`, else from the file named by
    /// [`CONFIG_ENV`], else falls back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is missing or invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(env_path);
            if !path.exists() {
                return Err(ConfigError::MissingFile(path));
            }
            return Self::from_file(&path);
        }

        Ok(Self::default())
    }

    /// Checks the values that would make every exchange fail before it
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if self.policy_port() == 0 {
            return Err(ConfigError::InvalidPort {
                service: "policy",
                port: 0,
            });
        }

        if self.delivery_port() == 0 {
            return Err(ConfigError::InvalidPort {
                service: "delivery",
                port: 0,
            });
        }

        if self.timeouts.policy_ms == 0 {
            return Err(ConfigError::ZeroTimeout { service: "policy" });
        }

        if self.timeouts.delivery_ms == 0 {
            return Err(ConfigError::ZeroTimeout {
                service: "delivery",
            });
        }

        Ok(())
    }

    /// The effective policy port: the override if set, else the mode default.
    #[must_use]
    pub fn policy_port(&self) -> u16 {
        self.policy_port.unwrap_or_else(|| self.mode.policy_port())
    }

    /// The effective delivery port: the override if set, else the mode default.
    #[must_use]
    pub fn delivery_port(&self) -> u16 {
        self.delivery_port
            .unwrap_or_else(|| self.mode.delivery_port())
    }

    #[must_use]
    pub fn policy_endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.policy_port(), self.timeouts.policy())
    }

    #[must_use]
    pub fn delivery_endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.delivery_port(), self.timeouts.delivery())
    }
}

mod defaults {
    pub fn host() -> String {
        "localhost".to_string()
    }

    pub fn accepted() -> String {
        "user@restmail.org".to_string()
    }

    pub fn rejected() -> String {
        "user@example.com".to_string()
    }
}
