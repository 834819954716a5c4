use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "WEBCORE_CONFIG";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Listen port plus the set of file routes to register.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// When empty, the default site routes are installed instead.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// A path served from a file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub file: PathBuf,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_content_type() -> String {
    crate::http::response::DEFAULT_CONTENT_TYPE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            routes: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the file named by `WEBCORE_CONFIG` (or the defaults), then
    /// applies a `PORT` override.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        if let Ok(port) = std::env::var(PORT_ENV) {
            cfg.port = parse_port(&port)?;
        }

        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Overrides the port from a command-line argument, if one was given.
    pub fn with_port_arg(mut self, arg: Option<&str>) -> anyhow::Result<Self> {
        if let Some(arg) = arg {
            self.port = parse_port(arg)?;
        }
        Ok(self)
    }
}

fn parse_port(raw: &str) -> anyhow::Result<u16> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid port {:?}", raw))
}
