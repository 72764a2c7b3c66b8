//! Server configuration loading.
//!
//! The expected YAML structure is (every key optional):
//! ```yaml
//! server:
//!   host: "0.0.0.0"
//!   port: 8000
//!   allowed_origins: ["*"]
//!   max_body_bytes: 262144
//! compiler:
//!   max_total_slots: 24
//!   default_slot_minutes: 55
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use chronosync_core::clock::MINUTES_PER_DAY;
use chronosync_core::CompilerSettings;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

/// Origin value that allows every origin.
pub const ANY_ORIGIN: &str = "*";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Maps directly onto the YAML file layout.  Callers work with
/// [`ServerConfig`] instead.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    compiler: CompilerSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
    max_body_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct CompilerSection {
    max_total_slots: Option<u32>,
    default_slot_minutes: Option<u32>,
}

// ── Public configuration ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS.  `"*"` allows any.
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub compiler: CompilerSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            allowed_origins: vec![ANY_ORIGIN.to_owned()],
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            compiler: CompilerSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Parse and validate the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading server configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parse and validate YAML text.  An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let defaults = ServerConfig::default();
        let config = ServerConfig {
            host: file.server.host.unwrap_or(defaults.host),
            port: file.server.port.unwrap_or(defaults.port),
            allowed_origins: file
                .server
                .allowed_origins
                .unwrap_or(defaults.allowed_origins),
            max_body_bytes: file.server.max_body_bytes.unwrap_or(defaults.max_body_bytes),
            compiler: CompilerSettings {
                max_total_slots: file
                    .compiler
                    .max_total_slots
                    .unwrap_or(defaults.compiler.max_total_slots),
                default_slot_minutes: file
                    .compiler
                    .default_slot_minutes
                    .unwrap_or(defaults.compiler.default_slot_minutes),
            },
        };
        config.validate()?;

        debug!(
            host = %config.host,
            port = config.port,
            origins = ?config.allowed_origins,
            max_body_bytes = config.max_body_bytes,
            max_total_slots = config.compiler.max_total_slots,
            default_slot_minutes = config.compiler.default_slot_minutes,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.max_body_bytes == 0 {
            bail!("server.max_body_bytes must be non-zero");
        }
        // A day holds at most one one-minute slot per minute.
        let max_slots = self.compiler.max_total_slots;
        if max_slots == 0 || max_slots > MINUTES_PER_DAY {
            bail!(
                "compiler.max_total_slots must be between 1 and {MINUTES_PER_DAY}, got {max_slots}"
            );
        }
        let minutes = self.compiler.default_slot_minutes;
        if minutes == 0 || minutes >= MINUTES_PER_DAY {
            bail!(
                "compiler.default_slot_minutes must be between 1 and {}, got {minutes}",
                MINUTES_PER_DAY - 1
            );
        }
        Ok(())
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allowed_origins
            .iter()
            .any(|allowed| allowed == ANY_ORIGIN || allowed == origin)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
