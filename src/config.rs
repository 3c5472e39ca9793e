//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.pointstat.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".pointstat.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Batch file settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Description of the exported collection, shown in the report.
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Static file server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the batch exports live and how they are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the batch files.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File name prefix; batches are `<prefix>_<n>.json`.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Number of batches to load.
    #[serde(default = "default_batches")]
    pub batches: usize,

    /// Load every matching batch in `dir` instead of a fixed count.
    #[serde(default)]
    pub discover: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            prefix: default_prefix(),
            batches: default_batches(),
            discover: false,
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_prefix() -> String {
    "qdrant_batch".to_string()
}

fn default_batches() -> usize {
    4
}

/// Collection metadata. Used for the status banner and the curl examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Qdrant server URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Collection name.
    #[serde(default = "default_collection")]
    pub name: String,

    /// Vector dimensions.
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,

    /// Embedding model that produced the vectors.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Collection status as reported by the server.
    #[serde(default = "default_status")]
    pub status: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            name: default_collection(),
            vector_size: default_vector_size(),
            embedding_model: default_embedding_model(),
            status: default_status(),
        }
    }
}

fn default_server_url() -> String {
    "http://qdr.vcia.com.br:6333".to_string()
}

fn default_collection() -> String {
    "knowledge_consolidator".to_string()
}

fn default_vector_size() -> usize {
    768
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_status() -> String {
    "Green".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Number of file names listed before the remainder is summarized.
    #[serde(default = "default_max_listed_files")]
    pub max_listed_files: usize,

    /// Participants shown for the sample point's first chain.
    #[serde(default = "default_sample_participants")]
    pub sample_participants: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            max_listed_files: default_max_listed_files(),
            sample_participants: default_sample_participants(),
        }
    }
}

fn default_max_listed_files() -> usize {
    25
}

fn default_sample_participants() -> usize {
    5
}

/// Static file server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory to serve.
    #[serde(default = "default_dir")]
    pub directory: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            directory: default_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        match args.command {
            Some(Command::Report {
                ref dir,
                ref prefix,
                batches,
                discover,
                format,
                ..
            }) => {
                if let Some(dir) = dir {
                    self.input.dir = dir.clone();
                }
                if let Some(prefix) = prefix {
                    self.input.prefix = prefix.clone();
                }
                if let Some(batches) = batches {
                    self.input.batches = batches;
                    self.input.discover = false;
                }
                if discover {
                    self.input.discover = true;
                }
                if let Some(format) = format {
                    self.report.format = format;
                }
            }
            Some(Command::Serve {
                ref host,
                port,
                ref dir,
            }) => {
                if let Some(host) = host {
                    self.server.host = host.clone();
                }
                if let Some(port) = port {
                    self.server.port = port;
                }
                if let Some(dir) = dir {
                    self.server.directory = dir.clone();
                }
            }
            None => {}
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
