//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command line flags (which also read `WARDEN_*` environment variables).
//! The result is shared read-only by every worker for the life of the server.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::http::mime::MimePolicy;

/// Read-only settings consumed by the listener and every connection handler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interface to bind, e.g. "0.0.0.0"
    pub host: String,
    pub port: u16,
    /// Number of connections handled concurrently (at least 1)
    pub workers: usize,
    /// Folder files are served from; empty means the working directory
    pub root: String,
    /// Pending-connection queue length passed to `listen`
    pub backlog: u32,
    pub mime_policy: MimePolicy,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 1,
            root: String::new(),
            backlog: 4096,
            mime_policy: MimePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Command line surface. Every flag is optional so that only the values
/// actually given override the file and the defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "warden", version, about = "Serve static files from a root folder")]
pub struct Cli {
    /// YAML file with server settings
    #[arg(short, long, env = "WARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "WARDEN_HOST")]
    pub host: Option<String>,

    #[arg(short, long, env = "WARDEN_PORT")]
    pub port: Option<u16>,

    #[arg(short, long, env = "WARDEN_WORKERS")]
    pub workers: Option<usize>,

    /// Folder to serve (defaults to the working directory)
    #[arg(short, long, env = "WARDEN_ROOT")]
    pub root: Option<String>,

    #[arg(long)]
    pub backlog: Option<u32>,

    #[arg(long, value_enum)]
    pub mime_policy: Option<MimePolicy>,

    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Config {
    /// Parses the process arguments and builds the effective configuration.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(host) = cli.host {
            cfg.host = host;
        }
        if let Some(port) = cli.port {
            cfg.port = port;
        }
        if let Some(workers) = cli.workers {
            cfg.workers = workers;
        }
        if let Some(root) = cli.root {
            cfg.root = root;
        }
        if let Some(backlog) = cli.backlog {
            cfg.backlog = backlog;
        }
        if let Some(policy) = cli.mime_policy {
            cfg.mime_policy = policy;
        }
        if let Some(level) = cli.log_level {
            cfg.log_level = level;
        }

        Ok(cfg.normalized())
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg.normalized())
    }

    /// "host:port" as handed to the resolver.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn normalized(mut self) -> Self {
        self.workers = self.workers.max(1);
        self
    }
}
