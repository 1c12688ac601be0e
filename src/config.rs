//! Configuration management for diskstat-api.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use diskstat_api::{
    DfCommand, DiskStatExtractor, FieldLayout, HostnamePolicy, HostnameValidator, ParseOptions,
    DEFAULT_DEVICE_ROOT, DEFAULT_MAX_HOSTNAME_LEN,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Args, ConfigFormat, LogLevel};

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9216;

/// Upper bound accepted for `max_hostname_len`.
const HOSTNAME_LEN_LIMIT: usize = 255;

/// Service configuration. Unset fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Feature flags
    pub enable_health: Option<bool>,

    // Logging
    pub log_level: Option<String>,

    // Disk usage command
    #[serde(alias = "device-root")]
    pub device_root: Option<String>,
    #[serde(alias = "df-command")]
    pub df_command: Option<String>,
    #[serde(alias = "df-args")]
    pub df_args: Option<Vec<String>>,
    #[serde(alias = "skip-header")]
    pub skip_header: Option<bool>,

    // Hostname validation
    /// "strict" | "permissive"
    #[serde(alias = "hostname-policy")]
    pub hostname_policy: Option<String>,
    #[serde(alias = "max-hostname-len")]
    pub max_hostname_len: Option<usize>,

    // TLS/SSL Configuration
    #[serde(alias = "enable-tls")]
    pub enable_tls: Option<bool>,
    #[serde(alias = "tls-cert-path")]
    pub tls_cert_path: Option<String>,
    #[serde(alias = "tls-key-path")]
    pub tls_key_path: Option<String>,

    // Must stay last: TOML tables cannot precede plain values
    #[serde(alias = "field-layout")]
    pub field_layout: Option<FieldLayout>,
}

impl Default for Config {
    fn default() -> Self {
        let df = DfCommand::default();
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            enable_health: Some(true),
            log_level: Some(LogLevel::default().as_str().into()),
            device_root: Some(DEFAULT_DEVICE_ROOT.to_string()),
            df_command: Some(df.program().to_string()),
            df_args: Some(df.args().to_vec()),
            skip_header: Some(true),
            hostname_policy: Some(HostnamePolicy::Strict.to_string()),
            max_hostname_len: Some(DEFAULT_MAX_HOSTNAME_LEN),
            enable_tls: Some(false),
            tls_cert_path: None,
            tls_key_path: None,
            field_layout: Some(FieldLayout::default()),
        }
    }
}

impl Config {
    /// Effective hostname policy. Call after `validate_effective_config`.
    pub fn hostname_policy(&self) -> HostnamePolicy {
        self.hostname_policy
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or_default()
    }

    pub fn hostname_validator(&self) -> HostnameValidator {
        HostnameValidator::new(
            self.hostname_policy(),
            self.max_hostname_len.unwrap_or(DEFAULT_MAX_HOSTNAME_LEN),
        )
    }

    pub fn df_command(&self) -> DfCommand {
        let default = DfCommand::default();
        DfCommand::new(
            self.df_command
                .clone()
                .unwrap_or_else(|| default.program().to_string()),
            self.df_args.clone().unwrap_or_else(|| default.args().to_vec()),
        )
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            layout: self.field_layout.unwrap_or_default(),
            skip_header: self.skip_header.unwrap_or(true),
        }
    }

    /// Effective log level. Call after `validate_effective_config`.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|l| LogLevel::parse(l).ok())
            .unwrap_or_default()
    }

    pub fn device_root(&self) -> &str {
        self.device_root.as_deref().unwrap_or(DEFAULT_DEVICE_ROOT)
    }

    /// Builds the extractor described by this configuration.
    pub fn extractor(&self) -> DiskStatExtractor {
        DiskStatExtractor::new(self.df_command())
            .with_device_root(self.device_root())
            .with_options(self.parse_options())
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(policy) = cfg.hostname_policy.as_deref() {
        policy.parse::<HostnamePolicy>()?;
    }

    if let Some(level) = cfg.log_level.as_deref() {
        LogLevel::parse(level)?;
    }

    if let Some(max_len) = cfg.max_hostname_len {
        if max_len == 0 || max_len > HOSTNAME_LEN_LIMIT {
            return Err(format!(
                "max_hostname_len must be between 1 and {}, got {}",
                HOSTNAME_LEN_LIMIT, max_len
            )
            .into());
        }
    }

    if cfg.device_root.as_deref().is_some_and(|r| r.trim().is_empty()) {
        return Err("device_root must not be empty".into());
    }

    if cfg.df_command.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err("df_command must not be empty".into());
    }

    if let Some(layout) = &cfg.field_layout {
        layout.validate()?;
    }

    // TLS validation
    if cfg.enable_tls.unwrap_or(false) {
        let cert_path = cfg.tls_cert_path.as_deref();
        let key_path = cfg.tls_key_path.as_deref();

        match (cert_path, key_path) {
            (None, None) => {
                return Err(
                    "TLS is enabled but neither tls_cert_path nor tls_key_path are set".into(),
                );
            }
            (Some(_), None) => {
                return Err("TLS is enabled but tls_key_path is not set".into());
            }
            (None, Some(_)) => {
                return Err("TLS is enabled but tls_cert_path is not set".into());
            }
            (Some(cert), Some(key)) => {
                check_pem_file(cert, "certificate")?;
                check_pem_file(key, "private key")?;
            }
        }
    }

    Ok(())
}

/// Checks that a TLS file exists, is readable and not empty.
fn check_pem_file(path: &str, kind: &str) -> Result<(), Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("TLS {} file not found: {}", kind, path).into());
    }

    match fs::metadata(p) {
        Ok(meta) if meta.len() == 0 => Err(format!("TLS {} file is empty: {}", kind, path).into()),
        Err(e) => Err(format!("TLS {} file is not readable: {} ({})", kind, path, e).into()),
        Ok(_) => Ok(()),
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    // Only override port if the user supplied it on the CLI.
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(level) = args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    if args.disable_health {
        config.enable_health = Some(false);
    }

    if let Some(root) = &args.device_root {
        config.device_root = Some(root.clone());
    }
    if let Some(cmd) = &args.df_command {
        config.df_command = Some(cmd.clone());
    }
    if let Some(policy) = &args.hostname_policy {
        config.hostname_policy = Some(policy.clone());
    }

    // TLS configuration: CLI wins if provided
    if args.enable_tls {
        config.enable_tls = Some(true);
    }
    if let Some(cert_path) = &args.tls_cert {
        config.tls_cert_path = Some(cert_path.to_string_lossy().to_string());
    }
    if let Some(key_path) = &args.tls_key {
        config.tls_key_path = Some(key_path.to_string_lossy().to_string());
    }

    Ok(config)
}

/// Loads a config file, probing the default locations if no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/diskstat-api/config.yaml",
                "/etc/diskstat-api/config.yml",
                "/etc/diskstat-api/config.json",
                "./diskstat-api.yaml",
                "./diskstat-api.yml",
                "./diskstat-api.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
