//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("diskstat-api.yaml"),
    };

    let is_yaml = matches!(format, ConfigFormat::Yaml);
    let mut content = render_config(&config, format)?;
    if commented && is_yaml {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# diskstat-api Configuration
# ==========================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces)
# port: 9216                   # HTTP port
# enable_health: true          # Enable /health endpoint
# log_level: "info"            # off, error, warn, info, debug, trace (--log-level wins)
#
# Disk Usage Command
# ------------------
# device_root: "/dev/"         # Prefix joined with the requested hostname
# df_command: "df"             # Program run as: <df_command> <df_args...> <device path>
# df_args: ["-P", "-k"]        # POSIX rows in 1K blocks
# skip_header: true            # Treat the first output line as the column header
# field_layout:                # Zero-based column of each value in a data row
#   fs_type: 0
#   size: 1
#   used: 2
#   read: 8                    # Rows shorter than this report read = 0
#   write: 9                   # Rows shorter than this report write = 0
#
# Hostname Validation
# -------------------
# hostname_policy: "strict"    # strict = [A-Za-z0-9][A-Za-z0-9._-]*, no "..";
#                              # permissive = any non-empty string
# max_hostname_len: 64         # Only applies to the strict policy
#
# TLS/SSL Configuration
# ---------------------
# enable_tls: false            # Enable HTTPS (default: false)
# tls_cert_path: null          # Path to TLS certificate (PEM format)
# tls_key_path: null           # Path to TLS private key (PEM format)
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn test_generated_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diskstat-api.yaml");

        command_config(Some(path.clone()), ConfigFormat::Yaml, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# diskstat-api Configuration"));

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.port, Config::default().port);
        assert_eq!(config.df_command(), Config::default().df_command());
    }
}
