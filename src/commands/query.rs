//! Query command implementation.
//!
//! Runs the same validation and extraction as the HTTP endpoint for a single
//! hostname and prints the response.

use diskstat_api::{DiskStatsResponse, ExtractionError};

use crate::cli::OutputFormat;
use crate::config::Config;

/// Looks up disk statistics for `hostname` and prints them.
pub fn command_query(
    hostname: &str,
    format: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let validator = config.hostname_validator();
    if !validator.validate(hostname) {
        eprintln!(
            "❌ Invalid hostname: {:?} (policy: {})",
            hostname,
            validator.policy()
        );
        std::process::exit(1);
    }

    let extractor = config.extractor();
    match extractor.get_stats(hostname) {
        Ok(stats) => {
            println!("{}", render_response(&DiskStatsResponse::from(stats), format)?);
            Ok(())
        }
        Err(e @ ExtractionError::NoStatsFound { .. }) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        Err(e @ ExtractionError::CommandExecution(_)) => {
            eprintln!("❌ {}", e);
            eprintln!(
                "   Check that '{}' is installed and {} exists",
                config.df_command().program(),
                extractor.device_path(hostname)
            );
            std::process::exit(1);
        }
    }
}

fn render_response(
    response: &DiskStatsResponse,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(response)?,
        OutputFormat::Yaml => serde_yaml::to_string(response)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskstat_api::DiskStat;

    #[test]
    fn test_render_response_json() {
        let response = DiskStatsResponse::from(vec![DiskStat {
            host_name: "sda1".into(),
            path: "/dev/sda1".into(),
            size: 10,
            used: 5.0,
            fs_type: "ext4".into(),
            read: 0.0,
            write: 0.0,
        }]);

        let json = render_response(&response, OutputFormat::Json).unwrap();
        let parsed: DiskStatsResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);

        let yaml = render_response(&response, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("hostname: sda1"));
        assert!(yaml.contains("type: ext4"));
    }
}
