//! Disk statistics extraction from tabular disk usage output.
//!
//! The extractor resolves `<device_root><host_name>`, asks its
//! [`DiskUsageSource`] for a report and turns the first data row into a
//! [`DiskStat`].
//!
//! Parsing rules:
//! - lines are split on whitespace; lines with fewer than [`MIN_FIELDS`]
//!   fields are skipped
//! - the first non-blank line is treated as the column header when
//!   [`ParseOptions::skip_header`] is set
//! - numeric fields that fail to parse become zero instead of failing the row
//! - only the first qualifying row is returned

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractionError;
use crate::model::DiskStat;
use crate::source::DiskUsageSource;

/// Minimum number of fields for a line to be considered a data row.
pub const MIN_FIELDS: usize = 6;

/// Default prefix joined with the hostname to form the device path.
pub const DEFAULT_DEVICE_ROOT: &str = "/dev/";

/// Column positions of each value within a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    #[serde(default = "default_type_index")]
    pub fs_type: usize,
    #[serde(default = "default_size_index")]
    pub size: usize,
    #[serde(default = "default_used_index")]
    pub used: usize,
    /// Read counter column; rows too short to contain it report 0.
    #[serde(default = "default_read_index")]
    pub read: usize,
    /// Write counter column; rows too short to contain it report 0.
    #[serde(default = "default_write_index")]
    pub write: usize,
}

fn default_type_index() -> usize {
    0
}
fn default_size_index() -> usize {
    1
}
fn default_used_index() -> usize {
    2
}
fn default_read_index() -> usize {
    8
}
fn default_write_index() -> usize {
    9
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            fs_type: default_type_index(),
            size: default_size_index(),
            used: default_used_index(),
            read: default_read_index(),
            write: default_write_index(),
        }
    }
}

impl FieldLayout {
    /// Checks that the mandatory columns fit inside a minimal data row.
    pub fn validate(&self) -> Result<(), String> {
        for (name, index) in [
            ("fs_type", self.fs_type),
            ("size", self.size),
            ("used", self.used),
        ] {
            if index >= MIN_FIELDS {
                return Err(format!(
                    "field_layout.{} = {} is out of range, must be below {}",
                    name, index, MIN_FIELDS
                ));
            }
        }
        Ok(())
    }
}

/// Options controlling how a report is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub layout: FieldLayout,
    pub skip_header: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            layout: FieldLayout::default(),
            skip_header: true,
        }
    }
}

/// Parses a disk usage report into at most one [`DiskStat`].
///
/// Returns [`ExtractionError::NoStatsFound`] if no line has at least
/// [`MIN_FIELDS`] fields.
pub fn parse_disk_stats(
    host_name: &str,
    device_path: &str,
    output: &str,
    options: &ParseOptions,
) -> Result<Vec<DiskStat>, ExtractionError> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());
    if options.skip_header {
        lines.next();
    }

    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            continue;
        }

        let layout = &options.layout;
        let stat = DiskStat {
            host_name: host_name.to_string(),
            path: device_path.to_string(),
            size: parse_int_field(&fields, layout.size, "size").max(0),
            used: parse_float_field(&fields, layout.used, "used"),
            fs_type: fields.get(layout.fs_type).copied().unwrap_or_default().to_string(),
            read: parse_float_field(&fields, layout.read, "read"),
            write: parse_float_field(&fields, layout.write, "write"),
        };

        return Ok(vec![stat]);
    }

    Err(ExtractionError::no_stats_found(host_name))
}

fn parse_int_field(fields: &[&str], index: usize, name: &str) -> i64 {
    match fields.get(index) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            debug!("Field '{}' value {:?} is not an integer, using 0", name, raw);
            0
        }),
        None => 0,
    }
}

fn parse_float_field(fields: &[&str], index: usize, name: &str) -> f64 {
    match fields.get(index).map(|raw| (raw, raw.parse::<f64>())) {
        Some((_, Ok(value))) if value.is_finite() => value,
        Some((raw, _)) => {
            debug!("Field '{}' value {:?} is not a number, using 0", name, raw);
            0.0
        }
        None => 0.0,
    }
}

/// Resolves device paths, runs the disk usage source and parses its report.
pub struct DiskStatExtractor {
    source: Box<dyn DiskUsageSource>,
    device_root: String,
    options: ParseOptions,
}

impl DiskStatExtractor {
    pub fn new(source: impl DiskUsageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            device_root: DEFAULT_DEVICE_ROOT.to_string(),
            options: ParseOptions::default(),
        }
    }

    pub fn with_device_root(mut self, device_root: impl Into<String>) -> Self {
        self.device_root = device_root.into();
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn device_root(&self) -> &str {
        &self.device_root
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Joins the device root and `host_name` into a device path.
    pub fn device_path(&self, host_name: &str) -> String {
        if self.device_root.ends_with('/') {
            format!("{}{}", self.device_root, host_name)
        } else {
            format!("{}/{}", self.device_root, host_name)
        }
    }

    /// Returns disk statistics for `host_name`.
    ///
    /// `host_name` must already have passed hostname validation.
    pub fn get_stats(&self, host_name: &str) -> Result<Vec<DiskStat>, ExtractionError> {
        let device_path = self.device_path(host_name);
        let output = self.source.report(&device_path)?;
        parse_disk_stats(host_name, &device_path, &output, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CommandError;

    const DF_OUTPUT: &str = "\
Filesystem     1024-blocks    Used Available Capacity Mounted on
/dev/sda1         10255636 4510016   5205052      47% /
";

    fn parse(output: &str) -> Result<Vec<DiskStat>, ExtractionError> {
        parse_disk_stats("sda1", "/dev/sda1", output, &ParseOptions::default())
    }

    #[test]
    fn test_parse_posix_df_row() {
        let stats = parse(DF_OUTPUT).unwrap();
        assert_eq!(stats.len(), 1);

        let stat = &stats[0];
        assert_eq!(stat.fs_type, "/dev/sda1");
        assert_eq!(stat.size, 10255636);
        assert_eq!(stat.used, 4510016.0);
        assert_eq!(stat.read, 0.0);
        assert_eq!(stat.write, 0.0);
    }

    #[test]
    fn test_blank_lines_before_header_are_ignored() {
        let output = format!("\n   \n{DF_OUTPUT}");
        assert_eq!(parse(&output).unwrap()[0].size, 10255636);
    }

    #[test]
    fn test_header_counts_as_row_without_skip() {
        let options = ParseOptions {
            skip_header: false,
            ..ParseOptions::default()
        };
        let stats = parse_disk_stats("sda1", "/dev/sda1", DF_OUTPUT, &options).unwrap();
        assert_eq!(stats[0].fs_type, "Filesystem");
        assert_eq!(stats[0].size, 0);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let output = "header\nsda1 1 2\nsda1 1 2 3 4\next4 500 1.5 x y z\n";
        let stats = parse(output).unwrap();
        assert_eq!(stats[0].fs_type, "ext4");
        assert_eq!(stats[0].size, 500);
        assert_eq!(stats[0].used, 1.5);
    }

    #[test]
    fn test_negative_and_non_finite_values_default() {
        let output = "header\next4 -20 NaN a b c d e inf 7\n";
        let stat = &parse(output).unwrap()[0];
        assert_eq!(stat.size, 0);
        assert_eq!(stat.used, 0.0);
        assert_eq!(stat.read, 0.0);
        assert_eq!(stat.write, 7.0);
    }

    #[test]
    fn test_custom_layout() {
        let options = ParseOptions {
            layout: FieldLayout {
                fs_type: 1,
                size: 2,
                used: 3,
                read: 6,
                write: 7,
            },
            skip_header: true,
        };
        let output = "h\n/dev/vdb xfs 2048 12.5 x / 11 22\n";
        let stat = &parse_disk_stats("vdb", "/dev/vdb", output, &options).unwrap()[0];
        assert_eq!(stat.fs_type, "xfs");
        assert_eq!(stat.size, 2048);
        assert_eq!(stat.used, 12.5);
        assert_eq!(stat.read, 11.0);
        assert_eq!(stat.write, 22.0);
    }

    #[test]
    fn test_layout_validation() {
        assert!(FieldLayout::default().validate().is_ok());
        let layout = FieldLayout {
            size: 6,
            ..FieldLayout::default()
        };
        let err = layout.validate().unwrap_err();
        assert!(err.contains("field_layout.size"), "{err}");
    }

    #[test]
    fn test_device_path_joining() {
        let source = |_: &str| -> Result<String, CommandError> { Ok(String::new()) };
        let extractor = DiskStatExtractor::new(source);
        assert_eq!(extractor.device_path("sda1"), "/dev/sda1");

        let extractor = extractor.with_device_root("/dev/mapper");
        assert_eq!(extractor.device_path("vg0-root"), "/dev/mapper/vg0-root");
    }

    #[test]
    fn test_get_stats_passes_device_path_to_source() {
        let source = |path: &str| -> Result<String, CommandError> {
            assert_eq!(path, "/dev/nvme0n1");
            Ok(DF_OUTPUT.to_string())
        };
        let stats = DiskStatExtractor::new(source).get_stats("nvme0n1").unwrap();
        assert_eq!(stats[0].host_name, "nvme0n1");
        assert_eq!(stats[0].path, "/dev/nvme0n1");
    }

    #[test]
    fn test_command_failure_is_propagated() {
        let source = |_: &str| -> Result<String, CommandError> {
            Err(CommandError::Exit {
                program: "df".to_string(),
                code: Some(1),
                stderr: "df: /dev/nope: No such file or directory".to_string(),
            })
        };
        let err = DiskStatExtractor::new(source).get_stats("nope").unwrap_err();
        assert!(matches!(err, ExtractionError::CommandExecution(_)));
        assert!(err.to_string().contains("No such file or directory"));
    }
}
