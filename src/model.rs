//! Data model for disk usage records.

use serde::{Deserialize, Serialize};

/// One row of disk usage information for a single device.
///
/// Built fresh for every request from the output of the disk usage
/// command and discarded after serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskStat {
    /// Identifier of the queried device/host.
    #[serde(rename = "hostname")]
    pub host_name: String,
    /// Resolved device path, e.g. `/dev/sda1`.
    pub path: String,
    /// Total capacity in the raw units of the source command.
    pub size: i64,
    /// Usage figure as reported by the source command.
    pub used: f64,
    /// Filesystem/device type label (first output field).
    #[serde(rename = "type")]
    pub fs_type: String,
    pub read: f64,
    pub write: f64,
}

/// JSON envelope returned by the `/{hostname}/diskstats` endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskStatsResponse {
    pub stats: Vec<DiskStat>,
}

impl From<Vec<DiskStat>> for DiskStatsResponse {
    fn from(stats: Vec<DiskStat>) -> Self {
        Self { stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let stat = DiskStat {
            host_name: "sda1".to_string(),
            path: "/dev/sda1".to_string(),
            size: 1000,
            used: 45.0,
            fs_type: "ext4".to_string(),
            read: 1.0,
            write: 2.0,
        };

        let value = serde_json::to_value(DiskStatsResponse::from(vec![stat])).unwrap();
        let row = &value["stats"][0];

        assert_eq!(row["hostname"], "sda1");
        assert_eq!(row["path"], "/dev/sda1");
        assert_eq!(row["size"], 1000);
        assert_eq!(row["used"], 45.0);
        assert_eq!(row["type"], "ext4");
        assert_eq!(row["read"], 1.0);
        assert_eq!(row["write"], 2.0);
        assert!(row.get("host_name").is_none());
        assert!(row.get("fs_type").is_none());
    }
}
