//! Integration tests for disk statistics extraction.
//!
//! The disk usage command is replaced by closures returning canned output,
//! so these tests do not depend on the host's devices.

use diskstat_api::{
    parse_disk_stats, CommandError, DiskStat, DiskStatExtractor, ExtractionError, ParseOptions,
};

/// Output with a header row and one data row of ten fields.
const TEN_FIELD_REPORT: &str = "\
Filesystem 1K-blocks Used x x x x x read write
ext4 1000000 45.0 a b c d e 100 50
";

fn canned(output: &'static str) -> impl Fn(&str) -> Result<String, CommandError> + Send + Sync {
    move |_: &str| Ok(output.to_string())
}

#[test]
fn test_end_to_end_example() {
    let extractor = DiskStatExtractor::new(canned(TEN_FIELD_REPORT));
    let stats = extractor.get_stats("sda1").expect("extraction should succeed");

    assert_eq!(
        stats,
        vec![DiskStat {
            host_name: "sda1".to_string(),
            path: "/dev/sda1".to_string(),
            size: 1000000,
            used: 45.0,
            fs_type: "ext4".to_string(),
            read: 100.0,
            write: 50.0,
        }]
    );
}

#[test]
fn test_positional_fields() {
    let output = "\
h h h h h h
xfs 2048 12.25 a b c d e 7.5 8.5 trailing
";
    let stats = parse_disk_stats("vdb", "/dev/vdb", output, &ParseOptions::default()).unwrap();

    assert_eq!(stats.len(), 1);
    let stat = &stats[0];
    assert_eq!(stat.fs_type, "xfs");
    assert_eq!(stat.size, 2048);
    assert_eq!(stat.used, 12.25);
    assert_eq!(stat.read, 7.5);
    assert_eq!(stat.write, 8.5);
    assert_eq!(stat.host_name, "vdb");
    assert_eq!(stat.path, "/dev/vdb");
}

#[test]
fn test_header_only_is_no_stats_found() {
    for output in [
        "Filesystem Size Used\n",
        "Filesystem 1024-blocks Used Available Capacity Mounted on\n",
        "",
        "\n\n",
    ] {
        let err = DiskStatExtractor::new(canned(output))
            .get_stats("sdz")
            .unwrap_err();
        match err {
            ExtractionError::NoStatsFound { host_name } => assert_eq!(host_name, "sdz"),
            other => panic!("expected NoStatsFound for {:?}, got {:?}", output, other),
        }
    }
}

#[test]
fn test_short_data_rows_are_skipped() {
    let output = "header line here\na b c\nd e f g h\n";
    let err = parse_disk_stats("sda", "/dev/sda", output, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractionError::NoStatsFound { .. }));
}

#[test]
fn test_missing_io_columns_default_to_zero() {
    for row in [
        "ext4 100 1.0 x y z",
        "ext4 100 1.0 x y z w",
        "ext4 100 1.0 x y z w v",
    ] {
        let output = format!("Filesystem header\n{row}\n");
        let stat = &parse_disk_stats("sda", "/dev/sda", &output, &ParseOptions::default())
            .unwrap()[0];
        assert_eq!(stat.read, 0.0, "row {row:?}");
        assert_eq!(stat.write, 0.0, "row {row:?}");
        assert_eq!(stat.size, 100);
    }

    // Nine fields: read is present, write is not
    let output = "header\next4 100 1.0 x y z w v 33\n";
    let stat = &parse_disk_stats("sda", "/dev/sda", output, &ParseOptions::default()).unwrap()[0];
    assert_eq!(stat.read, 33.0);
    assert_eq!(stat.write, 0.0);
}

#[test]
fn test_non_numeric_fields_default_to_zero() {
    let output = "header\next4 1.0G 45% a b c d e fast slow\n";
    let stats = parse_disk_stats("sda1", "/dev/sda1", output, &ParseOptions::default())
        .expect("lenient parsing must not fail the row");

    let stat = &stats[0];
    assert_eq!(stat.fs_type, "ext4");
    assert_eq!(stat.size, 0);
    assert_eq!(stat.used, 0.0);
    assert_eq!(stat.read, 0.0);
    assert_eq!(stat.write, 0.0);
}

#[test]
fn test_only_first_qualifying_row_is_returned() {
    let output = "\
header
ext4 1 1 a b c
xfs 2 2 a b c
";
    let stats = parse_disk_stats("sda", "/dev/sda", output, &ParseOptions::default()).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].fs_type, "ext4");
}

#[test]
fn test_repeated_calls_are_identical() {
    let extractor = DiskStatExtractor::new(canned(TEN_FIELD_REPORT));
    let first = extractor.get_stats("sda1").unwrap();
    for _ in 0..5 {
        assert_eq!(extractor.get_stats("sda1").unwrap(), first);
    }
}

#[test]
fn test_command_error_is_wrapped() {
    let extractor = DiskStatExtractor::new(|_: &str| -> Result<String, CommandError> {
        Err(CommandError::Spawn {
            program: "df".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let err = extractor.get_stats("sda1").unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::CommandExecution(CommandError::Spawn { .. })
    ));
    assert!(err.to_string().starts_with("Disk usage command failed"));
}

#[test]
fn test_custom_device_root() {
    let extractor = DiskStatExtractor::new(|path: &str| -> Result<String, CommandError> {
        Ok(format!("header\n{path} 10 1 a b c\n"))
    })
    .with_device_root("/dev/mapper/");

    let stat = &extractor.get_stats("vg0-root").unwrap()[0];
    assert_eq!(stat.path, "/dev/mapper/vg0-root");
    assert_eq!(stat.fs_type, "/dev/mapper/vg0-root");
}
