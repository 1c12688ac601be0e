//! diskstat-api library
//!
//! Framework-agnostic core of the disk statistics service: hostname
//! validation and extraction of disk usage rows from `df`-style output.
//! The HTTP binary wraps these types, but they can be embedded in any other
//! transport.
//!
//! # Usage
//!
//! ```rust
//! use diskstat_api::{CommandError, DiskStatExtractor, HostnameValidator};
//!
//! // Any `Fn(&str) -> Result<String, CommandError>` can stand in for `df`.
//! let source = |_path: &str| -> Result<String, CommandError> {
//!     Ok("Filesystem 1024-blocks Used Available Capacity Mounted on\n\
//!         /dev/sda1 10255636 4510016 5205052 47% /\n"
//!         .to_string())
//! };
//!
//! let validator = HostnameValidator::default();
//! assert!(validator.validate("sda1"));
//!
//! let extractor = DiskStatExtractor::new(source);
//! let stats = extractor.get_stats("sda1").unwrap();
//! assert_eq!(stats[0].path, "/dev/sda1");
//! assert_eq!(stats[0].size, 10255636);
//! ```

pub mod error;
pub mod extractor;
pub mod model;
pub mod source;
pub mod validator;

// Re-export main types for convenience
pub use error::ExtractionError;
pub use extractor::{
    parse_disk_stats, DiskStatExtractor, FieldLayout, ParseOptions, DEFAULT_DEVICE_ROOT,
    MIN_FIELDS,
};
pub use model::{DiskStat, DiskStatsResponse};
pub use source::{CommandError, DfCommand, DiskUsageSource};
pub use validator::{validate, HostnamePolicy, HostnameValidator, DEFAULT_MAX_HOSTNAME_LEN};
