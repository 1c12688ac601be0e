//! HTTP endpoint handlers for the service.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/{hostname}/diskstats`: Disk statistics for one device (JSON)
//! - `/health`: Health check endpoint
//! - `/`: Landing page

pub mod diskstats;
pub mod error;
pub mod health;
pub mod root;

// Re-export handlers
pub use diskstats::diskstats_handler;
pub use health::health_handler;
pub use root::root_handler;
