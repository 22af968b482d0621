//! Concurrent local-network device discovery.
//!
//! The engine expands a target specification into candidate addresses,
//! probes them with a bounded worker pool, resolves hostnames for live
//! hosts, and pushes an ordered stream of [`Event`]s to a consumer
//! channel: `info`, `found`, `progress`, `done`, `error`.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod protocol;
pub mod resolve;
pub mod scanner;
pub mod target;

pub use error::ScanError;
pub use protocol::{DeviceRecord, Event, ScanProgress, ScanSummary};
pub use scanner::{ScanConfig, ScanCoordinator, SessionState};
pub use target::Target;
