//! Business logic services
//!
//! Discovery, per-domain power tracking and the sampling loop.

pub mod discovery;
pub mod monitor;
pub mod tracker;

pub use discovery::discover;
pub use monitor::{MonitorConfig, PowerMonitor, DEFAULT_INTERVAL};
pub use tracker::{DeviceTracker, DomainTracker};
