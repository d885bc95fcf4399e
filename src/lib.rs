//! zepower - Level Zero GPU power monitoring library
//!
//! This library samples the Sysman energy counters of Intel GPUs and turns
//! them into card-level and per-tile power draw in watts.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions and console rendering
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Counter, device and reading types
//! - [`error`]: Error types
//! - [`services`]: Discovery, tracking and the sampling loop
//! - [`sysman`]: Level Zero Sysman abstraction layer
//!
//! # Example
//!
//! ```no_run
//! use zepower::services::PowerMonitor;
//! use zepower::sysman::LevelZero;
//!
//! let mut monitor = PowerMonitor::new(LevelZero::load()?);
//! if monitor.initialize() {
//!     for reading in monitor.power_readings() {
//!         println!("{}: {:.2} W", reading.gpu_name, reading.card_power);
//!     }
//! }
//! # Ok::<(), zepower::error::SysmanError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod sysman;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use domain::{PowerReading, POWER_UNAVAILABLE};
pub use error::{AppError, Result};
pub use services::PowerMonitor;
