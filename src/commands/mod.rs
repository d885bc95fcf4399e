//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command. Handlers
//! are generic over the Sysman backend so they can run against mocks.

pub mod list;
pub mod read;
pub mod watch;

pub use list::run_list;
pub use read::run_read;
pub use watch::{run_watch, watch};

use crate::error::{DiscoveryError, Result};
use crate::services::PowerMonitor;
use crate::sysman::{LevelZero, SysmanBackend};

/// Load the Level Zero backend and wrap it in an undiscovered monitor
pub fn open_monitor() -> Result<PowerMonitor<LevelZero>> {
    let backend = LevelZero::load().map_err(DiscoveryError::SubsystemInitFailed)?;
    Ok(PowerMonitor::new(backend))
}

/// Run discovery, turning an empty result into an error
pub(crate) fn ensure_initialized<B: SysmanBackend>(monitor: &mut PowerMonitor<B>) -> Result<()> {
    let count = monitor.try_initialize()?;
    log::debug!("Tracking {} device(s)", count);
    Ok(())
}
