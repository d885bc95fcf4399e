//! Watch command implementation
//!
//! Runs the live console until Ctrl-C or the requested pass count.

use crate::cli::args::WatchArgs;
use crate::cli::console;
use crate::commands::ensure_initialized;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::PowerMonitor;
use crate::sysman::SysmanBackend;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Execute the watch command, stopping on Ctrl-C
pub fn run_watch<B: SysmanBackend, W: Write>(
    monitor: &mut PowerMonitor<B>,
    args: &WatchArgs,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    watch(monitor, args.count, config, &running, out)?;

    monitor.shutdown();
    Ok(())
}

/// Render passes to `out` until `running` is cleared or `count` passes ran
pub fn watch<B: SysmanBackend, W: Write>(
    monitor: &mut PowerMonitor<B>,
    count: Option<u64>,
    config: &Config,
    running: &AtomicBool,
    out: &mut W,
) -> Result<u64> {
    ensure_initialized(monitor)?;

    let mut monitor_config = config.monitor_config();
    monitor_config.max_passes = count;
    let interval_ms = config.sampling.interval_ms;

    log::info!("Sampling every {}ms", interval_ms);

    let passes = monitor.run(&monitor_config, running, |snapshots| {
        console::render(&mut *out, interval_ms, snapshots).map_err(AppError::from)
    })?;

    log::info!("Stopped after {} pass(es)", passes);
    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::domain::EnergyCounter;
    use crate::mock::{MockBackend, MockDevice, MockPowerDomain};

    #[test]
    fn test_watch_renders_each_pass() {
        let tile = MockPowerDomain::tile(0, EnergyCounter::new(0, 0));
        tile.counter()
            .push(EnergyCounter::new(0, 0))
            .push(EnergyCounter::new(2_000_000, 1_000_000))
            .push(EnergyCounter::new(5_000_000, 2_000_000));
        let backend =
            MockBackend::new().with_devices([MockDevice::new("Max 1100", [7; 16]).with_domain(tile)]);

        let mut monitor = PowerMonitor::new(backend);
        let config = ConfigBuilder::new().with_interval_ms(Some(1)).build().unwrap();
        let running = AtomicBool::new(true);
        let mut out = Vec::new();

        let passes = watch(&mut monitor, Some(2), &config, &running, &mut out).unwrap();
        assert_eq!(passes, 2);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("=== GPU Power Monitoring ===").count(), 2);
        assert!(text.contains("Sampling interval: 1ms"));
        assert!(text.contains("Tile 0       Power: 2.00     W  (Energy: 2.00 J)"));
        assert!(text.contains("Tile 0       Power: 3.00     W  (Energy: 5.00 J)"));
    }

    #[test]
    fn test_watch_without_devices_fails() {
        let mut monitor = PowerMonitor::new(MockBackend::new().with_failing_init());
        let running = AtomicBool::new(true);
        let mut out = Vec::new();

        let result = watch(&mut monitor, Some(1), &Config::default(), &running, &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
