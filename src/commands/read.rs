//! Read command implementation
//!
//! Takes one power reading of every GPU: discovery seeds the baseline, then
//! a single pass runs after one interval.

use crate::cli::args::OutputFormat;
use crate::cli::output::{write_output, ReadingList};
use crate::commands::ensure_initialized;
use crate::config::Config;
use crate::error::Result;
use crate::services::PowerMonitor;
use crate::sysman::SysmanBackend;

use std::io::Write;

/// Execute the read command
pub fn run_read<B: SysmanBackend, W: Write>(
    monitor: &mut PowerMonitor<B>,
    config: &Config,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    ensure_initialized(monitor)?;

    std::thread::sleep(config.sampling.interval());

    let readings = monitor.power_readings();
    write_output(out, &ReadingList { readings }, format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::domain::EnergyCounter;
    use crate::mock::{MockBackend, MockDevice, MockPowerDomain};

    #[test]
    fn test_read_json() {
        let card = MockPowerDomain::card(EnergyCounter::new(0, 0));
        card.counter().push(EnergyCounter::new(0, 0)).push(EnergyCounter::new(50_000, 1_000));
        let backend =
            MockBackend::new().with_devices([MockDevice::new("Arc A770", [0; 16]).with_domain(card)]);

        let mut monitor = PowerMonitor::new(backend);
        let config = ConfigBuilder::new().with_interval_ms(Some(1)).build().unwrap();
        let mut out = Vec::new();

        run_read(&mut monitor, &config, OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["gpu_name"], "Arc A770");
        assert_eq!(value[0]["card_power"], 50.0);
        assert_eq!(value[0]["tile0_power"], -1.0);
    }
}
