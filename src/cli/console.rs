//! Live console rendering
//!
//! Draws one full screen per sampling pass.

use crate::domain::DeviceSnapshot;
use std::io::{self, Write};

/// ANSI clear-screen and cursor-home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// Render one pass to `out`
///
/// Only domains that produced a power value this pass get a line.
pub fn render<W: Write>(
    out: &mut W,
    interval_ms: u64,
    snapshots: &[DeviceSnapshot],
) -> io::Result<()> {
    write!(out, "{}", CLEAR_SCREEN)?;
    writeln!(out, "=== GPU Power Monitoring ===")?;
    writeln!(out, "Sampling interval: {}ms\n", interval_ms)?;

    for device in snapshots {
        writeln!(out, "Device: {}", device.name)?;
        writeln!(out, "UUID: {}", device.uuid)?;

        for sample in &device.domains {
            let (Some(watts), Some(counter)) = (sample.power, sample.counter) else {
                continue;
            };
            writeln!(
                out,
                "{:<12} Power: {:<8.2} W  (Energy: {:.2} J)",
                sample.kind,
                watts,
                counter.joules()
            )?;
        }
        writeln!(out)?;
    }

    out.flush()
}
