//! List command implementation
//!
//! Lists detected GPUs and their power domains.

use crate::cli::args::OutputFormat;
use crate::cli::output::{write_output, DeviceList, DeviceListEntry};
use crate::commands::ensure_initialized;
use crate::error::Result;
use crate::services::PowerMonitor;
use crate::sysman::SysmanBackend;

use std::io::Write;

/// Execute the list command
pub fn run_list<B: SysmanBackend, W: Write>(
    monitor: &mut PowerMonitor<B>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    ensure_initialized(monitor)?;

    let devices = monitor
        .devices()
        .iter()
        .enumerate()
        .map(|(index, device)| {
            let domains = device.domains().iter().map(|d| d.kind()).collect();
            DeviceListEntry::new(index, device.info(), domains)
        })
        .collect();

    write_output(out, &DeviceList { devices }, format)?;

    Ok(())
}
