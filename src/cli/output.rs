//! Output formatting utilities
//!
//! Provides table, JSON and compact output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{DeviceInfo, DomainKind, PowerReading};
use serde::Serialize;
use std::io::{self, Write};

/// Format output into any writer
pub fn write_output<W: Write, T: Serialize + TableDisplay>(
    out: &mut W,
    data: &T,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(out, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Watts with two decimals, or `n/a` for the unavailable sentinel
pub fn format_watts(watts: f64) -> String {
    if PowerReading::is_available(watts) {
        format!("{:.2} W", watts)
    } else {
        "n/a".to_string()
    }
}

/// Device list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListEntry {
    pub index: usize,
    pub name: String,
    pub uuid: String,
    pub domains: Vec<DomainKind>,
}

impl DeviceListEntry {
    pub fn new(index: usize, info: &DeviceInfo, domains: Vec<DomainKind>) -> Self {
        Self {
            index,
            name: info.name.clone(),
            uuid: info.uuid.clone(),
            domains,
        }
    }

    fn domain_labels(&self) -> String {
        self.domains
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TableDisplay for DeviceListEntry {
    fn to_table(&self) -> String {
        format!(
            "[{}] {}\n  UUID: {}\n  Power domains: {}",
            self.index,
            self.name,
            self.uuid,
            self.domain_labels()
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.index, self.name)
    }
}

/// Device list for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceListEntry>,
}

impl TableDisplay for DeviceList {
    fn to_table(&self) -> String {
        let mut output = format!("GPUs Found: {}\n\n", self.devices.len());

        for device in &self.devices {
            output.push_str(&device.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.devices
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Power readings for display, serialized as a plain array
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ReadingList {
    pub readings: Vec<PowerReading>,
}

impl TableDisplay for ReadingList {
    fn to_table(&self) -> String {
        let mut output = String::new();

        for (index, reading) in self.readings.iter().enumerate() {
            output.push_str(&format!(
                "[{}] {}\n  UUID: {}\n",
                index, reading.gpu_name, reading.uuid
            ));
            output.push_str(&format!(
                "  Card Total: {}\n",
                format_watts(reading.card_power)
            ));
            output.push_str(&format!("  Tile 0: {}\n", format_watts(reading.tile0_power)));
            output.push_str(&format!("  Tile 1: {}\n", format_watts(reading.tile1_power)));

            for (id, watts) in reading.tiles.range(2u32..) {
                output.push_str(&format!("  Tile {}: {}\n", id, format_watts(*watts)));
            }
        }

        output
    }

    fn to_compact(&self) -> String {
        self.readings
            .iter()
            .enumerate()
            .map(|(index, r)| {
                format!(
                    "{}:{} card={} tile0={} tile1={}",
                    index,
                    r.gpu_name,
                    format_watts(r.card_power),
                    format_watts(r.tile0_power),
                    format_watts(r.tile1_power)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> PowerReading {
        let mut reading = PowerReading::new("Max 1550", "00:01");
        reading.record(DomainKind::Card, 300.0);
        reading.record(DomainKind::Tile(0), 140.25);
        reading.record(DomainKind::Tile(2), 12.5);
        reading
    }

    #[test]
    fn test_format_watts() {
        assert_eq!(format_watts(12.346), "12.35 W");
        assert_eq!(format_watts(-1.0), "n/a");
    }

    #[test]
    fn test_reading_table() {
        let list = ReadingList {
            readings: vec![reading()],
        };
        let table = list.to_table();
        assert!(table.contains("[0] Max 1550"));
        assert!(table.contains("Card Total: 300.00 W"));
        assert!(table.contains("Tile 0: 140.25 W"));
        assert!(table.contains("Tile 1: n/a"));
        assert!(table.contains("Tile 2: 12.50 W"));
    }

    #[test]
    fn test_reading_compact() {
        let list = ReadingList {
            readings: vec![reading()],
        };
        assert_eq!(
            list.to_compact(),
            "0:Max 1550 card=300.00 W tile0=140.25 W tile1=n/a"
        );
    }

    #[test]
    fn test_reading_json_is_array() {
        let list = ReadingList {
            readings: vec![reading()],
        };
        let mut out = Vec::new();
        write_output(&mut out, &list, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["tile1_power"], -1.0);
    }

    #[test]
    fn test_device_list_table() {
        let info = DeviceInfo::new("Arc A770", "aa:bb");
        let list = DeviceList {
            devices: vec![DeviceListEntry::new(0, &info, vec![DomainKind::Card])],
        };
        let table = list.to_table();
        assert!(table.contains("GPUs Found: 1"));
        assert!(table.contains("Power domains: Card Total"));
        assert_eq!(list.to_compact(), "0:Arc A770");
    }
}
