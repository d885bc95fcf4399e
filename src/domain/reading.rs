//! Per-pass power readings
//!
//! A [`DeviceSnapshot`] is the full result of sampling one device once; a
//! [`PowerReading`] is the flattened view handed to API consumers.

use crate::domain::{DomainKind, EnergyCounter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel for "no fresh value this pass"
///
/// Used both when the device has no such domain and when the domain's read
/// failed or no time elapsed since the previous pass.
pub const POWER_UNAVAILABLE: f64 = -1.0;

/// Outcome of sampling one power domain once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainSample {
    /// Which domain was sampled
    pub kind: DomainKind,
    /// Power in watts if it could be derived this pass
    pub power: Option<f64>,
    /// The counter read this pass, `None` if the read failed
    pub counter: Option<EnergyCounter>,
}

impl DomainSample {
    /// A pass where the counter could not be read
    pub fn failed(kind: DomainKind) -> Self {
        Self {
            kind,
            power: None,
            counter: None,
        }
    }
}

/// Outcome of sampling every domain of one device once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub uuid: String,
    pub domains: Vec<DomainSample>,
}

/// Power reading for one device from one sampling pass
///
/// `card_power`, `tile0_power` and `tile1_power` hold watts or
/// [`POWER_UNAVAILABLE`]. `tiles` carries every tile that produced a value,
/// including ids beyond 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerReading {
    pub gpu_name: String,
    pub uuid: String,
    pub card_power: f64,
    pub tile0_power: f64,
    pub tile1_power: f64,
    pub tiles: BTreeMap<u32, f64>,
}

impl PowerReading {
    /// A reading with every field unavailable
    pub fn new(gpu_name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            gpu_name: gpu_name.into(),
            uuid: uuid.into(),
            card_power: POWER_UNAVAILABLE,
            tile0_power: POWER_UNAVAILABLE,
            tile1_power: POWER_UNAVAILABLE,
            tiles: BTreeMap::new(),
        }
    }

    /// Route a fresh power value to the field for its domain
    pub fn record(&mut self, kind: DomainKind, watts: f64) {
        match kind {
            DomainKind::Card => self.card_power = watts,
            DomainKind::Tile(id) => {
                match id {
                    0 => self.tile0_power = watts,
                    1 => self.tile1_power = watts,
                    _ => {}
                }
                self.tiles.insert(id, watts);
            }
        }
    }

    /// Power for tile `id`, or [`POWER_UNAVAILABLE`]
    ///
    /// Library accessor for tiles past the named fields; the CLI walks
    /// `tiles` directly.
    pub fn tile_power(&self, id: u32) -> f64 {
        self.tiles.get(&id).copied().unwrap_or(POWER_UNAVAILABLE)
    }

    /// Whether a watts value is the unavailable sentinel
    #[inline]
    pub fn is_available(watts: f64) -> bool {
        watts != POWER_UNAVAILABLE
    }
}

impl From<&DeviceSnapshot> for PowerReading {
    fn from(snapshot: &DeviceSnapshot) -> Self {
        let mut reading = PowerReading::new(snapshot.name.clone(), snapshot.uuid.clone());
        for sample in &snapshot.domains {
            if let Some(watts) = sample.power {
                reading.record(sample.kind, watts);
            }
        }
        reading
    }
}
