//! Domain models for zepower
//!
//! Plain value types shared by the Sysman layer, the sampling services and
//! the CLI.

pub mod device;
pub mod energy;
pub mod reading;

pub use device::{format_uuid, DeviceInfo, DeviceProperties, DeviceUuid, DomainKind, PowerProperties};
pub use energy::{compute_power, counter_delta, EnergyCounter};
pub use reading::{DeviceSnapshot, DomainSample, PowerReading, POWER_UNAVAILABLE};
