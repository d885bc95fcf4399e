//! Trait definitions for Sysman operations
//!
//! These traits abstract over Level Zero so discovery and sampling can run
//! against mocks in tests and the real loader in production.

use crate::domain::{DeviceProperties, EnergyCounter, PowerProperties};
use crate::error::SysmanError;

/// Anything that can produce the current energy counter of one power domain
pub trait CounterSource {
    /// Read the domain's cumulative energy counter
    fn energy_counter(&self) -> Result<EnergyCounter, SysmanError>;
}

/// The driver → device → power domain hierarchy exposed by Sysman
///
/// Calls are not expected to be made concurrently; callers embedding this in
/// a multi-threaded host must serialize access.
pub trait SysmanBackend {
    /// Driver handle type
    type Driver;

    /// Device handle type
    type Device;

    /// Power domain handle type, able to re-read its own counter
    type PowerDomain: CounterSource;

    /// One-time handshake with the management subsystem
    fn init(&self) -> Result<(), SysmanError>;

    /// Enumerate drivers
    fn drivers(&self) -> Result<Vec<Self::Driver>, SysmanError>;

    /// Enumerate devices of a driver
    fn devices(&self, driver: &Self::Driver) -> Result<Vec<Self::Device>, SysmanError>;

    /// Get identification properties of a device
    fn device_properties(&self, device: &Self::Device) -> Result<DeviceProperties, SysmanError>;

    /// Enumerate power domains of a device
    fn power_domains(&self, device: &Self::Device) -> Result<Vec<Self::PowerDomain>, SysmanError>;

    /// Get classification properties of a power domain
    fn power_properties(&self, domain: &Self::PowerDomain)
        -> Result<PowerProperties, SysmanError>;
}
