//! Device and power domain discovery
//!
//! Walks the driver → device → power domain hierarchy once and builds the
//! trackers, each domain seeded with a baseline counter. Only subsystem init
//! and driver enumeration are fatal; any other failure drops just the item
//! it concerns.

use crate::domain::{DeviceInfo, DomainKind};
use crate::error::DiscoveryError;
use crate::services::tracker::{DeviceTracker, DomainTracker};
use crate::sysman::{CounterSource, SysmanBackend};

/// Discover every device exposing at least one readable power domain
///
/// Result order follows the interface's enumeration order: drivers, then
/// devices, then domains.
pub fn discover<B: SysmanBackend>(
    backend: &B,
) -> Result<Vec<DeviceTracker<B::PowerDomain>>, DiscoveryError> {
    backend.init().map_err(|e| {
        log::error!("{}", e);
        DiscoveryError::SubsystemInitFailed(e)
    })?;

    let drivers = match backend.drivers() {
        Ok(drivers) if !drivers.is_empty() => drivers,
        Ok(_) => {
            log::error!("zesDriverGet returned no drivers");
            return Err(DiscoveryError::NoDriversFound);
        }
        Err(e) => {
            log::error!("{}", e);
            return Err(DiscoveryError::NoDriversFound);
        }
    };
    log::debug!("Found {} driver(s)", drivers.len());

    let mut trackers = Vec::new();

    for (driver_idx, driver) in drivers.iter().enumerate() {
        let devices = match backend.devices(driver) {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("Skipping driver {}: {}", driver_idx, e);
                continue;
            }
        };

        for device in &devices {
            if let Some(tracker) = discover_device(backend, device) {
                trackers.push(tracker);
            }
        }
    }

    log::info!("Discovered {} device(s)", trackers.len());
    Ok(trackers)
}

fn discover_device<B: SysmanBackend>(
    backend: &B,
    device: &B::Device,
) -> Option<DeviceTracker<B::PowerDomain>> {
    let props = match backend.device_properties(device) {
        Ok(props) => props,
        Err(e) => {
            log::warn!("Skipping device: {}", e);
            return None;
        }
    };
    let info = DeviceInfo::from(&props);

    let handles = match backend.power_domains(device) {
        Ok(handles) if !handles.is_empty() => handles,
        Ok(_) => {
            log::warn!("Skipping {}: no power domains", info);
            return None;
        }
        Err(e) => {
            log::warn!("Skipping {}: {}", info, e);
            return None;
        }
    };

    let domains: Vec<_> = handles
        .into_iter()
        .filter_map(|handle| discover_domain(backend, &info, handle))
        .collect();

    if domains.is_empty() {
        log::warn!("Skipping {}: no readable power domains", info);
        return None;
    }

    log::debug!("{}: {} power domain(s)", info, domains.len());
    Some(DeviceTracker::new(info, domains))
}

fn discover_domain<B: SysmanBackend>(
    backend: &B,
    info: &DeviceInfo,
    handle: B::PowerDomain,
) -> Option<DomainTracker<B::PowerDomain>> {
    let kind = match backend.power_properties(&handle) {
        Ok(props) => DomainKind::from(props),
        Err(e) => {
            log::warn!("Skipping power domain on {}: {}", info, e);
            return None;
        }
    };

    match handle.energy_counter() {
        Ok(baseline) => Some(DomainTracker::new(handle, kind, baseline)),
        Err(e) => {
            log::warn!("Skipping {} on {}: {}", kind, info, e);
            None
        }
    }
}
