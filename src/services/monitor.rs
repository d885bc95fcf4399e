//! Power monitor
//!
//! The embeddable API: one-time discovery, then sampling passes on demand or
//! in a cooperative loop at a fixed interval.

use crate::config::DEFAULT_INTERVAL_MS;
use crate::domain::{DeviceSnapshot, PowerReading};
use crate::error::DiscoveryError;
use crate::services::discovery::discover;
use crate::services::tracker::DeviceTracker;
use crate::sysman::SysmanBackend;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default time between sampling passes
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(DEFAULT_INTERVAL_MS);

/// Configuration for the sampling loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Sleep between passes
    pub interval: Duration,
    /// Stop after this many passes (`None` runs until stopped)
    pub max_passes: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_passes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InitState {
    Pending,
    Ready,
    Failed(DiscoveryError),
}

/// Power monitor over a Sysman backend
///
/// Not safe for concurrent use: every pass mutates per-domain baselines, so a
/// multi-threaded host must serialize calls.
pub struct PowerMonitor<B: SysmanBackend> {
    backend: B,
    devices: Vec<DeviceTracker<B::PowerDomain>>,
    state: InitState,
}

impl<B: SysmanBackend> PowerMonitor<B> {
    /// Create a monitor; no discovery happens until [`initialize`](Self::initialize)
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            devices: Vec::new(),
            state: InitState::Pending,
        }
    }

    /// Run discovery once and report whether any device was found
    pub fn initialize(&mut self) -> bool {
        self.try_initialize().is_ok()
    }

    /// Run discovery once, returning the number of tracked devices
    ///
    /// The outcome is cached: later calls return it without touching the
    /// interface, including after a failure. Call [`shutdown`](Self::shutdown)
    /// to allow a fresh discovery.
    pub fn try_initialize(&mut self) -> Result<usize, DiscoveryError> {
        match &self.state {
            InitState::Ready => return Ok(self.devices.len()),
            InitState::Failed(e) => return Err(e.clone()),
            InitState::Pending => {}
        }

        let result = discover(&self.backend).and_then(|devices| {
            if devices.is_empty() {
                Err(DiscoveryError::NoDevicesFound)
            } else {
                Ok(devices)
            }
        });

        match result {
            Ok(devices) => {
                self.devices = devices;
                self.state = InitState::Ready;
                Ok(self.devices.len())
            }
            Err(e) => {
                self.state = InitState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Whether discovery has succeeded
    pub fn is_initialized(&self) -> bool {
        self.state == InitState::Ready
    }

    /// Tracked devices in discovery order
    pub fn devices(&self) -> &[DeviceTracker<B::PowerDomain>] {
        &self.devices
    }

    /// The underlying backend
    ///
    /// Not used by the CLI; exposed for hosts that embed the monitor.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// One sampling pass with per-domain detail
    ///
    /// Empty until discovery has succeeded.
    pub fn sample(&mut self) -> Vec<DeviceSnapshot> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.devices.iter_mut().map(DeviceTracker::sample).collect()
    }

    /// One sampling pass, flattened to one reading per device
    ///
    /// Fields without a fresh value hold [`crate::domain::POWER_UNAVAILABLE`],
    /// which also stands for "no such domain on this device".
    pub fn power_readings(&mut self) -> Vec<PowerReading> {
        self.sample().iter().map(PowerReading::from).collect()
    }

    /// Drop all trackers and return to the undiscovered state
    pub fn shutdown(&mut self) {
        if self.state != InitState::Pending {
            log::info!("Releasing {} tracked device(s)", self.devices.len());
        }
        self.devices.clear();
        self.state = InitState::Pending;
    }

    /// Sample repeatedly until `running` is cleared or `max_passes` is reached
    ///
    /// Both bounds are checked at the top of each pass. `on_pass` receives every
    /// snapshot; an error from it ends the loop. Returns the number of passes
    /// completed.
    pub fn run<F, E>(
        &mut self,
        config: &MonitorConfig,
        running: &AtomicBool,
        mut on_pass: F,
    ) -> Result<u64, E>
    where
        F: FnMut(&[DeviceSnapshot]) -> Result<(), E>,
    {
        let mut passes = 0;
        let remaining = |passes: u64| config.max_passes.map_or(true, |max| passes < max);

        while running.load(Ordering::SeqCst) && remaining(passes) {
            let snapshots = self.sample();
            on_pass(&snapshots)?;
            passes += 1;

            if !remaining(passes) {
                log::debug!("Stopping after {} pass(es)", passes);
                break;
            }

            std::thread::sleep(config.interval);
        }

        Ok(passes)
    }
}
