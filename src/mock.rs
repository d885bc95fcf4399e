//! Mock implementations for testing
//!
//! Provides a scriptable Sysman backend for unit testing without real hardware.
//! Every level of the hierarchy can be told to fail its query, and counters
//! are shared handles so tests can feed samples after discovery.

use crate::domain::{DeviceProperties, DeviceUuid, EnergyCounter, PowerProperties};
use crate::error::SysmanError;
use crate::sysman::ffi::ZeResult;
use crate::sysman::{CounterSource, SysmanBackend};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct CounterState {
    current: EnergyCounter,
    script: VecDeque<Option<EnergyCounter>>,
    reads: usize,
}

/// Scriptable energy counter shared between a test and a mock domain
///
/// Each read pops the next scripted entry (`None` fails the read); once the
/// script is exhausted the last value is returned again.
#[derive(Debug, Clone, Default)]
pub struct MockCounter {
    state: Arc<Mutex<CounterState>>,
}

impl MockCounter {
    /// Counter that starts at the given reading
    pub fn new(initial: EnergyCounter) -> Self {
        let counter = Self::default();
        counter.state.lock().unwrap().current = initial;
        counter
    }

    /// Queue a successful reading
    pub fn push(&self, counter: EnergyCounter) -> &Self {
        self.state.lock().unwrap().script.push_back(Some(counter));
        self
    }

    /// Queue a failed read
    pub fn fail_next(&self) -> &Self {
        self.state.lock().unwrap().script.push_back(None);
        self
    }

    /// Number of reads performed so far
    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }
}

impl CounterSource for MockCounter {
    fn energy_counter(&self) -> Result<EnergyCounter, SysmanError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        match state.script.pop_front() {
            Some(Some(counter)) => {
                state.current = counter;
                Ok(counter)
            }
            Some(None) => Err(SysmanError::call(
                "zesPowerGetEnergyCounter",
                ZeResult::ERROR_DEVICE_LOST,
            )),
            None => Ok(state.current),
        }
    }
}

/// Mock power domain
#[derive(Debug, Clone)]
pub struct MockPowerDomain {
    properties: Option<PowerProperties>,
    counter: MockCounter,
}

impl MockPowerDomain {
    /// Card-level domain starting at the given reading
    pub fn card(initial: EnergyCounter) -> Self {
        Self::with_properties(PowerProperties::card(), MockCounter::new(initial))
    }

    /// Tile domain starting at the given reading
    pub fn tile(id: u32, initial: EnergyCounter) -> Self {
        Self::with_properties(PowerProperties::tile(id), MockCounter::new(initial))
    }

    /// Domain with explicit properties and counter
    pub fn with_properties(properties: PowerProperties, counter: MockCounter) -> Self {
        Self {
            properties: Some(properties),
            counter,
        }
    }

    /// Builder: make the properties query fail
    pub fn with_failing_properties(mut self) -> Self {
        self.properties = None;
        self
    }

    /// Handle to this domain's counter
    pub fn counter(&self) -> MockCounter {
        self.counter.clone()
    }
}

impl CounterSource for MockPowerDomain {
    fn energy_counter(&self) -> Result<EnergyCounter, SysmanError> {
        self.counter.energy_counter()
    }
}

/// Mock device
#[derive(Debug, Clone)]
pub struct MockDevice {
    properties: Option<DeviceProperties>,
    domains: Option<Vec<MockPowerDomain>>,
}

impl MockDevice {
    /// Create a mock device with no domains
    pub fn new(name: impl Into<String>, uuid: DeviceUuid) -> Self {
        Self {
            properties: Some(DeviceProperties::new(name, uuid)),
            domains: Some(Vec::new()),
        }
    }

    /// Builder: add a power domain
    pub fn with_domain(mut self, domain: MockPowerDomain) -> Self {
        self.domains.get_or_insert_with(Vec::new).push(domain);
        self
    }

    /// Builder: make the properties query fail
    pub fn with_failing_properties(mut self) -> Self {
        self.properties = None;
        self
    }

    /// Builder: make power domain enumeration fail
    pub fn with_failing_domains(mut self) -> Self {
        self.domains = None;
        self
    }
}

/// Mock driver
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    devices: Option<Vec<MockDevice>>,
}

impl MockDriver {
    /// Create a driver with no devices
    pub fn new() -> Self {
        Self {
            devices: Some(Vec::new()),
        }
    }

    /// Builder: add a device
    pub fn with_device(mut self, device: MockDevice) -> Self {
        self.devices.get_or_insert_with(Vec::new).push(device);
        self
    }

    /// Builder: make device enumeration fail
    pub fn with_failing_devices(mut self) -> Self {
        self.devices = None;
        self
    }
}

/// Mock Sysman backend
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    init_fails: bool,
    drivers_fail: bool,
    drivers: Vec<MockDriver>,
    init_calls: Arc<Mutex<usize>>,
}

impl MockBackend {
    /// Create a backend with no drivers
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a driver
    pub fn with_driver(mut self, driver: MockDriver) -> Self {
        self.drivers.push(driver);
        self
    }

    /// Builder: single driver holding the given devices
    pub fn with_devices(self, devices: impl IntoIterator<Item = MockDevice>) -> Self {
        let driver = devices
            .into_iter()
            .fold(MockDriver::new(), MockDriver::with_device);
        self.with_driver(driver)
    }

    /// Builder: make `init` fail
    pub fn with_failing_init(mut self) -> Self {
        self.init_fails = true;
        self
    }

    /// Builder: make driver enumeration fail
    pub fn with_failing_drivers(mut self) -> Self {
        self.drivers_fail = true;
        self
    }

    /// Number of times `init` was called
    pub fn init_calls(&self) -> usize {
        *self.init_calls.lock().unwrap()
    }
}

fn failed(function: &'static str) -> SysmanError {
    SysmanError::call(function, ZeResult::ERROR_UNKNOWN)
}

impl SysmanBackend for MockBackend {
    type Driver = MockDriver;
    type Device = MockDevice;
    type PowerDomain = MockPowerDomain;

    fn init(&self) -> Result<(), SysmanError> {
        *self.init_calls.lock().unwrap() += 1;
        if self.init_fails {
            return Err(SysmanError::call("zesInit", ZeResult::ERROR_UNINITIALIZED));
        }
        Ok(())
    }

    fn drivers(&self) -> Result<Vec<Self::Driver>, SysmanError> {
        if self.drivers_fail {
            return Err(failed("zesDriverGet"));
        }
        Ok(self.drivers.clone())
    }

    fn devices(&self, driver: &Self::Driver) -> Result<Vec<Self::Device>, SysmanError> {
        driver.devices.clone().ok_or_else(|| failed("zesDeviceGet"))
    }

    fn device_properties(&self, device: &Self::Device) -> Result<DeviceProperties, SysmanError> {
        device
            .properties
            .clone()
            .ok_or_else(|| failed("zesDeviceGetProperties"))
    }

    fn power_domains(&self, device: &Self::Device) -> Result<Vec<Self::PowerDomain>, SysmanError> {
        device
            .domains
            .clone()
            .ok_or_else(|| failed("zesDeviceEnumPowerDomains"))
    }

    fn power_properties(
        &self,
        domain: &Self::PowerDomain,
    ) -> Result<PowerProperties, SysmanError> {
        domain
            .properties
            .ok_or_else(|| failed("zesPowerGetProperties"))
    }
}
