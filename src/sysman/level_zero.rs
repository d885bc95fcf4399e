//! Level Zero Sysman backend
//!
//! Loads the Level Zero loader at runtime and implements [`SysmanBackend`]
//! on top of the raw entry points in [`crate::sysman::ffi`].

use crate::domain::{DeviceProperties, EnergyCounter, PowerProperties};
use crate::error::SysmanError;
use crate::sysman::ffi::{self, ZeResult};
use crate::sysman::traits::{CounterSource, SysmanBackend};

use libloading::Library;
use std::ffi::c_void;
use std::fmt;
use std::mem;
use std::ptr;
use std::rc::Rc;

/// Loader library names, tried in order
const LOADER_NAMES: &[&str] = &["libze_loader.so.1", "libze_loader.so", "ze_loader.dll"];

/// Resolved Sysman entry points
///
/// The library stays loaded for as long as any backend or power domain
/// handle holds this table.
struct Api {
    init: ffi::zesInit_t,
    driver_get: ffi::zesDriverGet_t,
    device_get: ffi::zesDeviceGet_t,
    device_get_properties: ffi::zesDeviceGetProperties_t,
    device_enum_power_domains: ffi::zesDeviceEnumPowerDomains_t,
    power_get_properties: ffi::zesPowerGetProperties_t,
    power_get_energy_counter: ffi::zesPowerGetEnergyCounter_t,
    _lib: Library,
}

impl Api {
    fn load() -> Result<Self, SysmanError> {
        // SAFETY: Loading the vendor loader runs its initializers, which is
        // the documented way to use it.
        let lib = LOADER_NAMES
            .iter()
            .find_map(|name| unsafe { Library::new(name) }.ok())
            .ok_or(SysmanError::LibraryNotFound)?;

        // SAFETY: Each type alias matches the prototype in zes_api.h
        unsafe {
            Ok(Self {
                init: symbol(&lib, b"zesInit\0")?,
                driver_get: symbol(&lib, b"zesDriverGet\0")?,
                device_get: symbol(&lib, b"zesDeviceGet\0")?,
                device_get_properties: symbol(&lib, b"zesDeviceGetProperties\0")?,
                device_enum_power_domains: symbol(&lib, b"zesDeviceEnumPowerDomains\0")?,
                power_get_properties: symbol(&lib, b"zesPowerGetProperties\0")?,
                power_get_energy_counter: symbol(&lib, b"zesPowerGetEnergyCounter\0")?,
                _lib: lib,
            })
        }
    }
}

/// Copy a function pointer out of the library
///
/// # Safety
/// `T` must be the correct function pointer type for `name`.
unsafe fn symbol<T: Copy>(lib: &Library, name: &[u8]) -> Result<T, SysmanError> {
    lib.get::<T>(name).map(|s| *s).map_err(|e| {
        let name = String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name));
        SysmanError::MissingSymbol(format!("{}: {}", name, e))
    })
}

fn check(function: &'static str, code: ZeResult) -> Result<(), SysmanError> {
    if code.is_success() {
        Ok(())
    } else {
        Err(SysmanError::call(function, code))
    }
}

/// Run the two-call enumeration protocol: query the count, then fill
fn enumerate<F>(function: &'static str, mut call: F) -> Result<Vec<*mut c_void>, SysmanError>
where
    F: FnMut(*mut u32, *mut *mut c_void) -> ZeResult,
{
    let mut count: u32 = 0;
    check(function, call(&mut count, ptr::null_mut()))?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut handles: Vec<*mut c_void> = vec![ptr::null_mut(); count as usize];
    check(function, call(&mut count, handles.as_mut_ptr()))?;
    handles.truncate(count as usize);
    Ok(handles)
}

/// Level Zero Sysman backend
pub struct LevelZero {
    api: Rc<Api>,
}

impl LevelZero {
    /// Load the Level Zero loader and resolve the Sysman entry points
    ///
    /// This does not call `zesInit`; that happens in [`SysmanBackend::init`].
    pub fn load() -> Result<Self, SysmanError> {
        let api = Api::load()?;
        log::debug!("Loaded Level Zero loader");
        Ok(Self { api: Rc::new(api) })
    }
}

impl fmt::Debug for LevelZero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelZero").finish_non_exhaustive()
    }
}

/// Sysman driver handle
#[derive(Debug, Clone, Copy)]
pub struct LevelZeroDriver(ffi::zes_driver_handle_t);

/// Sysman device handle
#[derive(Debug, Clone, Copy)]
pub struct LevelZeroDevice(ffi::zes_device_handle_t);

/// Sysman power domain handle, keeping the loader alive
#[derive(Clone)]
pub struct LevelZeroPowerDomain {
    api: Rc<Api>,
    handle: ffi::zes_pwr_handle_t,
}

impl fmt::Debug for LevelZeroPowerDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelZeroPowerDomain")
            .field("handle", &self.handle)
            .finish()
    }
}

impl CounterSource for LevelZeroPowerDomain {
    fn energy_counter(&self) -> Result<EnergyCounter, SysmanError> {
        let mut counter = ffi::zes_power_energy_counter_t::default();
        // SAFETY: handle came from zesDeviceEnumPowerDomains on this loader
        let result = unsafe { (self.api.power_get_energy_counter)(self.handle, &mut counter) };
        check("zesPowerGetEnergyCounter", result)?;
        Ok(EnergyCounter::new(counter.energy, counter.timestamp))
    }
}

impl SysmanBackend for LevelZero {
    type Driver = LevelZeroDriver;
    type Device = LevelZeroDevice;
    type PowerDomain = LevelZeroPowerDomain;

    fn init(&self) -> Result<(), SysmanError> {
        // SAFETY: zesInit takes no pointers
        let result = unsafe { (self.api.init)(0) };
        check("zesInit", result)
    }

    fn drivers(&self) -> Result<Vec<Self::Driver>, SysmanError> {
        let handles = enumerate("zesDriverGet", |count, out| {
            // SAFETY: out is null or points to `*count` writable handles
            unsafe { (self.api.driver_get)(count, out) }
        })?;
        Ok(handles.into_iter().map(LevelZeroDriver).collect())
    }

    fn devices(&self, driver: &Self::Driver) -> Result<Vec<Self::Device>, SysmanError> {
        let handles = enumerate("zesDeviceGet", |count, out| {
            // SAFETY: as above; driver handle came from zesDriverGet
            unsafe { (self.api.device_get)(driver.0, count, out) }
        })?;
        Ok(handles.into_iter().map(LevelZeroDevice).collect())
    }

    fn device_properties(&self, device: &Self::Device) -> Result<DeviceProperties, SysmanError> {
        // SAFETY: all-zero is a valid bit pattern for this plain C struct
        let mut props: ffi::zes_device_properties_t = unsafe { mem::zeroed() };
        props.stype = ffi::ZES_STRUCTURE_TYPE_DEVICE_PROPERTIES;
        props.core.stype = ffi::ZE_STRUCTURE_TYPE_DEVICE_PROPERTIES;

        // SAFETY: props is a properly initialized output struct
        let result = unsafe { (self.api.device_get_properties)(device.0, &mut props) };
        check("zesDeviceGetProperties", result)?;

        Ok(DeviceProperties::new(
            ffi::fixed_c_str(&props.model_name),
            props.core.uuid.id,
        ))
    }

    fn power_domains(&self, device: &Self::Device) -> Result<Vec<Self::PowerDomain>, SysmanError> {
        let handles = enumerate("zesDeviceEnumPowerDomains", |count, out| {
            // SAFETY: as above; device handle came from zesDeviceGet
            unsafe { (self.api.device_enum_power_domains)(device.0, count, out) }
        })?;
        Ok(handles
            .into_iter()
            .map(|handle| LevelZeroPowerDomain {
                api: Rc::clone(&self.api),
                handle,
            })
            .collect())
    }

    fn power_properties(
        &self,
        domain: &Self::PowerDomain,
    ) -> Result<PowerProperties, SysmanError> {
        // SAFETY: all-zero is a valid bit pattern for this plain C struct
        let mut props: ffi::zes_power_properties_t = unsafe { mem::zeroed() };
        props.stype = ffi::ZES_STRUCTURE_TYPE_POWER_PROPERTIES;

        // SAFETY: props is a properly initialized output struct
        let result = unsafe { (self.api.power_get_properties)(domain.handle, &mut props) };
        check("zesPowerGetProperties", result)?;

        Ok(PowerProperties {
            on_subdevice: props.on_subdevice != 0,
            subdevice_id: props.subdevice_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_two_call_protocol() {
        let mut calls = 0;
        let handles = enumerate("zesDriverGet", |count, out| {
            calls += 1;
            unsafe {
                if out.is_null() {
                    *count = 2;
                } else {
                    *out = 0x10 as *mut c_void;
                    *out.add(1) = 0x20 as *mut c_void;
                }
            }
            ZeResult::SUCCESS
        })
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(handles, vec![0x10 as *mut c_void, 0x20 as *mut c_void]);
    }

    #[test]
    fn test_enumerate_empty_skips_fill() {
        let mut calls = 0;
        let handles = enumerate("zesDeviceGet", |_, _| {
            calls += 1;
            ZeResult::SUCCESS
        })
        .unwrap();

        assert!(handles.is_empty());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_enumerate_reports_failure() {
        let err = enumerate("zesDeviceEnumPowerDomains", |_, _| {
            ZeResult::ERROR_UNINITIALIZED
        })
        .unwrap_err();

        assert_eq!(
            err,
            SysmanError::call("zesDeviceEnumPowerDomains", ZeResult::ERROR_UNINITIALIZED)
        );
    }

    // These tests require an Intel GPU with the Level Zero loader installed

    #[test]
    #[ignore = "Requires Level Zero GPU"]
    fn test_level_zero_init() {
        let backend = LevelZero::load().unwrap();
        assert!(backend.init().is_ok());
    }

    #[test]
    #[ignore = "Requires Level Zero GPU"]
    fn test_level_zero_drivers() {
        let backend = LevelZero::load().unwrap();
        backend.init().unwrap();
        assert!(!backend.drivers().unwrap().is_empty());
    }
}
