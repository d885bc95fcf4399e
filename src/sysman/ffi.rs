//! Raw Level Zero Sysman declarations
//!
//! Only the handful of types and entry points used for power telemetry are
//! declared here. Layouts follow `ze_api.h` / `zes_api.h`.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};
use std::fmt;

pub type zes_driver_handle_t = *mut c_void;
pub type zes_device_handle_t = *mut c_void;
pub type zes_pwr_handle_t = *mut c_void;
pub type ze_bool_t = u8;

pub const ZE_MAX_DEVICE_UUID_SIZE: usize = 16;
pub const ZE_MAX_DEVICE_NAME: usize = 256;
pub const ZES_STRING_PROPERTY_SIZE: usize = 64;

pub const ZE_STRUCTURE_TYPE_DEVICE_PROPERTIES: u32 = 0x3;
pub const ZES_STRUCTURE_TYPE_DEVICE_PROPERTIES: u32 = 0x1;
pub const ZES_STRUCTURE_TYPE_POWER_PROPERTIES: u32 = 0xd;

/// Status code returned by every Level Zero entry point
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeResult(pub u32);

impl ZeResult {
    pub const SUCCESS: Self = Self(0);
    pub const ERROR_DEVICE_LOST: Self = Self(0x7000_0001);
    pub const ERROR_INSUFFICIENT_PERMISSIONS: Self = Self(0x7001_0000);
    pub const ERROR_NOT_AVAILABLE: Self = Self(0x7001_0001);
    pub const ERROR_UNINITIALIZED: Self = Self(0x7800_0001);
    pub const ERROR_UNSUPPORTED_FEATURE: Self = Self(0x7800_0003);
    pub const ERROR_INVALID_NULL_HANDLE: Self = Self(0x7800_0005);
    pub const ERROR_INVALID_NULL_POINTER: Self = Self(0x7800_0007);
    pub const ERROR_UNKNOWN: Self = Self(0x7fff_fffe);

    #[inline]
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Short name for the codes worth spelling out in diagnostics
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::SUCCESS => Some("SUCCESS"),
            Self::ERROR_DEVICE_LOST => Some("DEVICE_LOST"),
            Self::ERROR_INSUFFICIENT_PERMISSIONS => Some("INSUFFICIENT_PERMISSIONS"),
            Self::ERROR_NOT_AVAILABLE => Some("NOT_AVAILABLE"),
            Self::ERROR_UNINITIALIZED => Some("UNINITIALIZED"),
            Self::ERROR_UNSUPPORTED_FEATURE => Some("UNSUPPORTED_FEATURE"),
            Self::ERROR_INVALID_NULL_HANDLE => Some("INVALID_NULL_HANDLE"),
            Self::ERROR_INVALID_NULL_POINTER => Some("INVALID_NULL_POINTER"),
            _ => None,
        }
    }
}

impl fmt::Display for ZeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN ({:#x})", self.0),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ze_device_uuid_t {
    pub id: [u8; ZE_MAX_DEVICE_UUID_SIZE],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ze_device_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub device_type: u32,
    pub vendor_id: u32,
    pub device_id: u32,
    pub flags: u32,
    pub subdevice_id: u32,
    pub core_clock_rate: u32,
    pub max_mem_alloc_size: u64,
    pub max_hardware_contexts: u32,
    pub max_command_queue_priority: u32,
    pub num_threads_per_eu: u32,
    pub physical_eu_simd_width: u32,
    pub num_eus_per_subslice: u32,
    pub num_subslices_per_slice: u32,
    pub num_slices: u32,
    pub timer_resolution: u64,
    pub timestamp_valid_bits: u32,
    pub kernel_timestamp_valid_bits: u32,
    pub uuid: ze_device_uuid_t,
    pub name: [c_char; ZE_MAX_DEVICE_NAME],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct zes_device_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub core: ze_device_properties_t,
    pub num_subdevices: u32,
    pub serial_number: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub board_number: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub brand_name: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub model_name: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub vendor_name: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub driver_version: [c_char; ZES_STRING_PROPERTY_SIZE],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct zes_power_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub on_subdevice: ze_bool_t,
    pub subdevice_id: u32,
    pub can_control: ze_bool_t,
    pub is_energy_threshold_supported: ze_bool_t,
    pub default_limit: i32,
    pub min_limit: i32,
    pub max_limit: i32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct zes_power_energy_counter_t {
    /// Cumulative energy in microjoules
    pub energy: u64,
    /// Timestamp of the reading in microseconds
    pub timestamp: u64,
}

pub type zesInit_t = unsafe extern "C" fn(flags: u32) -> ZeResult;
pub type zesDriverGet_t =
    unsafe extern "C" fn(count: *mut u32, drivers: *mut zes_driver_handle_t) -> ZeResult;
pub type zesDeviceGet_t = unsafe extern "C" fn(
    driver: zes_driver_handle_t,
    count: *mut u32,
    devices: *mut zes_device_handle_t,
) -> ZeResult;
pub type zesDeviceGetProperties_t = unsafe extern "C" fn(
    device: zes_device_handle_t,
    properties: *mut zes_device_properties_t,
) -> ZeResult;
pub type zesDeviceEnumPowerDomains_t = unsafe extern "C" fn(
    device: zes_device_handle_t,
    count: *mut u32,
    power: *mut zes_pwr_handle_t,
) -> ZeResult;
pub type zesPowerGetProperties_t = unsafe extern "C" fn(
    power: zes_pwr_handle_t,
    properties: *mut zes_power_properties_t,
) -> ZeResult;
pub type zesPowerGetEnergyCounter_t = unsafe extern "C" fn(
    power: zes_pwr_handle_t,
    energy: *mut zes_power_energy_counter_t,
) -> ZeResult;

/// Decode a fixed-size, NUL-terminated C string field
pub fn fixed_c_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .map(|&c| c as u8)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
