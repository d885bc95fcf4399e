//! Sysman abstraction layer
//!
//! Provides trait-based abstractions over Level Zero Sysman for testability.

pub mod ffi;
pub mod level_zero;
pub mod traits;

pub use level_zero::{LevelZero, LevelZeroDevice, LevelZeroDriver, LevelZeroPowerDomain};
pub use traits::{CounterSource, SysmanBackend};
