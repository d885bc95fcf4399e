//! Energy counter types
//!
//! Converts pairs of cumulative energy readings into instantaneous power.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw energy counter reading for a power domain
///
/// Energy is in microjoules and the timestamp in microseconds, so the ratio
/// of their deltas is directly in watts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyCounter {
    /// Cumulative energy (µJ)
    pub energy: u64,
    /// Reading timestamp (µs)
    pub timestamp: u64,
}

impl EnergyCounter {
    /// Create a new counter reading
    pub const fn new(energy: u64, timestamp: u64) -> Self {
        Self { energy, timestamp }
    }

    /// Cumulative energy in joules
    #[inline]
    pub fn joules(&self) -> f64 {
        self.energy as f64 / 1e6
    }
}

impl fmt::Display for EnergyCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} J @ {}us", self.joules(), self.timestamp)
    }
}

/// Difference between two readings of a monotonically increasing counter
///
/// A current value below the previous one means the counter wrapped once;
/// the delta is then `(current + u64::MAX) - previous`, which always fits.
#[inline]
pub fn counter_delta(previous: u64, current: u64) -> u64 {
    if current < previous {
        u64::MAX - (previous - current)
    } else {
        current - previous
    }
}

/// Power in watts between two readings, or `None` if no time elapsed
pub fn compute_power(previous: &EnergyCounter, current: &EnergyCounter) -> Option<f64> {
    let delta_time = counter_delta(previous.timestamp, current.timestamp);
    if delta_time == 0 {
        return None;
    }
    let delta_energy = counter_delta(previous.energy, current.energy);
    Some(delta_energy as f64 / delta_time as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_from_plain_deltas() {
        let previous = EnergyCounter::new(1000, 0);
        let current = EnergyCounter::new(3000, 1000);
        assert_eq!(compute_power(&previous, &current), Some(2.0));
    }

    #[test]
    fn test_zero_delta_time_yields_nothing() {
        let previous = EnergyCounter::new(1000, 500);
        let current = EnergyCounter::new(9000, 500);
        assert_eq!(compute_power(&previous, &current), None);
    }

    #[test]
    fn test_timestamp_wraparound() {
        let previous = u64::MAX - 10;
        let current = 5;
        // (5 + MAX) - (MAX - 10)
        assert_eq!(counter_delta(previous, current), 15);
    }

    #[test]
    fn test_energy_wraparound_gives_non_negative_power() {
        let previous = EnergyCounter::new(u64::MAX - 499, 1_000);
        let current = EnergyCounter::new(500, 2_000);
        let power = compute_power(&previous, &current).unwrap();
        // energy delta: MAX - (MAX - 499 - 500) = 999
        assert!(power >= 0.0);
        assert_eq!(power, 0.999);
    }

    #[test]
    fn test_both_counters_wrapped() {
        let previous = EnergyCounter::new(u64::MAX - 1, u64::MAX - 1);
        let current = EnergyCounter::new(3, 1);
        // energy delta: MAX - (MAX - 1 - 3) = 4, time delta: MAX - (MAX - 1 - 1) = 2
        assert_eq!(compute_power(&previous, &current), Some(2.0));
    }

    #[test]
    fn test_no_change_in_energy() {
        let previous = EnergyCounter::new(42, 10);
        let current = EnergyCounter::new(42, 20);
        assert_eq!(compute_power(&previous, &current), Some(0.0));
    }

    #[test]
    fn test_joules() {
        let counter = EnergyCounter::new(2_500_000, 0);
        assert_eq!(counter.joules(), 2.5);
        assert_eq!(counter.to_string(), "2.50 J @ 0us");
    }
}
