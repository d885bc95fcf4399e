//! Power domain and device trackers
//!
//! A tracker owns the counter source for one power domain plus the last
//! reading seen from it, and turns each new reading into watts.

use crate::domain::{
    compute_power, DeviceInfo, DeviceSnapshot, DomainKind, DomainSample, EnergyCounter,
};
use crate::error::SysmanError;
use crate::sysman::CounterSource;

/// Tracks one power domain between sampling passes
#[derive(Debug)]
pub struct DomainTracker<S> {
    source: S,
    kind: DomainKind,
    last: EnergyCounter,
}

impl<S: CounterSource> DomainTracker<S> {
    /// Create a tracker seeded with a baseline reading
    pub fn new(source: S, kind: DomainKind, baseline: EnergyCounter) -> Self {
        Self {
            source,
            kind,
            last: baseline,
        }
    }

    /// Domain classification
    pub fn kind(&self) -> DomainKind {
        self.kind
    }

    /// Last successfully read counter
    pub fn last_counter(&self) -> EnergyCounter {
        self.last
    }

    /// Compute power against the stored baseline and adopt `current` as the
    /// new baseline, whether or not a value could be derived
    pub fn update(&mut self, current: EnergyCounter) -> Option<f64> {
        let power = compute_power(&self.last, &current);
        self.last = current;
        power
    }

    /// Read the counter and compute power
    ///
    /// A failed read leaves the baseline untouched.
    pub fn poll(&mut self) -> Result<(EnergyCounter, Option<f64>), SysmanError> {
        let current = self.source.energy_counter()?;
        Ok((current, self.update(current)))
    }

    /// Sample once, folding read failures into the result
    pub fn sample(&mut self) -> DomainSample {
        match self.poll() {
            Ok((counter, power)) => DomainSample {
                kind: self.kind,
                power,
                counter: Some(counter),
            },
            Err(e) => {
                log::debug!("Skipping {} this pass: {}", self.kind, e);
                DomainSample::failed(self.kind)
            }
        }
    }
}

/// Tracks every power domain of one device
#[derive(Debug)]
pub struct DeviceTracker<S> {
    info: DeviceInfo,
    domains: Vec<DomainTracker<S>>,
}

impl<S: CounterSource> DeviceTracker<S> {
    pub fn new(info: DeviceInfo, domains: Vec<DomainTracker<S>>) -> Self {
        Self { info, domains }
    }

    /// Device identity
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Tracked domains in discovery order
    pub fn domains(&self) -> &[DomainTracker<S>] {
        &self.domains
    }

    /// Sample every domain once, in stored order
    pub fn sample(&mut self) -> DeviceSnapshot {
        DeviceSnapshot {
            name: self.info.name.clone(),
            uuid: self.info.uuid.clone(),
            domains: self.domains.iter_mut().map(DomainTracker::sample).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PowerReading, POWER_UNAVAILABLE};
    use crate::mock::MockCounter;

    fn tracker(kind: DomainKind, baseline: EnergyCounter) -> (DomainTracker<MockCounter>, MockCounter) {
        let counter = MockCounter::new(baseline);
        (DomainTracker::new(counter.clone(), kind, baseline), counter)
    }

    #[test]
    fn test_update_computes_watts() {
        let (mut t, _) = tracker(DomainKind::Card, EnergyCounter::new(1000, 0));
        assert_eq!(t.update(EnergyCounter::new(3000, 1000)), Some(2.0));
        assert_eq!(t.last_counter(), EnergyCounter::new(3000, 1000));
    }

    #[test]
    fn test_zero_delta_time_still_advances_baseline() {
        let (mut t, _) = tracker(DomainKind::Card, EnergyCounter::new(1000, 500));
        assert_eq!(t.update(EnergyCounter::new(2000, 500)), None);
        assert_eq!(t.last_counter(), EnergyCounter::new(2000, 500));

        // next delta is measured from the skipped sample, not the original one
        assert_eq!(t.update(EnergyCounter::new(2500, 1000)), Some(1.0));
    }

    #[test]
    fn test_failed_read_keeps_baseline() {
        let (mut t, counter) = tracker(DomainKind::Tile(0), EnergyCounter::new(100, 100));
        counter.fail_next();

        assert!(t.poll().is_err());
        assert_eq!(t.last_counter(), EnergyCounter::new(100, 100));

        counter.push(EnergyCounter::new(600, 200));
        let (current, power) = t.poll().unwrap();
        assert_eq!(current, EnergyCounter::new(600, 200));
        assert_eq!(power, Some(5.0));
    }

    #[test]
    fn test_sample_folds_failure() {
        let (mut t, counter) = tracker(DomainKind::Tile(1), EnergyCounter::new(0, 0));
        counter.fail_next();

        let sample = t.sample();
        assert_eq!(sample, DomainSample::failed(DomainKind::Tile(1)));
    }

    #[test]
    fn test_wrapped_counter_through_tracker() {
        let (mut t, counter) = tracker(DomainKind::Card, EnergyCounter::new(u64::MAX - 9, u64::MAX - 9));
        counter.push(EnergyCounter::new(10, 0));

        // energy delta 19, time delta 9
        let (_, power) = t.poll().unwrap();
        let power = power.unwrap();
        assert!(power >= 0.0);
        assert_eq!(power, 19.0 / 9.0);
    }

    #[test]
    fn test_device_sample_routes_domains() {
        let (card, card_counter) = tracker(DomainKind::Card, EnergyCounter::new(0, 0));
        let (tile0, tile0_counter) = tracker(DomainKind::Tile(0), EnergyCounter::new(0, 0));
        let (tile1, tile1_counter) = tracker(DomainKind::Tile(1), EnergyCounter::new(0, 0));

        card_counter.push(EnergyCounter::new(300_000, 1_000));
        tile0_counter.push(EnergyCounter::new(100_000, 1_000));
        tile1_counter.fail_next();

        let mut device = DeviceTracker::new(
            DeviceInfo::new("Max 1550", "aa:bb"),
            vec![card, tile0, tile1],
        );
        let snapshot = device.sample();
        assert_eq!(snapshot.domains.len(), 3);

        let reading = PowerReading::from(&snapshot);
        assert_eq!(reading.gpu_name, "Max 1550");
        assert_eq!(reading.card_power, 300.0);
        assert_eq!(reading.tile0_power, 100.0);
        assert_eq!(reading.tile1_power, POWER_UNAVAILABLE);
    }
}
