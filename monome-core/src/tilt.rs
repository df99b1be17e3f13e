//! Tilt report suppression
//!
//! Some grids carry up to four 3-axis tilt sensors. Samples arrive far more
//! often than they change, so each sensor remembers the last sample that was
//! actually sent and identical samples are not sent again.

use crate::error::DeviceError;

/// Number of tilt sensors a device can carry
pub const TILT_SENSORS: usize = 4;

/// One 3-axis reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl TiltSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SensorState {
    active: bool,
    last: Option<TiltSample>,
}

/// Per-sensor enable flag and last-sent cache
#[derive(Debug, Clone, Default)]
pub struct TiltTracker {
    sensors: [SensorState; TILT_SENSORS],
}

impl TiltTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn sensor(&self, sensor: u8) -> Result<&SensorState, DeviceError> {
        self.sensors
            .get(sensor as usize)
            .ok_or(DeviceError::SensorOutOfRange)
    }

    fn sensor_mut(&mut self, sensor: u8) -> Result<&mut SensorState, DeviceError> {
        self.sensors
            .get_mut(sensor as usize)
            .ok_or(DeviceError::SensorOutOfRange)
    }

    /// Enable or disable reporting for one sensor
    ///
    /// Toggling forgets the cached sample, so the first reading after
    /// enabling is always reported.
    pub fn set_active(&mut self, sensor: u8, active: bool) -> Result<(), DeviceError> {
        let state = self.sensor_mut(sensor)?;
        if state.active != active {
            state.last = None;
        }
        state.active = active;
        Ok(())
    }

    pub fn is_active(&self, sensor: u8) -> Result<bool, DeviceError> {
        Ok(self.sensor(sensor)?.active)
    }

    /// Bitmask of enabled sensors, bit n for sensor n
    pub fn active_mask(&self) -> u8 {
        self.sensors
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    /// Whether `sample` should go on the wire
    ///
    /// False for a disabled sensor or a sample equal to the last one sent.
    pub fn should_report(&self, sensor: u8, sample: TiltSample) -> Result<bool, DeviceError> {
        let state = self.sensor(sensor)?;
        Ok(state.active && state.last != Some(sample))
    }

    /// Remember `sample` as sent
    pub fn record(&mut self, sensor: u8, sample: TiltSample) -> Result<(), DeviceError> {
        self.sensor_mut(sensor)?.last = Some(sample);
        Ok(())
    }

    /// Last sample sent for `sensor`
    pub fn last(&self, sensor: u8) -> Result<Option<TiltSample>, DeviceError> {
        Ok(self.sensor(sensor)?.last)
    }

    /// Disable all sensors and forget their samples
    pub fn reset(&mut self) {
        self.sensors = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_sensor_suppressed() {
        let tracker = TiltTracker::new();
        assert_eq!(tracker.should_report(0, TiltSample::new(1, 2, 3)), Ok(false));
    }

    #[test]
    fn test_identical_sample_suppressed() {
        let mut tracker = TiltTracker::new();
        tracker.set_active(1, true).unwrap();
        let sample = TiltSample::new(10, -20, 30);

        assert_eq!(tracker.should_report(1, sample), Ok(true));
        tracker.record(1, sample).unwrap();
        assert_eq!(tracker.should_report(1, sample), Ok(false));
        assert_eq!(tracker.should_report(1, TiltSample::new(10, -20, 31)), Ok(true));
    }

    #[test]
    fn test_first_zero_sample_reported() {
        let mut tracker = TiltTracker::new();
        tracker.set_active(0, true).unwrap();
        assert_eq!(tracker.should_report(0, TiltSample::default()), Ok(true));
    }

    #[test]
    fn test_reenable_forgets_cache() {
        let mut tracker = TiltTracker::new();
        let sample = TiltSample::new(5, 5, 5);
        tracker.set_active(2, true).unwrap();
        tracker.record(2, sample).unwrap();

        tracker.set_active(2, false).unwrap();
        tracker.set_active(2, true).unwrap();
        assert_eq!(tracker.last(2), Ok(None));
        assert_eq!(tracker.should_report(2, sample), Ok(true));
    }

    #[test]
    fn test_sensor_out_of_range() {
        let mut tracker = TiltTracker::new();
        assert_eq!(tracker.set_active(4, true), Err(DeviceError::SensorOutOfRange));
        assert_eq!(
            tracker.should_report(7, TiltSample::default()),
            Err(DeviceError::SensorOutOfRange)
        );
        assert_eq!(
            tracker.record(4, TiltSample::default()),
            Err(DeviceError::SensorOutOfRange)
        );
    }

    #[test]
    fn test_active_mask() {
        let mut tracker = TiltTracker::new();
        tracker.set_active(0, true).unwrap();
        tracker.set_active(3, true).unwrap();
        assert_eq!(tracker.active_mask(), 0b1001);

        tracker.reset();
        assert_eq!(tracker.active_mask(), 0);
    }
}
