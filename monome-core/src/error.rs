//! Errors reported by the device model

use monome_protocol::FrameError;

/// Errors returned by [`crate::device::MonomeDevice`] and its parts
///
/// None of these are fatal. The worst case is a device that has gone
/// inactive and needs probing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// The byte transport failed; the device is now inactive
    Transport,
    /// Operation needs an active device
    Inactive,
    /// Operation belongs to the other mode (grid vs arc), or no mode is set
    WrongMode,
    /// Device is already configured in the other mode
    ModeLocked,
    /// Grid or arc dimensions out of range
    InvalidSize,
    /// Rotation not in 0..=3
    InvalidRotation,
    /// Coordinate, ring or LED index outside the device
    OutOfBounds,
    /// Tilt sensor index not in 0..4
    SensorOutOfRange,
    /// Frame could not be encoded
    Protocol(FrameError),
}

impl From<FrameError> for DeviceError {
    fn from(err: FrameError) -> Self {
        DeviceError::Protocol(err)
    }
}
