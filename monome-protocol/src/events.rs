//! Input events produced by grids and arcs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One grid button transition
///
/// The all-zero value doubles as the "no event" sentinel returned by an
/// empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridEvent {
    /// Column, in logical (rotated) coordinates
    pub x: u8,
    /// Row, in logical (rotated) coordinates
    pub y: u8,
    /// True on key down, false on key up
    pub pressed: bool,
}

impl GridEvent {
    /// Sentinel returned when no event is queued
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        pressed: false,
    };

    pub const fn new(x: u8, y: u8, pressed: bool) -> Self {
        Self { x, y, pressed }
    }

    /// Returns 1 for a press and 0 for a release
    pub fn state(&self) -> u8 {
        self.pressed as u8
    }
}

/// One encoder movement on an arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcEvent {
    /// Encoder number
    pub index: u8,
    /// Signed rotation in ticks, positive is clockwise
    pub delta: i8,
}

impl ArcEvent {
    /// Sentinel returned when no event is queued
    pub const EMPTY: Self = Self { index: 0, delta: 0 };

    pub const fn new(index: u8, delta: i8) -> Self {
        Self { index, delta }
    }

    /// Returns true for clockwise movement
    pub fn is_clockwise(&self) -> bool {
        self.delta > 0
    }
}
