//! Grid rotation
//!
//! A grid can be mounted at 0, 90, 180 or 270 degrees. Applications address
//! LEDs and receive keys in logical coordinates; the wire and the LED buffer
//! use the device's physical coordinates. Both directions go through the
//! same [`rotate`] step, the inverse simply being the opposite rotation
//! applied in physical space.

use crate::frame::FrameError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mounting orientation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Rotation {
    #[default]
    Deg0 = 0,
    Deg90 = 1,
    Deg180 = 2,
    Deg270 = 3,
}

impl TryFrom<u8> for Rotation {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Deg0),
            1 => Ok(Rotation::Deg90),
            2 => Ok(Rotation::Deg180),
            3 => Ok(Rotation::Deg270),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Wire value (0..=3)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Rotation that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg0,
            Rotation::Deg90 => Rotation::Deg270,
            Rotation::Deg180 => Rotation::Deg180,
            Rotation::Deg270 => Rotation::Deg90,
        }
    }

    /// True for 90 and 270 degrees, where width and height trade places
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Logical (width, height) of a device that is physically
    /// `columns` × `rows`
    pub fn logical_size(self, columns: u8, rows: u8) -> (u8, u8) {
        if self.swaps_axes() {
            (rows, columns)
        } else {
            (columns, rows)
        }
    }

    /// Map logical coordinates onto the physical `columns` × `rows` grid
    ///
    /// Returns `None` if `(x, y)` lies outside the logical rectangle.
    pub fn to_physical(self, x: u8, y: u8, columns: u8, rows: u8) -> Option<(u8, u8)> {
        let (width, height) = self.logical_size(columns, rows);
        if x >= width || y >= height {
            return None;
        }
        Some(rotate(self, x, y, width, height))
    }

    /// Map physical coordinates back to logical ones
    ///
    /// Returns `None` if `(x, y)` lies outside the physical grid.
    pub fn to_logical(self, x: u8, y: u8, columns: u8, rows: u8) -> Option<(u8, u8)> {
        if x >= columns || y >= rows {
            return None;
        }
        Some(rotate(self.inverse(), x, y, columns, rows))
    }
}

/// Rotate `(x, y)` inside a `width` × `height` rectangle clockwise by
/// `rotation`; the result lies in the rotated rectangle.
///
/// Callers guarantee `x < width` and `y < height`.
fn rotate(rotation: Rotation, x: u8, y: u8, width: u8, height: u8) -> (u8, u8) {
    match rotation {
        Rotation::Deg0 => (x, y),
        Rotation::Deg90 => (height - 1 - y, x),
        Rotation::Deg180 => (width - 1 - x, height - 1 - y),
        Rotation::Deg270 => (y, width - 1 - x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_u8() {
        assert_eq!(Rotation::try_from(1), Ok(Rotation::Deg90));
        assert_eq!(Rotation::try_from(4), Err(FrameError::InvalidFrame));
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::try_from(rotation.as_u8()), Ok(rotation));
        }
    }

    #[test]
    fn test_corners_16x8() {
        // 16 columns, 8 rows; logical top-left lands on each physical corner
        assert_eq!(Rotation::Deg0.to_physical(0, 0, 16, 8), Some((0, 0)));
        assert_eq!(Rotation::Deg90.to_physical(0, 0, 16, 8), Some((15, 0)));
        assert_eq!(Rotation::Deg180.to_physical(0, 0, 16, 8), Some((15, 7)));
        assert_eq!(Rotation::Deg270.to_physical(0, 0, 16, 8), Some((0, 7)));
    }

    #[test]
    fn test_logical_size_swaps() {
        assert_eq!(Rotation::Deg0.logical_size(16, 8), (16, 8));
        assert_eq!(Rotation::Deg90.logical_size(16, 8), (8, 16));
        assert_eq!(Rotation::Deg180.logical_size(16, 8), (16, 8));
        assert_eq!(Rotation::Deg270.logical_size(16, 8), (8, 16));
    }

    #[test]
    fn test_out_of_bounds() {
        assert_eq!(Rotation::Deg0.to_physical(16, 0, 16, 8), None);
        // Under 90 degrees the logical grid is 8 wide
        assert_eq!(Rotation::Deg90.to_physical(8, 0, 16, 8), None);
        assert_eq!(Rotation::Deg90.to_physical(7, 15, 16, 8), Some((0, 7)));
        assert_eq!(Rotation::Deg270.to_logical(0, 8, 16, 8), None);
    }

    #[test]
    fn test_mapping_is_a_permutation() {
        for rotation in Rotation::ALL {
            let mut seen = [false; 16 * 8];
            let (w, h) = rotation.logical_size(16, 8);
            for y in 0..h {
                for x in 0..w {
                    let (px, py) = rotation.to_physical(x, y, 16, 8).unwrap();
                    let index = py as usize * 16 + px as usize;
                    assert!(!seen[index], "{:?} maps two cells onto one", rotation);
                    seen[index] = true;
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    proptest! {
        #[test]
        fn prop_inverse_undoes_forward(
            r in 0u8..4,
            columns in 1u8..=16,
            rows in 1u8..=16,
            x_seed in any::<u8>(),
            y_seed in any::<u8>(),
        ) {
            let rotation = Rotation::try_from(r).unwrap();
            let (w, h) = rotation.logical_size(columns, rows);
            let (x, y) = (x_seed % w, y_seed % h);

            let (px, py) = rotation.to_physical(x, y, columns, rows).unwrap();
            prop_assert!(px < columns && py < rows);
            prop_assert_eq!(rotation.to_logical(px, py, columns, rows), Some((x, y)));
        }
    }
}
