//! LED frame buffer with per-region change tracking
//!
//! Holds one brightness level per addressable LED in physical device order
//! and a dirty bit per region. A region is one 8×8 quad on a grid or one
//! ring on an arc; refreshing sends whole regions, and only dirty ones.
//!
//! Index layout:
//! - Grid: row-major, `y * columns + x`, physical coordinates
//! - Arc: `ring * 64 + led`

use core::ops::Range;

use monome_protocol::{QUAD_LEDS, RING_LEDS};

/// LEDs in the largest supported device (16×16 grid, or 4 rings × 64)
pub const MAX_LED_COUNT: usize = 256;

/// Side length of a grid quad
pub const QUAD_SIZE: u8 = 8;

/// Regions tracked (2×2 quads, or 4 rings)
pub const MAX_REGIONS: u8 = 4;

/// Full LED state of one device
#[derive(Debug, Clone)]
pub struct LedFrame {
    levels: [u8; MAX_LED_COUNT],
    dirty: u8,
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl LedFrame {
    pub const fn new() -> Self {
        Self {
            levels: [0; MAX_LED_COUNT],
            dirty: 0,
        }
    }

    /// Buffer index of a physical grid cell
    pub fn grid_index(x: u8, y: u8, columns: u8) -> usize {
        y as usize * columns as usize + x as usize
    }

    /// Quad holding a physical grid cell
    pub fn grid_region(x: u8, y: u8) -> u8 {
        (y / QUAD_SIZE) * 2 + x / QUAD_SIZE
    }

    /// Buffer index of one ring LED
    pub fn ring_index(ring: u8, led: u8) -> usize {
        ring as usize * RING_LEDS + led as usize
    }

    /// Level at `index`, or `None` past the end of the buffer
    pub fn level(&self, index: usize) -> Option<u8> {
        self.levels.get(index).copied()
    }

    /// Write one LED and mark its region dirty if the level changed
    ///
    /// Returns whether anything changed.
    pub fn set(&mut self, index: usize, region: u8, level: u8) -> bool {
        let Some(slot) = self.levels.get_mut(index) else {
            return false;
        };
        if *slot == level {
            return false;
        }
        *slot = level;
        self.dirty |= 1 << region;
        true
    }

    /// Write `level` over `range` and mark every region in `regions` dirty
    pub fn fill(&mut self, range: Range<usize>, level: u8, regions: u8) {
        let end = range.end.min(MAX_LED_COUNT);
        let start = range.start.min(end);
        self.levels[start..end].fill(level);
        self.mark_dirty(regions);
    }

    /// Mark regions dirty by bitmask
    pub fn mark_dirty(&mut self, regions: u8) {
        self.dirty |= regions;
    }

    /// Mark regions as transmitted by bitmask
    pub fn mark_clean(&mut self, regions: u8) {
        self.dirty &= !regions;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty != 0
    }

    pub fn is_region_dirty(&self, region: u8) -> bool {
        region < MAX_REGIONS && self.dirty & (1 << region) != 0
    }

    /// Bitmask of dirty regions
    pub fn dirty_regions(&self) -> u8 {
        self.dirty
    }

    /// All LEDs dark, nothing pending
    pub fn clear(&mut self) {
        self.levels = [0; MAX_LED_COUNT];
        self.dirty = 0;
    }

    /// The 64 levels of the quad whose top-left corner is `(qx, qy)`
    ///
    /// Cells outside a `columns` × `rows` grid read as dark.
    pub fn quad_levels(&self, qx: u8, qy: u8, columns: u8, rows: u8) -> [u8; QUAD_LEDS] {
        let mut out = [0u8; QUAD_LEDS];
        for dy in 0..QUAD_SIZE {
            for dx in 0..QUAD_SIZE {
                let (x, y) = (qx + dx, qy + dy);
                if x < columns && y < rows {
                    let level = self.levels[Self::grid_index(x, y, columns)];
                    out[(dy * QUAD_SIZE + dx) as usize] = level;
                }
            }
        }
        out
    }

    /// The 64 levels of one ring
    pub fn ring_levels(&self, ring: u8) -> [u8; RING_LEDS] {
        let mut out = [0u8; RING_LEDS];
        let start = Self::ring_index(ring, 0);
        if let Some(src) = self.levels.get(start..start + RING_LEDS) {
            out.copy_from_slice(src);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_marks_region() {
        let mut frame = LedFrame::new();
        assert!(!frame.is_dirty());

        let index = LedFrame::grid_index(9, 2, 16);
        assert!(frame.set(index, LedFrame::grid_region(9, 2), 7));
        assert_eq!(frame.level(index), Some(7));
        assert!(frame.is_region_dirty(1));
        assert!(!frame.is_region_dirty(0));
    }

    #[test]
    fn test_unchanged_set_stays_clean() {
        let mut frame = LedFrame::new();
        assert!(!frame.set(0, 0, 0));
        assert!(!frame.is_dirty());
    }

    #[test]
    fn test_mark_clean() {
        let mut frame = LedFrame::new();
        frame.mark_dirty(0b1010);
        frame.mark_clean(0b0010);
        assert_eq!(frame.dirty_regions(), 0b1000);
        frame.mark_clean(0b1000);
        assert!(!frame.is_dirty());
    }

    #[test]
    fn test_grid_regions() {
        assert_eq!(LedFrame::grid_region(0, 0), 0);
        assert_eq!(LedFrame::grid_region(8, 0), 1);
        assert_eq!(LedFrame::grid_region(0, 8), 2);
        assert_eq!(LedFrame::grid_region(15, 15), 3);
    }

    #[test]
    fn test_quad_levels_respects_bounds() {
        // 12 columns: the right quad is only half populated
        let mut frame = LedFrame::new();
        frame.fill(0..12 * 8, 5, 0b11);
        let right = frame.quad_levels(8, 0, 12, 8);

        assert_eq!(right[0], 5);
        assert_eq!(right[3], 5);
        assert_eq!(right[4], 0);
        assert_eq!(right[8 * 7 + 3], 5);
    }

    #[test]
    fn test_ring_levels() {
        let mut frame = LedFrame::new();
        frame.set(LedFrame::ring_index(2, 63), 2, 9);
        let ring = frame.ring_levels(2);
        assert_eq!(ring[63], 9);
        assert_eq!(frame.ring_levels(1), [0; RING_LEDS]);
        assert_eq!(frame.ring_levels(4), [0; RING_LEDS]);
    }

    #[test]
    fn test_fill_clamps_range() {
        let mut frame = LedFrame::new();
        frame.fill(250..400, 1, 0b1000);
        assert_eq!(frame.level(255), Some(1));
        assert_eq!(frame.level(249), Some(0));
    }

    #[test]
    fn test_clear() {
        let mut frame = LedFrame::new();
        frame.fill(0..MAX_LED_COUNT, 15, 0b1111);
        frame.clear();
        assert!(!frame.is_dirty());
        assert_eq!(frame.level(100), Some(0));
    }
}
