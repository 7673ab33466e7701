//=========================================================================
// Collision Mask
//=========================================================================
//
// Bit-per-cell occupancy bitmap used for precise overlap tests.
//
// Layout: row-major, each row padded to whole 64-bit words.
//
//=========================================================================

//=== Mask ================================================================

/// Occupancy bitmap of a collider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Creates an empty `width` x `height` mask.
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Creates a fully set mask.
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        mask.fill();
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sets every cell.
    pub fn fill(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set(x, y, true);
            }
        }
    }

    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|w| *w = 0);
    }

    /// Out-of-range coordinates read as unset.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (word, bit) = self.index(x, y);
        self.bits[word] & (1 << bit) != 0
    }

    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.index(x, y);
        if value {
            self.bits[word] |= 1 << bit;
        } else {
            self.bits[word] &= !(1 << bit);
        }
    }

    /// Number of set cells.
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// First cell (in this mask's coordinates) set in both masks, with
    /// `other` placed at `offset` relative to this mask's origin.
    pub fn overlap(&self, other: &Mask, (dx, dy): (i32, i32)) -> Option<(u32, u32)> {
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (self.width as i32).min(dx + other.width as i32);
        let y_end = (self.height as i32).min(dy + other.height as i32);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                let (sx, sy) = (x as u32, y as u32);
                let (ox, oy) = ((x - dx) as u32, (y - dy) as u32);
                if self.get(sx, sy) && other.get(ox, oy) {
                    return Some((sx, sy));
                }
            }
        }

        None
    }

    /// True when at least one cell is set in both masks.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }

    //--- Internal Helpers -------------------------------------------------

    fn index(&self, x: u32, y: u32) -> (usize, u32) {
        let word = y as usize * self.words_per_row + (x / 64) as usize;
        (word, x % 64)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_mask_counts_every_cell() {
        let mask = Mask::filled(70, 3);
        assert_eq!(mask.count(), 210);
        assert!(mask.get(69, 2));
        assert!(!mask.get(70, 2));
    }

    #[test]
    fn overlapping_filled_masks() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(10, 10);

        assert_eq!(a.overlap(&b, (5, 5)), Some((5, 5)));
        assert_eq!(a.overlap(&b, (-9, -9)), Some((0, 0)));
        assert!(a.overlaps(&b, (9, 0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(10, 10);

        assert!(!a.overlaps(&b, (10, 0)));
        assert!(!a.overlaps(&b, (0, -10)));
    }

    #[test]
    fn sparse_masks_need_a_shared_cell() {
        let mut a = Mask::new(4, 4);
        let mut b = Mask::new(4, 4);
        a.set(0, 0, true);
        b.set(3, 3, true);

        // bounding boxes overlap but the set cells do not
        assert!(!a.overlaps(&b, (1, 1)));
        // b's (3,3) lands on a's (0,0)
        assert!(a.overlaps(&b, (-3, -3)));
    }

    #[test]
    fn clear_unsets_all() {
        let mut mask = Mask::filled(3, 3);
        mask.clear();
        assert_eq!(mask.count(), 0);
    }
}
