use crate::point::Side;

/// Unit-square segments for every `(case, flip)` pair
///
/// Each entry lists `(from, to)` sides; the segment runs from the crossing on
/// `from` to the crossing on `to`. With rows growing downwards the corners
/// that are at or above the level always lie on the left of the direction of
/// travel, so traced rings around above-level regions come out
/// counter-clockwise in an `(x, y=row)` frame.
///
/// Only the saddles (5 and 10) differ between the two columns. `flip` is set
/// when the cell mean is at or above the level: the two above corners are then
/// joined through the centre and the two below corners are cut off.
pub const CASE_TABLE: [[&[(Side, Side)]; 2]; 16] = {
    use Side::{Bottom as B, Left as L, Right as R, Top as T};
    [
        /* 0b0000 */ [&[], &[]],
        /* 0b0001 */ [&[(L, B)], &[(L, B)]],
        /* 0b0010 */ [&[(B, R)], &[(B, R)]],
        /* 0b0011 */ [&[(L, R)], &[(L, R)]],
        /* 0b0100 */ [&[(R, T)], &[(R, T)]],
        /* 0b0101 */ [&[(R, T), (L, B)], &[(L, T), (R, B)]],
        /* 0b0110 */ [&[(B, T)], &[(B, T)]],
        /* 0b0111 */ [&[(L, T)], &[(L, T)]],
        /* 0b1000 */ [&[(T, L)], &[(T, L)]],
        /* 0b1001 */ [&[(T, B)], &[(T, B)]],
        /* 0b1010 */ [&[(T, L), (B, R)], &[(T, R), (B, L)]],
        /* 0b1011 */ [&[(T, R)], &[(T, R)]],
        /* 0b1100 */ [&[(R, L)], &[(R, L)]],
        /* 0b1101 */ [&[(R, B)], &[(R, B)]],
        /* 0b1110 */ [&[(B, L)], &[(B, L)]],
        /* 0b1111 */ [&[], &[]],
    ]
};

/// A marching-squares cell classified against one level
///
/// Binary classification: a corner is inside when its value is at or above
/// the level. This results in 16 possible configurations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Padded-grid position of the top-left corner
    col: usize,
    row: usize,

    /// Binary classification value (0-15)
    /// Bit pattern: tl(8) | tr(4) | br(2) | bl(1)
    case: u8,

    /// Saddle resolution, only ever set for cases 5 and 10
    flip: bool,

    /// Corner scalar values
    tl: f64,
    tr: f64,
    br: f64,
    bl: f64,
}

impl Cell {
    /// Classify the cell whose top-left corner sits at padded `(col, row)`
    #[allow(clippy::too_many_arguments)]
    pub fn classify(
        col: usize,
        row: usize,
        tl: f64,
        tr: f64,
        br: f64,
        bl: f64,
        level: f64,
    ) -> Self {
        let mut case = 0u8;
        case |= if tl < level { 0 } else { 8 };
        case |= if tr < level { 0 } else { 4 };
        case |= if br < level { 0 } else { 2 };
        case |= if bl < level { 0 } else { 1 };

        let flip = matches!(case, 0b0101 | 0b1010) && 0.25 * (tl + tr + br + bl) >= level;

        Self {
            col,
            row,
            case,
            flip,
            tl,
            tr,
            br,
            bl,
        }
    }

    /// Get the binary classification value (0-15)
    pub fn case(&self) -> u8 {
        self.case
    }

    /// Whether a saddle was resolved by joining its above corners
    pub fn flip(&self) -> bool {
        self.flip
    }

    pub fn is_saddle(&self) -> bool {
        matches!(self.case, 0b0101 | 0b1010)
    }

    /// True for cases 0 and 15, which contribute no boundary
    pub fn is_uniform(&self) -> bool {
        self.case == 0 || self.case == 0b1111
    }

    /// Padded-grid position (column, row)
    pub fn position(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// Get corner values as (tl, tr, br, bl)
    pub fn corner_values(&self) -> (f64, f64, f64, f64) {
        (self.tl, self.tr, self.br, self.bl)
    }

    /// Oriented side pairs for this cell, straight from [`CASE_TABLE`]
    pub fn sides(&self) -> &'static [(Side, Side)] {
        CASE_TABLE[self.case as usize][self.flip as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit-square midpoint of a side, with y growing downwards
    fn midpoint(side: Side) -> (f64, f64) {
        match side {
            Side::Top => (0.5, 0.0),
            Side::Right => (1.0, 0.5),
            Side::Bottom => (0.5, 1.0),
            Side::Left => (0.0, 0.5),
        }
    }

    #[test]
    fn test_cell_classification_all_below() {
        let cell = Cell::classify(0, 0, 5.0, 5.0, 5.0, 5.0, 10.0);
        assert_eq!(cell.case(), 0);
        assert!(cell.is_uniform());
        assert!(cell.sides().is_empty());
    }

    #[test]
    fn test_cell_classification_all_above() {
        let cell = Cell::classify(0, 0, 15.0, 15.0, 15.0, 15.0, 10.0);
        assert_eq!(cell.case(), 15);
        assert!(cell.sides().is_empty());
    }

    #[test]
    fn test_cell_classification_mixed() {
        // tl=5, tr=15, br=15, bl=5 -> tl(0) tr(1) br(1) bl(0) = 0110
        let cell = Cell::classify(3, 4, 5.0, 15.0, 15.0, 5.0, 10.0);
        assert_eq!(cell.case(), 6);
        assert_eq!(cell.position(), (3, 4));
        assert_eq!(cell.corner_values(), (5.0, 15.0, 15.0, 5.0));
        assert_eq!(cell.sides(), &[(Side::Bottom, Side::Top)]);
    }

    #[test]
    fn test_corner_on_level_counts_as_above() {
        let cell = Cell::classify(0, 0, 10.0, 15.0, 15.0, 5.0, 10.0);
        assert_eq!(cell.case(), 14);
    }

    #[test]
    fn test_saddle_low_mean_separates() {
        // tr and bl above, mean 5.5 below 6
        let cell = Cell::classify(0, 0, 1.0, 10.0, 1.0, 10.0, 6.0);
        assert_eq!(cell.case(), 0b0101);
        assert!(cell.is_saddle());
        assert!(!cell.flip());
        assert_eq!(
            cell.sides(),
            &[(Side::Right, Side::Top), (Side::Left, Side::Bottom)]
        );
    }

    #[test]
    fn test_saddle_high_mean_joins() {
        // tl and br above, mean 5.5 at or above 5.5
        let cell = Cell::classify(0, 0, 10.0, 1.0, 10.0, 1.0, 5.5);
        assert_eq!(cell.case(), 0b1010);
        assert!(cell.flip());
        assert_eq!(
            cell.sides(),
            &[(Side::Top, Side::Right), (Side::Bottom, Side::Left)]
        );
    }

    #[test]
    fn test_flip_only_affects_saddles() {
        for case in 0..16usize {
            if case == 0b0101 || case == 0b1010 {
                assert_ne!(CASE_TABLE[case][0], CASE_TABLE[case][1]);
            } else {
                assert_eq!(CASE_TABLE[case][0], CASE_TABLE[case][1]);
            }
        }
    }

    #[test]
    fn test_table_keeps_inside_corners_on_the_left() {
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let bits = [8u8, 4, 2, 1];

        for case in 1..15u8 {
            for flip in 0..2 {
                for &(from, to) in CASE_TABLE[case as usize][flip] {
                    let (sx, sy) = midpoint(from);
                    let (ex, ey) = midpoint(to);
                    for (corner, bit) in corners.iter().zip(bits) {
                        // Only corners adjacent to the segment decide the side
                        let near = ((corner.0 - sx).abs() <= 0.5 && (corner.1 - sy).abs() <= 0.5)
                            || ((corner.0 - ex).abs() <= 0.5 && (corner.1 - ey).abs() <= 0.5);
                        if !near {
                            continue;
                        }
                        let cross = (ex - sx) * (corner.1 - sy) - (ey - sy) * (corner.0 - sx);
                        if case & bit != 0 {
                            assert!(
                                cross > 0.0,
                                "case {case:04b} flip {flip}: inside corner on the right"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_side_used_once_in_crossing_cells() {
        // Each side with differing corners carries exactly one endpoint
        for case in 1..15u8 {
            for flip in 0..2 {
                let mut used = Vec::new();
                for &(from, to) in CASE_TABLE[case as usize][flip] {
                    used.push(from);
                    used.push(to);
                }
                let mut dedup = used.clone();
                dedup.sort_by_key(|s| *s as u8);
                dedup.dedup();
                assert_eq!(used.len(), dedup.len(), "case {case:04b}");
            }
        }
    }
}
