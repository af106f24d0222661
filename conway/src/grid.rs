//! Toroidal cell grid and the Game of Life update rule.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::error::{Error, Result};

/// A `(row, col)` position. Signed so that patterns may name cells that fall
/// outside a smaller grid.
pub type Coord = (i32, i32);

/// Offsets of the 8 Moore neighbors.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Fixed-size grid of live/dead cells whose edges wrap around.
///
/// Cells are stored row-major. The dimensions never change after
/// [`Grid::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid. Both dimensions must be positive; dimensions
    /// are unsigned, so a zero row or column count is the only invalid input.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Sets every in-bounds coordinate alive and returns how many were applied.
    ///
    /// Coordinates outside `[0, rows) x [0, cols)` are skipped without error,
    /// so a pattern written for one grid size still loads on another.
    pub fn seed<'a, I>(&mut self, coords: I) -> usize
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut applied = 0;
        let mut ignored = 0;
        for &(row, col) in coords {
            match self.index_of(row, col) {
                Some(index) => {
                    self.cells[index] = true;
                    applied += 1;
                }
                None => ignored += 1,
            }
        }
        if ignored > 0 {
            debug!(
                "Ignored {} out-of-range seed cells on {}x{} grid",
                ignored, self.rows, self.cols
            );
        }
        applied
    }

    /// Whether the cell at `(row, col)` is alive. Indices wrap.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells[self.wrapped_index(row, col, 0, 0)]
    }

    /// Number of live cells among the 8 wrapped neighbors of `(row, col)`.
    ///
    /// On grids narrower than 3 cells, several offsets wrap onto the same cell
    /// (or onto the cell itself); each offset is still counted once.
    pub fn count_live_neighbors(&self, row: usize, col: usize) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&(dr, dc)| self.cells[self.wrapped_index(row, col, dr, dc)])
            .count() as u8
    }

    /// Computes the next generation. `self` is left untouched.
    pub fn advance(&self) -> Grid {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let alive = self.cells[row * self.cols + col];
                let next = match (alive, self.count_live_neighbors(row, col)) {
                    (true, 2) | (true, 3) => true, // Survival
                    (false, 3) => true,            // Birth
                    _ => false,                    // Death or stays dead
                };
                cells.push(next);
            }
        }
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Count live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Positions of all live cells in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(move |(i, _)| (i / self.cols, i % self.cols))
    }

    /// The grid as nested rows, for renderers that want a 2D array.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.cols).map(<[bool]>::to_vec).collect()
    }

    /// Hash of the cell states, used to spot repeated generations.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn index_of(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok().filter(|&r| r < self.rows)?;
        let col = usize::try_from(col).ok().filter(|&c| c < self.cols)?;
        Some(row * self.cols + col)
    }

    /// Index of `(row, col)` moved by at most one cell per axis, wrapping.
    fn wrapped_index(&self, row: usize, col: usize, dr: isize, dc: isize) -> usize {
        let row = wrap_step(row % self.rows, dr, self.rows);
        let col = wrap_step(col % self.cols, dc, self.cols);
        row * self.cols + col
    }
}

/// Moves `i` (already below `len`) by -1, 0 or +1 on a ring of `len` cells.
fn wrap_step(i: usize, delta: isize, len: usize) -> usize {
    match delta {
        -1 if i == 0 => len - 1,
        -1 => i - 1,
        1 if i + 1 == len => 0,
        1 => i + 1,
        _ => i,
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().map(|&alive| if alive { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_with(rows: usize, cols: usize, cells: &[Coord]) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        grid.seed(cells);
        grid
    }

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(60, 60).unwrap();
        assert_eq!(grid.rows(), 60);
        assert_eq!(grid.cols(), 60);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(Error::InvalidDimension { rows: 0, cols: 5 })
        ));
        assert!(matches!(
            Grid::new(5, 0),
            Err(Error::InvalidDimension { rows: 5, cols: 0 })
        ));
    }

    #[test]
    fn test_seed_ignores_out_of_range() {
        let mut grid = Grid::new(5, 5).unwrap();
        let applied = grid.seed(&[(-1, 5), (5, 5), (2, -3), (0, 5), (2, 2)]);
        assert_eq!(applied, 1);
        assert_eq!(grid.population(), 1);
        assert!(grid.is_alive(2, 2));
    }

    #[test]
    fn test_toroidal_wrapping() {
        let grid = grid_with(10, 8, &[(0, 0)]);
        assert_eq!(grid.count_live_neighbors(9, 7), 1);
        assert_eq!(grid.count_live_neighbors(9, 0), 1);
        assert_eq!(grid.count_live_neighbors(0, 7), 1);
        assert_eq!(grid.count_live_neighbors(1, 1), 1);
        assert_eq!(grid.count_live_neighbors(0, 0), 0);
        assert_eq!(grid.count_live_neighbors(5, 5), 0);
    }

    #[test]
    fn test_huge_indices_wrap_without_overflow() {
        // usize::MAX is 5 mod 10 and 7 mod 8.
        let grid = grid_with(10, 8, &[(5, 7), (6, 0)]);
        assert!(grid.is_alive(usize::MAX, usize::MAX));
        assert_eq!(grid.count_live_neighbors(usize::MAX, usize::MAX), 1);
        // (5, 0) sees (5, 7) across the column seam and (6, 0) below it.
        assert_eq!(grid.count_live_neighbors(usize::MAX, usize::MAX - 7), 2);
    }

    #[test]
    fn test_tiny_grids_have_eight_neighbor_slots() {
        let single = grid_with(1, 1, &[(0, 0)]);
        assert_eq!(single.count_live_neighbors(0, 0), 8);

        // On a 1x3 strip every row offset wraps back to row 0.
        let strip = grid_with(1, 3, &[(0, 1)]);
        assert_eq!(strip.count_live_neighbors(0, 0), 3);
        assert_eq!(strip.count_live_neighbors(0, 1), 2);
    }

    #[test]
    fn test_block_is_still_life() {
        let grid = grid_with(6, 6, &[(2, 2), (2, 3), (3, 2), (3, 3)]);
        assert_eq!(grid.advance(), grid);
    }

    #[test]
    fn test_blinker_has_period_two() {
        let grid = grid_with(9, 9, &[(4, 3), (4, 4), (4, 5)]);
        let next = grid.advance();
        assert_ne!(next, grid);
        let expected: Vec<_> = vec![(3, 4), (4, 4), (5, 4)];
        assert_eq!(next.live_cells().collect::<Vec<_>>(), expected);
        assert_eq!(next.advance(), grid);
    }

    #[test]
    fn test_birth_rule() {
        // (2, 2) is dead with the given number of live neighbors.
        let three = grid_with(6, 6, &[(1, 1), (1, 2), (1, 3)]);
        assert!(three.advance().is_alive(2, 2));

        let two = grid_with(6, 6, &[(1, 1), (1, 3)]);
        assert!(!two.advance().is_alive(2, 2));

        let four = grid_with(6, 6, &[(1, 1), (1, 3), (3, 1), (3, 3)]);
        assert!(!four.advance().is_alive(2, 2));
    }

    #[test]
    fn test_death_rule() {
        let neighbors: [Coord; 8] = [
            (1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3),
        ];
        for count in [0usize, 1, 4, 8] {
            let mut cells = vec![(2, 2)];
            cells.extend_from_slice(&neighbors[..count]);
            let grid = grid_with(7, 7, &cells);
            assert_eq!(grid.count_live_neighbors(2, 2) as usize, count);
            assert!(!grid.advance().is_alive(2, 2), "{count} neighbors should kill");
        }
        for count in [2usize, 3] {
            let mut cells = vec![(2, 2)];
            cells.extend_from_slice(&neighbors[..count]);
            let grid = grid_with(7, 7, &cells);
            assert!(grid.advance().is_alive(2, 2), "{count} neighbors should survive");
        }
    }

    #[test]
    fn test_display() {
        let grid = grid_with(2, 3, &[(0, 1), (1, 2)]);
        assert_eq!(grid.to_string(), ".#.\n..#\n");
        assert_eq!(
            grid.to_rows(),
            vec![vec![false, true, false], vec![false, false, true]]
        );
    }

    #[test]
    fn test_state_hash_tracks_cells() {
        let a = grid_with(5, 5, &[(1, 1)]);
        let b = grid_with(5, 5, &[(1, 1)]);
        let c = grid_with(5, 5, &[(1, 2)]);
        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), c.state_hash());
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1..12usize, 1..12usize).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(any::<bool>(), rows * cols)
                .prop_map(move |cells| Grid { rows, cols, cells })
        })
    }

    proptest! {
        #[test]
        fn test_neighbor_count_in_range(grid in arb_grid(), row in 0..12usize, col in 0..12usize) {
            let count = grid.count_live_neighbors(row, col);
            prop_assert!(count <= 8);
        }

        #[test]
        fn test_neighbor_count_excludes_self(grid in arb_grid(), row in 0..12usize, col in 0..12usize) {
            let (row, col) = (row % grid.rows(), col % grid.cols());
            let mut flipped = grid.clone();
            let index = row * grid.cols() + col;
            flipped.cells[index] = !flipped.cells[index];
            // Only grids of at least 3x3 keep the cell out of its own neighborhood.
            if grid.rows() >= 3 && grid.cols() >= 3 {
                prop_assert_eq!(
                    grid.count_live_neighbors(row, col),
                    flipped.count_live_neighbors(row, col)
                );
            }
        }

        #[test]
        fn test_advance_is_pure(grid in arb_grid()) {
            let before = grid.clone();
            let next = grid.advance();
            prop_assert_eq!(&grid, &before);
            prop_assert_eq!(next.rows(), grid.rows());
            prop_assert_eq!(next.cols(), grid.cols());
        }

        #[test]
        fn test_seed_out_of_range_is_noop(
            grid in arb_grid(),
            coords in prop::collection::vec((-20..40i32, -20..40i32), 0..16),
        ) {
            let outside: Vec<Coord> = coords
                .into_iter()
                .filter(|&(r, c)| r < 0 || c < 0 || r as usize >= grid.rows() || c as usize >= grid.cols())
                .collect();
            let mut seeded = grid.clone();
            prop_assert_eq!(seeded.seed(&outside), 0);
            prop_assert_eq!(seeded, grid);
        }
    }
}
