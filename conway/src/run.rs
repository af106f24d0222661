//! One seeded simulation and its generation counter.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::driver::Frame;
use crate::error::Result;
use crate::grid::{Coord, Grid};
use crate::patterns::Pattern;

/// How many past generations are remembered for cycle detection.
const HISTORY_LEN: usize = 10;

/// A grid seeded from a pattern, advanced one generation per [`step`].
///
/// The run owns its grid exclusively; [`advance`](Grid::advance) never
/// mutates its input, so grids handed out through [`frame`] stay valid after
/// later steps.
///
/// [`step`]: SimulationRun::step
/// [`frame`]: SimulationRun::frame
#[derive(Debug, Clone)]
pub struct SimulationRun {
    title: String,
    grid: Arc<Grid>,
    generation: u64,
    history: VecDeque<u64>,
    cycle_detected: bool,
}

impl SimulationRun {
    pub fn new(title: impl Into<String>, rows: usize, cols: usize, cells: &[Coord]) -> Result<Self> {
        let title = title.into();
        let mut grid = Grid::new(rows, cols)?;
        let applied = grid.seed(cells);
        info!("Created run '{}' on {}x{} grid with {} live cells", title, rows, cols, applied);

        let mut history = VecDeque::with_capacity(HISTORY_LEN);
        history.push_back(grid.state_hash());
        Ok(Self {
            title,
            grid: Arc::new(grid),
            generation: 0,
            history,
            cycle_detected: false,
        })
    }

    pub fn from_pattern(pattern: &Pattern, rows: usize, cols: usize) -> Result<Self> {
        Self::new(pattern.name.clone(), rows, cols, &pattern.cells)
    }

    /// Advance one generation and return the new grid.
    pub fn step(&mut self) -> &Grid {
        self.grid = Arc::new(self.grid.advance());
        self.generation += 1;
        trace!("'{}' generation {}: {} alive", self.title, self.generation, self.grid.population());

        let hash = self.grid.state_hash();
        let repeated = self.history.contains(&hash);
        if repeated && !self.cycle_detected {
            debug!("'{}' entered a cycle at generation {}", self.title, self.generation);
        }
        self.cycle_detected = repeated;
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(hash);
        &self.grid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the current generation repeats one of the previous ten, i.e.
    /// the pattern has settled into a still life or a short oscillator.
    pub fn cycle_detected(&self) -> bool {
        self.cycle_detected
    }

    /// Snapshot of the current generation for a renderer.
    pub fn frame(&self) -> Frame {
        Frame {
            generation: self.generation,
            grid: Arc::clone(&self.grid),
            cycle_detected: self.cycle_detected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternCatalog;

    fn builtin_run(category: &str, name: &str) -> SimulationRun {
        let catalog = PatternCatalog::builtin();
        SimulationRun::from_pattern(catalog.get(category, name).unwrap(), 60, 60).unwrap()
    }

    #[test]
    fn test_new_run() {
        let run = builtin_run("Gliders", "Glider");
        assert_eq!(run.title(), "Glider");
        assert_eq!(run.generation(), 0);
        assert_eq!(run.grid().population(), 5);
        assert!(!run.cycle_detected());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(SimulationRun::new("empty", 0, 60, &[]).is_err());
    }

    #[test]
    fn test_glider_translates() {
        let mut run = builtin_run("Gliders", "Glider");
        let start: Vec<_> = run.grid().live_cells().collect();
        for _ in 0..4 {
            run.step();
        }
        let shifted: Vec<_> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
        assert_eq!(run.grid().live_cells().collect::<Vec<_>>(), shifted);
        assert_eq!(run.generation(), 4);
        assert!(!run.cycle_detected());
    }

    #[test]
    fn test_glider_wraps_around_edges() {
        // A glider moves one cell diagonally every 4 generations, so after
        // 4 * 60 generations it is back where it started on a 60x60 torus.
        let mut run = builtin_run("Gliders", "Glider");
        let start = run.grid().clone();
        for _ in 0..240 {
            run.step();
        }
        assert_eq!(run.grid(), &start);
    }

    #[test]
    fn test_oscillators_cycle() {
        for name in ["Blinker", "Toad"] {
            let mut run = builtin_run("Oscillators", name);
            let start = run.grid().clone();
            run.step();
            assert!(!run.cycle_detected(), "{name} generation 1");
            assert_ne!(run.grid(), &start);
            run.step();
            assert!(run.cycle_detected(), "{name} generation 2");
            assert_eq!(run.grid(), &start);
        }
    }

    #[test]
    fn test_lwss_entry_evolves() {
        // The catalog's "LWSS" cells are not the canonical 4x5 ship; they grow
        // into a 14-cell cluster first.
        let mut run = builtin_run("Gliders", "Lightweight Spaceship (LWSS)");
        assert_eq!(run.grid().population(), 9);
        run.step();
        assert_eq!(run.grid().population(), 14);
        assert_eq!(run.generation(), 1);
    }

    #[test]
    fn test_frame_outlives_step() {
        let mut run = builtin_run("Oscillators", "Blinker");
        let frame = run.frame();
        run.step();
        assert_eq!(frame.generation, 0);
        assert!(frame.grid.is_alive(30, 29));
        assert!(!run.grid().is_alive(30, 29));
    }
}
