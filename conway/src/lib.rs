//! Conway's Game of Life on a fixed-size toroidal grid.
//!
//! The engine ([`Grid`]) is a pure, synchronous B3/S23 automaton. A
//! [`SimulationRun`] seeds a grid from a [`Pattern`] and counts generations,
//! and a [`Driver`] advances one run on a timer for whatever renders it.

pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod run;

pub use config::AppConfig;
pub use driver::{Driver, DriverConfig, Frame, Scheduler};
pub use error::{Error, Result};
pub use grid::{Coord, Grid};
pub use patterns::{Category, Pattern, PatternCatalog};
pub use run::SimulationRun;
