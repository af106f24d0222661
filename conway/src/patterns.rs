//! Named starting patterns grouped by category.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::Coord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub cells: Vec<Coord>,
}

impl Pattern {
    pub fn new(name: impl Into<String>, cells: &[Coord]) -> Self {
        Self {
            name: name.into(),
            cells: cells.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub patterns: Vec<Pattern>,
}

/// Read-only table of patterns, handed to whatever builds a
/// [`SimulationRun`](crate::SimulationRun).
///
/// Coordinates in the built-in table are placed around the middle of a 60x60
/// grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCatalog {
    categories: Vec<Category>,
}

impl PatternCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            Category {
                name: "Gliders".into(),
                patterns: vec![
                    Pattern::new("Glider", &[(25, 26), (26, 27), (27, 25), (27, 26), (27, 27)]),
                    Pattern::new(
                        "Lightweight Spaceship (LWSS)",
                        &[
                            (25, 26), (26, 25), (26, 29), (27, 25), (28, 25),
                            (28, 28), (28, 29), (29, 25), (29, 29),
                        ],
                    ),
                ],
            },
            Category {
                name: "Oscillators".into(),
                patterns: vec![
                    Pattern::new("Blinker", &[(30, 29), (30, 30), (30, 31)]),
                    Pattern::new(
                        "Toad",
                        &[(25, 26), (25, 27), (25, 28), (26, 25), (26, 26), (26, 27)],
                    ),
                ],
            },
        ])
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find(&self, category: &str, name: &str) -> Option<&Pattern> {
        self.categories
            .iter()
            .filter(|c| c.name == category)
            .flat_map(|c| c.patterns.iter())
            .find(|p| p.name == name)
    }

    pub fn get(&self, category: &str, name: &str) -> Result<&Pattern> {
        self.find(category, name).ok_or_else(|| Error::UnknownPattern {
            category: category.to_string(),
            name: name.to_string(),
        })
    }

    /// Every pattern with its category name, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pattern)> + '_ {
        self.categories
            .iter()
            .flat_map(|c| c.patterns.iter().map(move |p| (c.name.as_str(), p)))
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
