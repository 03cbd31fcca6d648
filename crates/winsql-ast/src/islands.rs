//! Island (consecutive run) detection requests

use serde::{Deserialize, Serialize};

/// What makes two neighbouring rows part of the same island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Contiguity {
    /// Consecutive rows (in window order) sharing the same value
    EqualValue,
    /// Integer values each one greater than the previous distinct value
    IntegerSuccessor,
    /// Dates (or timestamps, by calendar day) each one day after the previous
    DaySuccessor,
}

/// Shape of the island stage's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IslandOutput {
    /// Every input row, annotated with its group id and run length
    #[default]
    PerRow,
    /// One row per island
    Groups,
}

fn default_group_id_column() -> String {
    "island_id".to_string()
}

fn default_run_length_column() -> String {
    "run_length".to_string()
}

/// Island detection over one column, per partition of the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandSpec {
    pub column: String,
    pub contiguity: Contiguity,
    #[serde(default)]
    pub output: IslandOutput,
    /// Islands shorter than this are dropped
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default = "default_group_id_column")]
    pub group_id_column: String,
    #[serde(default = "default_run_length_column")]
    pub run_length_column: String,
}

impl IslandSpec {
    pub fn new(column: impl Into<String>, contiguity: Contiguity) -> Self {
        IslandSpec {
            column: column.into(),
            contiguity,
            output: IslandOutput::PerRow,
            min_length: None,
            group_id_column: default_group_id_column(),
            run_length_column: default_run_length_column(),
        }
    }

    pub fn groups(mut self) -> Self {
        self.output = IslandOutput::Groups;
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn group_id_column(mut self, name: impl Into<String>) -> Self {
        self.group_id_column = name.into();
        self
    }

    pub fn run_length_column(mut self, name: impl Into<String>) -> Self {
        self.run_length_column = name.into();
        self
    }
}
