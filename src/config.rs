use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithm::SolvingAlgorithm;
use crate::layered::LayerByLayerSolver;
use crate::solver::TwoPhaseSolver;

/// Selects the solving strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "kociemba")]
    TwoPhase,
    #[serde(rename = "layer-by-layer")]
    LayerByLayer,
}

impl Algorithm {
    pub fn solver(self) -> Arc<dyn SolvingAlgorithm> {
        match self {
            Algorithm::TwoPhase => Arc::new(TwoPhaseSolver::default()),
            Algorithm::LayerByLayer => Arc::new(LayerByLayerSolver),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::TwoPhase => "kociemba",
            Algorithm::LayerByLayer => "layer-by-layer",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kociemba" | "two-phase" => Ok(Algorithm::TwoPhase),
            "layer-by-layer" | "lbl" => Ok(Algorithm::LayerByLayer),
            _ => Err(format!("unknown algorithm `{s}`")),
        }
    }
}

/// Limits and strategy of a solve.
///
/// `max_moves` caps two-phase solutions, `layer_by_layer_max_moves` caps layer-by-layer ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    pub max_moves: usize,
    pub layer_by_layer_max_moves: usize,
    pub timeout_ms: u64,
    pub algorithm: Algorithm,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_moves: 100,
            layer_by_layer_max_moves: 300,
            timeout_ms: 5000,
            algorithm: Algorithm::TwoPhase,
        }
    }
}

impl SolverConfig {
    /// Move cap for the selected algorithm.
    pub fn move_limit(&self) -> usize {
        match self.algorithm {
            Algorithm::TwoPhase => self.max_moves,
            Algorithm::LayerByLayer => self.layer_by_layer_max_moves,
        }
    }

    pub fn apply(&mut self, update: SolverConfigUpdate) {
        if let Some(max_moves) = update.max_moves {
            self.max_moves = max_moves;
        }
        if let Some(max_moves) = update.layer_by_layer_max_moves {
            self.layer_by_layer_max_moves = max_moves;
        }
        if let Some(timeout_ms) = update.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(algorithm) = update.algorithm {
            self.algorithm = algorithm;
        }
    }
}

/// Partial override of a [SolverConfig], unset fields keep their value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfigUpdate {
    pub max_moves: Option<usize>,
    pub layer_by_layer_max_moves: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub algorithm: Option<Algorithm>,
}
