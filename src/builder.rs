use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::facelet::{CubeState, Face};
use crate::moves::{Direction, Move};
use crate::simulator;

/// Difficulty label derived from the number of moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Easy,
    Medium,
    Hard,
}

impl Complexity {
    pub fn from_moves(total_moves: usize) -> Self {
        match total_moves {
            0..=20 => Complexity::Easy,
            21..=50 => Complexity::Medium,
            _ => Complexity::Hard,
        }
    }
}

/// One move of a solution together with the state it leads to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyIncrement {
    /// 1-based
    pub step_number: usize,
    pub notation: Move,
    pub face: Face,
    pub direction: Direction,
    pub degrees: u16,
    pub cube_state_after: CubeState,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionMetadata {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub version: String,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub initial_state: CubeState,
    pub increments: Vec<AssemblyIncrement>,
    pub total_moves: usize,
    pub algorithm_used: String,
    pub calculation_time_ms: f64,
    pub is_solved: bool,
    pub metadata: SolutionMetadata,
}

impl Solution {
    pub fn moves(&self) -> Vec<Move> {
        self.increments.iter().map(|inc| inc.notation).collect()
    }

    /// The state after the last increment, or the initial state for an empty solution.
    pub fn final_state(&self) -> &CubeState {
        self.increments
            .last()
            .map_or(&self.initial_state, |inc| &inc.cube_state_after)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Turn a move list into a [Solution], recording the state after every move.
pub fn build_solution(
    initial: &CubeState,
    moves: &[Move],
    algorithm_used: &str,
    calculation_time_ms: f64,
) -> Solution {
    let states = simulator::generate_intermediate_states(initial, moves);
    let increments: Vec<AssemblyIncrement> = moves
        .iter()
        .zip(states)
        .enumerate()
        .map(|(i, (&m, state))| {
            let details = m.details();
            AssemblyIncrement {
                step_number: i + 1,
                notation: m,
                face: details.face,
                direction: details.direction,
                degrees: details.degrees,
                cube_state_after: state,
                description: details.description.to_owned(),
            }
        })
        .collect();
    let is_solved = match increments.last() {
        Some(last) => simulator::is_solved(&last.cube_state_after),
        None => simulator::is_solved(initial),
    };
    Solution {
        initial_state: initial.clone(),
        total_moves: increments.len(),
        increments,
        algorithm_used: algorithm_used.to_owned(),
        calculation_time_ms,
        is_solved,
        metadata: SolutionMetadata {
            timestamp: now_ms(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            complexity: Complexity::from_moves(moves.len()),
        },
    }
}
