use crate::executor;
use crate::facelet::{CubeState, ALL_FACES, CENTER};
use crate::moves::Move;

pub fn apply_move(state: &CubeState, m: Move) -> CubeState {
    executor::apply_move(state, m)
}

pub fn apply_moves(state: &CubeState, moves: &[Move]) -> CubeState {
    executor::apply_moves(state, moves)
}

/// All states visited by a move sequence: element `i` is the state after the first `i + 1` moves.
pub fn generate_intermediate_states(initial: &CubeState, moves: &[Move]) -> Vec<CubeState> {
    let mut states = Vec::with_capacity(moves.len());
    let mut current = initial.clone();
    for &m in moves {
        current = executor::apply_move(&current, m);
        states.push(current.clone());
    }
    states
}

/// Every face shows its center color on all nine stickers.
pub fn is_solved(state: &CubeState) -> bool {
    ALL_FACES.iter().all(|&face| {
        let stickers = &state.faces[face];
        stickers[CENTER].is_some() && stickers.iter().all(|&c| c == stickers[CENTER])
    })
}

pub fn verify_solution(initial: &CubeState, moves: &[Move]) -> bool {
    let last = apply_moves(initial, moves);
    let solved = is_solved(&last);
    if !solved {
        log::debug!(
            "{} moves leave the cube unsolved: {}",
            moves.len(),
            crate::bridge::describe(&last)
        );
    }
    solved
}
