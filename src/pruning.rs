use bincode::{Decode, Encode};

use crate::constants::*;
use crate::moves::{Move, MoveTables, ALL_MOVES, PHASE2_MOVES};

const UNVISITED: u8 = u8::MAX;

/// The pruning tables cut the search tree during the search.
///
/// Each entry is the exact number of moves needed to solve the projection of the cube onto
/// two coordinates, so the maximum of a phase's two entries is a lower bound for the phase.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct PruningTables {
    /// index `N_TWIST * slice + twist`
    pub slice_twist: Vec<u8>,
    /// index `N_FLIP * slice + flip`
    pub slice_flip: Vec<u8>,
    /// index `N_PERM_4 * corners + slice_sorted`, phase 2 only
    pub corners_slice: Vec<u8>,
    /// index `N_PERM_4 * ud_edges + slice_sorted`, phase 2 only
    pub ud_edges_slice: Vec<u8>,
}

/// Breadth-first search from the solved index 0 over `size` states.
fn breadth_first(size: usize, moves: &[Move], next: impl Fn(usize, Move) -> usize) -> Vec<u8> {
    let mut table = vec![UNVISITED; size];
    table[0] = 0;
    let mut frontier = vec![0];
    let mut depth = 0;
    while !frontier.is_empty() {
        let mut upcoming = Vec::new();
        for &idx in &frontier {
            for &m in moves {
                let n = next(idx, m);
                if table[n] == UNVISITED {
                    table[n] = depth + 1;
                    upcoming.push(n);
                }
            }
        }
        frontier = upcoming;
        depth += 1;
    }
    log::debug!("pruning table of {size} entries, depth {}", depth - 1);
    table
}

impl PruningTables {
    pub fn new(mv: &MoveTables) -> Self {
        let slice_move = |slice: usize, m: Move| {
            mv.slice_sorted_move[N_MOVE * slice * N_PERM_4 + m as usize] as usize / N_PERM_4
        };
        let slice_twist = breadth_first(N_SLICE * N_TWIST, &ALL_MOVES, |idx, m| {
            let (slice, twist) = (idx / N_TWIST, idx % N_TWIST);
            N_TWIST * slice_move(slice, m) + mv.twist_move[N_MOVE * twist + m as usize] as usize
        });
        let slice_flip = breadth_first(N_SLICE * N_FLIP, &ALL_MOVES, |idx, m| {
            let (slice, flip) = (idx / N_FLIP, idx % N_FLIP);
            N_FLIP * slice_move(slice, m) + mv.flip_move[N_MOVE * flip + m as usize] as usize
        });
        let corners_slice = breadth_first(N_CORNERS * N_PERM_4, &PHASE2_MOVES, |idx, m| {
            let (corners, slice) = (idx / N_PERM_4, idx % N_PERM_4);
            N_PERM_4 * mv.corners_move[N_MOVE * corners + m as usize] as usize
                + mv.slice_sorted_move[N_MOVE * slice + m as usize] as usize
        });
        let ud_edges_slice = breadth_first(N_UD_EDGES * N_PERM_4, &PHASE2_MOVES, |idx, m| {
            let (ud_edges, slice) = (idx / N_PERM_4, idx % N_PERM_4);
            N_PERM_4 * mv.ud_edges_move[N_MOVE * ud_edges + m as usize] as usize
                + mv.slice_sorted_move[N_MOVE * slice + m as usize] as usize
        });
        Self {
            slice_twist,
            slice_flip,
            corners_slice,
            ud_edges_slice,
        }
    }

    /// Lower bound for the phase 1 moves still needed.
    pub fn phase1_depth(&self, twist: u16, flip: u16, slice: usize) -> u8 {
        self.slice_twist[N_TWIST * slice + twist as usize]
            .max(self.slice_flip[N_FLIP * slice + flip as usize])
    }

    /// Lower bound for the phase 2 moves still needed.
    pub fn phase2_depth(&self, corners: u16, ud_edges: u16, slice_sorted: u16) -> u8 {
        self.corners_slice[N_PERM_4 * corners as usize + slice_sorted as usize]
            .max(self.ud_edges_slice[N_PERM_4 * ud_edges as usize + slice_sorted as usize])
    }
}
