use std::fmt;

use crate::constants::*;
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::moves::{Move, MoveTables};

/// Marks a ud_edges coordinate outside phase 2.
pub const INVALID_UD_EDGES: u16 = u16::MAX;

/// Represent a cube on the coordinate level.
///
/// In phase 1 a state is uniquely determined by the three coordinates flip, twist and slice = slice_sorted / 24.
///
/// In phase 2 a state is uniquely determined by the three coordinates corners, ud_edges and slice_sorted % 24.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CoordCube {
    pub twist: u16,        // twist of corners
    pub flip: u16,         // flip of edges
    pub slice_sorted: u16, // Position of FR, FL, BL, BR edges. Valid in phase 1 (<11880) and phase 2 (<24)
    pub corners: u16,      // corner permutation. Valid in phase1 and phase2
    pub ud_edges: u16,     // permutation of the ud-edges. Valid only in phase 2
}

impl Default for CoordCube {
    fn default() -> Self {
        Self {
            twist: 0,
            flip: 0,
            slice_sorted: 0,
            corners: 0,
            ud_edges: 0,
        }
    }
}

impl fmt::Display for CoordCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(twist: {}, flip: {}, slice: {}, E-edges: {}, Corners: {}, UD-Edges: {})",
            self.twist,
            self.flip,
            self.slice_sorted / N_PERM_4 as u16,
            self.slice_sorted,
            self.corners,
            self.ud_edges
        )
    }
}

impl TryFrom<&CubieCube> for CoordCube {
    type Error = Error;

    fn try_from(cc: &CubieCube) -> Result<Self, Self::Error> {
        cc.verify()?;
        let slice_sorted = cc.get_slice_sorted();
        let ud_edges = if (slice_sorted as usize) < N_PERM_4 {
            // phase 2 cube
            cc.get_ud_edges()
        } else {
            INVALID_UD_EDGES
        };
        Ok(Self {
            twist: cc.get_twist(),
            flip: cc.get_flip(),
            slice_sorted,
            corners: cc.get_corners(),
            ud_edges,
        })
    }
}

impl CoordCube {
    pub fn slice(&self) -> usize {
        self.slice_sorted as usize / N_PERM_4
    }

    /// Phase 1 is done when the cube is in the subgroup <U, D, R2, F2, L2, B2>.
    pub fn in_phase2(&self) -> bool {
        self.twist == 0 && self.flip == 0 && (self.slice_sorted as usize) < N_PERM_4
    }

    /// Update phase 1 coordinates when move is applied. ud_edges becomes undefined.
    pub fn phase1_move(&mut self, m: Move, mv: &MoveTables) {
        let m = m as usize;
        self.twist = mv.twist_move[N_MOVE * self.twist as usize + m];
        self.flip = mv.flip_move[N_MOVE * self.flip as usize + m];
        self.slice_sorted = mv.slice_sorted_move[N_MOVE * self.slice_sorted as usize + m];
        self.corners = mv.corners_move[N_MOVE * self.corners as usize + m];
        self.ud_edges = INVALID_UD_EDGES;
    }

    /// Update phase 2 coordinates when move is applied. `m` must be a phase 2 move.
    pub fn phase2_move(&mut self, m: Move, mv: &MoveTables) {
        let m = m as usize;
        self.slice_sorted = mv.slice_sorted_move[N_MOVE * self.slice_sorted as usize + m];
        self.corners = mv.corners_move[N_MOVE * self.corners as usize + m];
        self.ud_edges = mv.ud_edges_move[N_MOVE * self.ud_edges as usize + m];
    }
}
