use crate::facelet::Face::{self, *};
use crate::facelet::FaceletId;

pub const N_MOVE: usize = 18; // number of possible face moves

pub const N_TWIST: usize = 2187; // 3^7 possible corner orientations in phase 1
pub const N_FLIP: usize = 2048; // 2^11 possible edge orientations in phase 1
pub const N_SLICE: usize = 495; // 12 choose 4 possible positions of FR, FL, BL, BR edges in phase 1
pub const N_SLICE_SORTED: usize = 11880; // 12!/8! permutations of FR, FL, BL, BR edges in phase 1
pub const N_PERM_4: usize = 24; // 4! permutations of FR, FL, BL, BR edges in phase 2
pub const N_CORNERS: usize = 40320; // 8! corner permutations in phase 2
pub const N_UD_EDGES: usize = 40320; // 8! permutations of the edges in the U and D face in phase 2

pub const N_CROSS: usize = 331776; // 24^4 placements of the four U edges

pub const MAX_PHASE2_DEPTH: usize = 12;

const fn id(face: Face, position: usize) -> FaceletId {
    FaceletId::new(face, position)
}

/// The facelets of each corner position, U/D sticker first, then clockwise.
///
/// Order URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB.
#[rustfmt::skip]
pub const CORNER_FACELET: [[FaceletId; 3]; 8] = [
    [id(Up, 8), id(Right, 0), id(Front, 2)],
    [id(Up, 6), id(Front, 0), id(Left, 2)],
    [id(Up, 0), id(Left, 0), id(Back, 2)],
    [id(Up, 2), id(Back, 0), id(Right, 2)],
    [id(Down, 2), id(Front, 8), id(Right, 6)],
    [id(Down, 0), id(Left, 8), id(Front, 6)],
    [id(Down, 6), id(Back, 8), id(Left, 6)],
    [id(Down, 8), id(Right, 8), id(Back, 6)],
];

/// The facelets of each edge position.
///
/// Order UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR.
#[rustfmt::skip]
pub const EDGE_FACELET: [[FaceletId; 2]; 12] = [
    [id(Up, 5), id(Right, 1)],
    [id(Up, 7), id(Front, 1)],
    [id(Up, 3), id(Left, 1)],
    [id(Up, 1), id(Back, 1)],
    [id(Down, 5), id(Right, 7)],
    [id(Down, 1), id(Front, 7)],
    [id(Down, 3), id(Left, 7)],
    [id(Down, 7), id(Back, 7)],
    [id(Front, 5), id(Right, 3)],
    [id(Front, 3), id(Left, 5)],
    [id(Back, 5), id(Left, 3)],
    [id(Back, 3), id(Right, 5)],
];

/// The faces each corner cubie belongs to, in the order of [CORNER_FACELET].
#[rustfmt::skip]
pub const CORNER_COLOR: [[Face; 3]; 8] = [
    [Up, Right, Front], [Up, Front, Left], [Up, Left, Back], [Up, Back, Right],
    [Down, Front, Right], [Down, Left, Front], [Down, Back, Left], [Down, Right, Back],
];

/// The faces each edge cubie belongs to, in the order of [EDGE_FACELET].
#[rustfmt::skip]
pub const EDGE_COLOR: [[Face; 2]; 12] = [
    [Up, Right], [Up, Front], [Up, Left], [Up, Back],
    [Down, Right], [Down, Front], [Down, Left], [Down, Back],
    [Front, Right], [Front, Left], [Back, Left], [Back, Right],
];

/// Clockwise quarter turn of a face's own stickers: `new[i] = old[CLOCKWISE_SOURCE[i]]`.
pub const CLOCKWISE_SOURCE: [usize; 9] = [6, 3, 0, 7, 4, 1, 8, 5, 2];
pub const COUNTER_CLOCKWISE_SOURCE: [usize; 9] = [2, 5, 8, 1, 4, 7, 0, 3, 6];

/// Three stickers of a neighbouring face touched by a turn.
#[derive(Debug, Clone, Copy)]
pub struct Strip {
    pub face: Face,
    pub positions: [usize; 3],
}

const fn strip(face: Face, positions: [usize; 3]) -> Strip {
    Strip { face, positions }
}

/// For each face (U, R, F, D, L, B order) the four strips that a clockwise turn
/// carries from strip k to strip k + 1.
#[rustfmt::skip]
pub const ADJACENT_STRIPS: [[Strip; 4]; 6] = [
    // U
    [strip(Front, [0, 1, 2]), strip(Left, [0, 1, 2]), strip(Back, [0, 1, 2]), strip(Right, [0, 1, 2])],
    // R
    [strip(Front, [2, 5, 8]), strip(Up, [2, 5, 8]), strip(Back, [6, 3, 0]), strip(Down, [2, 5, 8])],
    // F
    [strip(Up, [6, 7, 8]), strip(Right, [0, 3, 6]), strip(Down, [2, 1, 0]), strip(Left, [8, 5, 2])],
    // D
    [strip(Front, [6, 7, 8]), strip(Right, [6, 7, 8]), strip(Back, [6, 7, 8]), strip(Left, [6, 7, 8])],
    // L
    [strip(Front, [0, 3, 6]), strip(Down, [0, 3, 6]), strip(Back, [8, 5, 2]), strip(Up, [0, 3, 6])],
    // B
    [strip(Up, [2, 1, 0]), strip(Left, [0, 3, 6]), strip(Down, [6, 7, 8]), strip(Right, [8, 5, 2])],
];
