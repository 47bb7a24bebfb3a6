use std::{fmt, str::FromStr};

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use self::Move::*;
use crate::constants::*;
use crate::cubie::{self, Corner::*, CubieCube, Edge::*};
use crate::error::Error;
use crate::facelet::{Face, ALL_FACES};

/// Layer moves, Up, Right, Front, Down, Left, Back.
///
/// $ clockwise, $2 double, $3 counter-clockwise.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Move {
    U, U2, U3,
    R, R2, R3,
    F, F2, F3,
    D, D2, D3,
    L, L2, L3,
    B, B2, B3,
}

#[rustfmt::skip]
pub const ALL_MOVES: [Move; 18] = [
    U, U2, U3, R, R2, R3, F, F2, F3, D, D2, D3, L, L2, L3, B, B2, B3,
];

/// Moves that keep a cube inside the subgroup <U, D, R2, F2, L2, B2>.
pub const PHASE2_MOVES: [Move; 10] = [U, U2, U3, D, D2, D3, R2, F2, L2, B2];

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quarter_turns() {
            1 => write!(f, "{}", self.face()),
            2 => write!(f, "{}2", self.face()),
            _ => write!(f, "{}'", self.face()),
        }
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .and_then(Face::from_letter)
            .ok_or_else(|| Error::InvalidScramble(s.to_owned()))?;
        let turns = match chars.as_str() {
            "" => 1,
            "2" => 2,
            "'" | "3" => 3,
            _ => return Err(Error::InvalidScramble(s.to_owned())),
        };
        Ok(Move::from_face_turns(face, turns))
    }
}

impl From<Move> for String {
    fn from(m: Move) -> Self {
        m.to_string()
    }
}

impl TryFrom<String> for Move {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[rustfmt::skip]
impl Move {
    pub fn face(self) -> Face {
        match self {
            U | U2 | U3 => Face::Up,
            R | R2 | R3 => Face::Right,
            F | F2 | F3 => Face::Front,
            D | D2 | D3 => Face::Down,
            L | L2 | L3 => Face::Left,
            B | B2 | B3 => Face::Back,
        }
    }

    /// Clockwise quarter turns: 1, 2 or 3.
    pub fn quarter_turns(self) -> u8 {
        self as u8 % 3 + 1
    }

    /// `turns` is taken modulo 4 and must not be a multiple of it.
    pub fn from_face_turns(face: Face, turns: u8) -> Self {
        ALL_MOVES[3 * face as usize + (turns as usize + 3) % 4]
    }

    pub fn is_same_layer(&self, other: Move) -> bool {
        self.face() == other.face()
    }

    pub fn get_inverse(self) -> Self {
        match self {
            U => U3,
            U3 => U,
            D => D3,
            D3 => D,
            R => R3,
            R3 => R,
            L => L3,
            L3 => L,
            F => F3,
            F3 => F,
            B => B3,
            B3 => B,
            _ => self,
        }
    }

    pub fn details(self) -> &'static MoveDetails {
        &MOVE_DETAILS[self as usize]
    }
}

/// Inverse of a whole sequence.
pub fn invert_moves(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.get_inverse()).collect()
}

/// Merge adjacent turns of the same face, dropping turns that cancel out.
pub fn simplify_moves(moves: &[Move]) -> Vec<Move> {
    let mut out: Vec<Move> = Vec::with_capacity(moves.len());
    for &m in moves {
        match out.last() {
            Some(&last) if last.is_same_layer(m) => {
                out.pop();
                let turns = (last.quarter_turns() + m.quarter_turns()) % 4;
                if turns != 0 {
                    out.push(Move::from_face_turns(m.face(), turns));
                }
            }
            _ => out.push(m),
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Clockwise,
    Counterclockwise,
}

/// What a move does, in words and numbers. Half turns are recorded as clockwise.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MoveDetails {
    pub notation: Move,
    pub face: Face,
    pub direction: Direction,
    pub degrees: u16,
    pub description: &'static str,
}

const fn details(
    notation: Move,
    face: Face,
    direction: Direction,
    degrees: u16,
    description: &'static str,
) -> MoveDetails {
    MoveDetails {
        notation,
        face,
        direction,
        degrees,
        description,
    }
}

/// Indexed by `Move as usize`.
#[rustfmt::skip]
pub const MOVE_DETAILS: [MoveDetails; 18] = {
    use Direction::*;
    use Face::*;
    [
        details(U, Up, Clockwise, 90, "Rotate top face clockwise 90°"),
        details(U2, Up, Clockwise, 180, "Rotate top face 180°"),
        details(U3, Up, Counterclockwise, 90, "Rotate top face counter-clockwise 90°"),
        details(R, Right, Clockwise, 90, "Rotate right face clockwise 90°"),
        details(R2, Right, Clockwise, 180, "Rotate right face 180°"),
        details(R3, Right, Counterclockwise, 90, "Rotate right face counter-clockwise 90°"),
        details(F, Front, Clockwise, 90, "Rotate front face clockwise 90°"),
        details(F2, Front, Clockwise, 180, "Rotate front face 180°"),
        details(F3, Front, Counterclockwise, 90, "Rotate front face counter-clockwise 90°"),
        details(D, Down, Clockwise, 90, "Rotate bottom face clockwise 90°"),
        details(D2, Down, Clockwise, 180, "Rotate bottom face 180°"),
        details(D3, Down, Counterclockwise, 90, "Rotate bottom face counter-clockwise 90°"),
        details(L, Left, Clockwise, 90, "Rotate left face clockwise 90°"),
        details(L2, Left, Clockwise, 180, "Rotate left face 180°"),
        details(L3, Left, Counterclockwise, 90, "Rotate left face counter-clockwise 90°"),
        details(B, Back, Clockwise, 90, "Rotate back face clockwise 90°"),
        details(B2, Back, Clockwise, 180, "Rotate back face 180°"),
        details(B3, Back, Counterclockwise, 90, "Rotate back face counter-clockwise 90°"),
    ]
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// U_MOVE
pub const U_MOVE: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// R_MOVE
pub const R_MOVE: CubieCube = CubieCube {
    cp: [DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR], //permutation of the corners
    co: [2, 0, 0, 1, 1, 0, 0, 2],                 //changes of the orientations of the corners
    ep: [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR], //permutation of the edges
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],     //changes of the orientations of the edges
};

/// F_MOVE
pub const F_MOVE: CubieCube = CubieCube {
    cp: [UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB],
    co: [1, 2, 0, 0, 2, 1, 0, 0],
    ep: [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR],
    eo: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
};

/// D_MOVE
pub const D_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// L_MOVE
pub const L_MOVE: CubieCube = CubieCube {
    cp: [URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB],
    co: [0, 1, 2, 0, 0, 2, 1, 0],
    ep: [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// B_MOVE
pub const B_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL],
    co: [0, 0, 1, 2, 0, 0, 2, 1],
    ep: [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB],
    eo: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
};

lazy_static! {
    /// One cubie cube per move, indexed by `Move as usize`.
    pub static ref MOVE_CUBES: [CubieCube; 18] = {
        let bmc = cubie::basic_move_cubes();
        let mut cubes = [CubieCube::default(); 18];
        for (face, basic) in bmc.iter().enumerate() {
            let mut a = CubieCube::default();
            for k in 0..3 {
                a.multiply(*basic);
                cubes[3 * face + k] = a;
            }
        }
        cubes
    };
}

/// Coordinate move tables, `table[N_MOVE * coord + move]` is the coordinate after the move.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct MoveTables {
    pub twist_move: Vec<u16>,
    pub flip_move: Vec<u16>,
    pub slice_sorted_move: Vec<u16>,
    pub corners_move: Vec<u16>,
    pub ud_edges_move: Vec<u16>,
}

impl MoveTables {
    pub fn new() -> Self {
        Self {
            twist_move: move_twist(),
            flip_move: move_flip(),
            slice_sorted_move: move_slice_sorted(),
            corners_move: move_corners(),
            ud_edges_move: move_ud_edges(),
        }
    }
}

impl Default for MoveTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared loop of all move tables: set the coordinate, apply each face three times and read it back.
///
/// The fourth application of a face restores the cube. `phase2_only` skips quarter turns of
/// R, F, L and B, whose results leave the phase 2 subgroup.
fn build_move_table(
    size: usize,
    set: impl Fn(&mut CubieCube, u16),
    get: impl Fn(&CubieCube) -> u16,
    phase2_only: bool,
) -> Vec<u16> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let mut table = vec![0; size * N_MOVE];
    for i in 0..size {
        set(&mut a, i as u16);
        for (j, basic) in bmc.iter().enumerate() {
            let face = ALL_FACES[j];
            for k in 0..3 {
                a.multiply(*basic);
                if phase2_only
                    && matches!(face, Face::Right | Face::Front | Face::Left | Face::Back)
                    && k != 1
                {
                    continue;
                }
                table[N_MOVE * i + 3 * j + k] = get(&a);
            }
            a.multiply(*basic);
        }
    }
    table
}

/// Move table for the twists of the corners.
///
/// The twist coordinate describes the 3^7 = 2187 possible orientations of the 8 corners
pub fn move_twist() -> Vec<u16> {
    build_move_table(N_TWIST, CubieCube::set_twist, CubieCube::get_twist, false)
}

/// Move table for the flip of the edges.
///
/// The flip coordinate describes the 2^11 = 2048 possible orientations of the 12 edges
pub fn move_flip() -> Vec<u16> {
    build_move_table(N_FLIP, CubieCube::set_flip, CubieCube::get_flip, false)
}

/// Move table for the four UD-slice edges FR, FL, BL and BR.
///
/// For phase 1 only slice_sorted / 24 matters, the remainder gives the permutation of
/// the slice edges at the beginning of phase 2 for free.
pub fn move_slice_sorted() -> Vec<u16> {
    build_move_table(
        N_SLICE_SORTED,
        CubieCube::set_slice_sorted,
        CubieCube::get_slice_sorted,
        false,
    )
}

/// Move table for the corners coordinate, 8! = 40320 permutations of the corners.
pub fn move_corners() -> Vec<u16> {
    build_move_table(N_CORNERS, CubieCube::set_corners, CubieCube::get_corners, false)
}

/// Move table for the permutation of the edges UR, UF, UL, UB, DR, DF, DL and DB in phase 2.
///
/// Entries for quarter turns of R, F, L and B are undefined and stay 0.
pub fn move_ud_edges() -> Vec<u16> {
    build_move_table(
        N_UD_EDGES,
        CubieCube::set_ud_edges,
        CubieCube::get_ud_edges,
        true,
    )
}

#[cfg(test)]
mod test {
    use crate::moves::*;

    #[test]
    fn test_notation() {
        assert_eq!(U3.to_string(), "U'");
        assert_eq!(B2.to_string(), "B2");
        assert_eq!(L.to_string(), "L");
        assert_eq!("R'".parse::<Move>().unwrap(), R3);
        assert_eq!("R3".parse::<Move>().unwrap(), R3);
        assert_eq!("F2".parse::<Move>().unwrap(), F2);
        assert!(matches!("X".parse::<Move>(), Err(Error::InvalidScramble(_))));
        assert!(matches!("U''".parse::<Move>(), Err(Error::InvalidScramble(_))));
        for m in ALL_MOVES {
            assert_eq!(m.to_string().parse::<Move>().unwrap(), m);
        }
    }

    #[test]
    fn test_serde_as_notation() {
        assert_eq!(serde_json::to_string(&D3).unwrap(), "\"D'\"");
        assert_eq!(serde_json::from_str::<Move>("\"L2\"").unwrap(), L2);
    }

    #[test]
    fn test_inverse() {
        for m in ALL_MOVES {
            assert_eq!(m.get_inverse().get_inverse(), m);
            assert_eq!(m.face(), m.get_inverse().face());
            assert_eq!((m.quarter_turns() + m.get_inverse().quarter_turns()) % 4, 0);
        }
        assert_eq!(invert_moves(&[R, U, F2]), vec![F2, U3, R3]);
    }

    #[test]
    fn test_details() {
        let d = U3.details();
        assert_eq!(d.notation, U3);
        assert_eq!(d.face, Face::Up);
        assert_eq!(d.direction, Direction::Counterclockwise);
        assert_eq!(d.degrees, 90);
        assert_eq!(R2.details().degrees, 180);
        assert_eq!(R2.details().direction, Direction::Clockwise);
        assert_eq!(D.details().description, "Rotate bottom face clockwise 90°");
        for (i, m) in ALL_MOVES.iter().enumerate() {
            assert_eq!(MOVE_DETAILS[i].notation, *m);
            assert_eq!(MOVE_DETAILS[i].face, m.face());
        }
    }

    #[test]
    fn test_simplify() {
        assert_eq!(simplify_moves(&[U, U]), vec![U2]);
        assert_eq!(simplify_moves(&[U, D, D3, U3]), vec![]);
        assert_eq!(simplify_moves(&[R, U2, U, F]), vec![R, U3, F]);
        assert_eq!(simplify_moves(&[U2, U2, R]), vec![R]);
    }

    #[test]
    fn test_move_cubes() {
        assert_eq!(MOVE_CUBES[U as usize], U_MOVE);
        let mut twice = R_MOVE;
        twice.multiply(R_MOVE);
        assert_eq!(MOVE_CUBES[R2 as usize], twice);
    }

    #[test]
    fn test_move_twist() {
        let move_twist = move_twist();
        assert_eq!(move_twist.len(), N_TWIST * N_MOVE);
        // U and D keep the twist
        assert_eq!(move_twist[U as usize], 0);
        assert_eq!(move_twist[D3 as usize], 0);
        assert_ne!(move_twist[R as usize], 0);
        assert_eq!(move_twist[R2 as usize], 0);
    }

    #[test]
    fn test_move_slice_sorted() {
        let move_slice = move_slice_sorted();
        assert_eq!(move_slice.len(), N_SLICE_SORTED * N_MOVE);
        for m in PHASE2_MOVES {
            assert!((move_slice[m as usize] as usize) < N_PERM_4);
        }
        assert!(move_slice[R as usize] as usize >= N_PERM_4);
    }

    #[test]
    fn test_move_tables_agree_with_cubies() {
        let mv = MoveTables::new();
        let cc = CubieCube::default().apply_moves(&[R, U, F3, D2, L, B3]);
        for m in ALL_MOVES {
            let next = cc.apply_move(m);
            assert_eq!(mv.twist_move[N_MOVE * cc.get_twist() as usize + m as usize], next.get_twist());
            assert_eq!(mv.flip_move[N_MOVE * cc.get_flip() as usize + m as usize], next.get_flip());
            assert_eq!(
                mv.slice_sorted_move[N_MOVE * cc.get_slice_sorted() as usize + m as usize],
                next.get_slice_sorted()
            );
            assert_eq!(mv.corners_move[N_MOVE * cc.get_corners() as usize + m as usize], next.get_corners());
        }
        let h = CubieCube::default().apply_moves(&[U, R2, D3, F2, L2, U2]);
        for m in PHASE2_MOVES {
            assert_eq!(
                mv.ud_edges_move[N_MOVE * h.get_ud_edges() as usize + m as usize],
                h.apply_move(m).get_ud_edges()
            );
        }
    }
}
