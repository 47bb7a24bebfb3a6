use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use self::{Corner::*, Edge::*};
use crate::constants::*;
use crate::error::Error;
use crate::facelet::{Color, CubeState, Face, Faces, ALL_FACES, CENTER};
use crate::moves::{Move, MOVE_CUBES};

/// The names of the corner positions of the cube. Corner URF e.g. has an U(p), a R(ight) and a F(ront) facelet.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Corner {
    URF,
    UFL,
    ULB,
    UBR,
    DFR,
    DLF,
    DBL,
    DRB,
}

pub const ALL_CORNERS: [Corner; 8] = [URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB];

/// The names of the edge positions of the cube. Edge UR e.g. has an U(p) and R(ight) facelet.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Edge {
    UR,
    UF,
    UL,
    UB,
    DR,
    DF,
    DL,
    DB,
    FR,
    FL,
    BL,
    BR,
}

pub const ALL_EDGES: [Edge; 12] = [UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR];

/// Binomial coefficient n choose k, 0 when n < k.
pub fn c_nk(n: usize, k: usize) -> usize {
    if n < k {
        return 0;
    }
    let k = if k > n / 2 { n - k } else { k };
    let (mut s, mut i, mut j) = (1, n, 1);
    while i != n - k {
        s *= i;
        s /= j;
        i -= 1;
        j += 1;
    }
    s
}

/// Represent a cube on the cubie level.
///
/// `cp[i]` is the corner sitting at position `i`, `co[i]` its twist (0, 1 or 2), likewise for the edges.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct CubieCube {
    pub cp: [Corner; 8],
    pub co: [u8; 8],
    pub ep: [Edge; 12],
    pub eo: [u8; 12],
}

impl Default for CubieCube {
    fn default() -> Self {
        Self {
            cp: ALL_CORNERS,
            co: [0; 8],
            ep: ALL_EDGES,
            eo: [0; 12],
        }
    }
}

impl fmt::Display for CubieCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..8 {
            write!(f, "({:?},{})", self.cp[i], self.co[i])?;
        }
        writeln!(f)?;
        for i in 0..12 {
            write!(f, "({:?},{})", self.ep[i], self.eo[i])?;
        }
        Ok(())
    }
}

/// Identify the corner cubie sitting at corner position `i` of a complete facelet cube.
///
/// Returns `None` when the stickers do not belong to any corner (no U/D sticker or
/// stickers in mirrored order).
pub fn corner_at(faces: &Faces, i: usize) -> Option<(Corner, u8)> {
    let fac = CORNER_FACELET[i];
    let colors = fac.map(|id| faces[id].map(Color::home_face));
    let ori = (0..3).find(|&o| matches!(colors[o], Some(Face::Up) | Some(Face::Down)))?;
    let col1 = colors[(ori + 1) % 3]?;
    let col2 = colors[(ori + 2) % 3]?;
    let j = (0..8).find(|&j| CORNER_COLOR[j][1] == col1 && CORNER_COLOR[j][2] == col2)?;
    if colors[ori] != Some(CORNER_COLOR[j][0]) {
        return None;
    }
    Some((ALL_CORNERS[j], ori as u8))
}

/// Identify the edge cubie sitting at edge position `i` of a complete facelet cube.
pub fn edge_at(faces: &Faces, i: usize) -> Option<(Edge, u8)> {
    let [a, b] = EDGE_FACELET[i].map(|id| faces[id].map(Color::home_face));
    let (a, b) = (a?, b?);
    (0..12).find_map(|j| {
        if EDGE_COLOR[j] == [a, b] {
            Some((ALL_EDGES[j], 0))
        } else if EDGE_COLOR[j] == [b, a] {
            Some((ALL_EDGES[j], 1))
        } else {
            None
        }
    })
}

/// Lift a facelet cube to the cubie level.
///
/// Fails for incomplete cubes and for stickers that do not form real pieces; it does not
/// check solvability, see [CubieCube::verify].
impl TryFrom<&CubeState> for CubieCube {
    type Error = Error;

    fn try_from(state: &CubeState) -> Result<Self, Self::Error> {
        let mut cc = CubieCube::default();
        for i in 0..8 {
            let (corner, ori) = corner_at(&state.faces, i).ok_or(Error::InvalidCubieValue)?;
            cc.cp[i] = corner;
            cc.co[i] = ori;
        }
        for i in 0..12 {
            let (edge, ori) = edge_at(&state.faces, i).ok_or(Error::InvalidCubieValue)?;
            cc.ep[i] = edge;
            cc.eo[i] = ori;
        }
        Ok(cc)
    }
}

impl From<&CubieCube> for CubeState {
    fn from(cc: &CubieCube) -> Self {
        let mut faces = Faces([[None; 9]; 6]);
        for face in ALL_FACES {
            faces[face][CENTER] = Some(face.center_color());
        }
        for i in 0..8 {
            let j = cc.cp[i] as usize;
            let ori = cc.co[i] as usize;
            for k in 0..3 {
                faces[CORNER_FACELET[i][(k + ori) % 3]] = Some(CORNER_COLOR[j][k].center_color());
            }
        }
        for i in 0..12 {
            let j = cc.ep[i] as usize;
            let ori = cc.eo[i] as usize;
            for k in 0..2 {
                faces[EDGE_FACELET[i][(k + ori) % 2]] = Some(EDGE_COLOR[j][k].center_color());
            }
        }
        CubeState::from_faces(faces)
    }
}

impl CubieCube {
    /// Multiply this cubie cube with another cubie cube b, restricted to the corners.
    pub fn corner_multiply(&mut self, b: CubieCube) {
        let mut c_perm = [URF; 8];
        let mut c_ori = [0; 8];
        for c in 0..8 {
            let from = b.cp[c] as usize;
            c_perm[c] = self.cp[from];
            c_ori[c] = (self.co[from] + b.co[c]) % 3;
        }
        self.cp = c_perm;
        self.co = c_ori;
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the edges.
    pub fn edge_multiply(&mut self, b: CubieCube) {
        let mut e_perm = [UR; 12];
        let mut e_ori = [0; 12];
        for e in 0..12 {
            let from = b.ep[e] as usize;
            e_perm[e] = self.ep[from];
            e_ori[e] = (b.eo[e] + self.eo[from]) % 2;
        }
        self.ep = e_perm;
        self.eo = e_ori;
    }

    /// Multiply this cubie cube with another cubie cube b.
    pub fn multiply(&mut self, b: CubieCube) {
        self.corner_multiply(b);
        self.edge_multiply(b);
    }

    pub fn apply_move(self, m: Move) -> Self {
        let mut result = self;
        result.multiply(MOVE_CUBES[m as usize]);
        result
    }

    pub fn apply_moves(&self, moves: &[Move]) -> Self {
        moves.iter().fold(*self, |cc, &m| cc.apply_move(m))
    }

    pub fn multiply_moves(&mut self, moves: &[Move]) {
        for &m in moves {
            self.multiply(MOVE_CUBES[m as usize]);
        }
    }

    pub fn is_solved(&self) -> bool {
        *self == CubieCube::default()
    }

    /// Give the parity of the corner permutation.
    pub fn corner_parity(&self) -> u8 {
        let mut s = 0;
        for i in (1..8).rev() {
            for j in (0..i).rev() {
                if self.cp[j] > self.cp[i] {
                    s += 1;
                }
            }
        }
        s % 2
    }

    /// Give the parity of the edge permutation. A solvable cube has the same corner and edge parity.
    pub fn edge_parity(&self) -> u8 {
        let mut s = 0;
        for i in (1..12).rev() {
            for j in (0..i).rev() {
                if self.ep[j] > self.ep[i] {
                    s += 1;
                }
            }
        }
        s % 2
    }

    pub fn twist_sum(&self) -> u8 {
        self.co.iter().sum::<u8>() % 3
    }

    pub fn flip_sum(&self) -> u8 {
        self.eo.iter().sum::<u8>() % 2
    }

    /// Every corner and every edge cubie appears exactly once.
    pub fn has_unique_pieces(&self) -> bool {
        let mut corners = [0; 8];
        let mut edges = [0; 12];
        self.cp.iter().for_each(|&c| corners[c as usize] += 1);
        self.ep.iter().for_each(|&e| edges[e as usize] += 1);
        corners.iter().all(|&n| n == 1) && edges.iter().all(|&n| n == 1)
    }

    /// Check if cubiecube is valid.
    pub fn verify(&self) -> Result<(), Error> {
        if !self.has_unique_pieces()
            || self.flip_sum() != 0
            || self.twist_sum() != 0
            || self.edge_parity() != self.corner_parity()
        {
            return Err(Error::InvalidCubieValue);
        }
        Ok(())
    }

    pub fn is_solvable(&self) -> bool {
        self.verify().is_ok()
    }

    /// A uniformly random solvable cube.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cc = CubieCube::default();
        cc.cp.shuffle(rng);
        cc.ep.shuffle(rng);
        if cc.edge_parity() != cc.corner_parity() {
            cc.ep.swap(0, 1);
        }
        cc.set_twist(rng.gen_range(0..N_TWIST as u16));
        cc.set_flip(rng.gen_range(0..N_FLIP as u16));
        cc
    }

    // ### coordinates for phase 1 and phase 2 ###

    /// The twist of the 8 corners. 0 <= twist < 2187 in phase 1, twist = 0 in phase 2.
    pub fn get_twist(&self) -> u16 {
        self.co[..7].iter().fold(0, |acc, &o| 3 * acc + o as u16)
    }

    pub fn set_twist(&mut self, twist: u16) {
        let mut twist = twist;
        let mut twistparity = 0;
        for i in (0..7).rev() {
            self.co[i] = (twist % 3) as u8;
            twistparity += self.co[i];
            twist /= 3;
        }
        self.co[7] = (3 - twistparity % 3) % 3;
    }

    /// The flip of the 12 edges. 0 <= flip < 2048 in phase 1, flip = 0 in phase 2.
    pub fn get_flip(&self) -> u16 {
        self.eo[..11].iter().fold(0, |acc, &o| 2 * acc + o as u16)
    }

    pub fn set_flip(&mut self, flip: u16) {
        let mut flip = flip;
        let mut flipparity = 0;
        for i in (0..11).rev() {
            self.eo[i] = (flip % 2) as u8;
            flipparity += self.eo[i];
            flip /= 2;
        }
        self.eo[11] = (2 - flipparity % 2) % 2;
    }

    /// Location of the UD-slice edges FR, FL, BL and BR ignoring their permutation. 0 <= slice < 495.
    pub fn get_slice(&self) -> u16 {
        self.get_slice_sorted() / N_PERM_4 as u16
    }

    /// Permutation and location of the UD-slice edges FR, FL, BL and BR.
    ///
    /// 0 <= slice_sorted < 11880 in phase 1, 0 <= slice_sorted < 24 in phase 2, slice_sorted = 0 for solved cube.
    pub fn get_slice_sorted(&self) -> u16 {
        let mut a = 0;
        let mut x = 0;
        let mut edge4 = [0usize; 4];
        // First compute the index a < (12 choose 4) and the permutation array edge4.
        for j in (0..12).rev() {
            let e = self.ep[j] as usize;
            if e >= FR as usize {
                a += c_nk(11 - j, x + 1);
                edge4[3 - x] = e;
                x += 1;
            }
        }
        // Then compute the index b < 4! for the permutation in edge4
        let mut b = 0;
        for j in (1..4).rev() {
            let mut k = 0;
            while edge4[j] != j + FR as usize {
                edge4[..=j].rotate_left(1);
                k += 1;
            }
            b = (j + 1) * b + k;
        }
        (N_PERM_4 * a + b) as u16
    }

    pub fn set_slice_sorted(&mut self, idx: u16) {
        let mut slice_edge = [FR, FL, BL, BR];
        let other_edge = [UR, UF, UL, UB, DR, DF, DL, DB];
        let mut b = idx as usize % N_PERM_4;
        let mut a = (idx as usize / N_PERM_4) as isize;
        let mut placed: [Option<Edge>; 12] = [None; 12];

        for j in 1..4 {
            let mut k = b % (j + 1);
            b /= j + 1;
            while k > 0 {
                slice_edge[..=j].rotate_right(1);
                k -= 1;
            }
        }
        // set the slice edges
        let mut x = 4;
        for (j, slot) in placed.iter_mut().enumerate() {
            let c = c_nk(11 - j, x) as isize;
            if x > 0 && a - c >= 0 {
                *slot = Some(slice_edge[4 - x]);
                a -= c;
                x -= 1;
            }
        }
        // set the remaining edges UR..DB
        let mut others = other_edge.into_iter();
        for (j, slot) in placed.iter().enumerate() {
            self.ep[j] = match slot {
                Some(e) => *e,
                None => others.next().unwrap_or(UR),
            };
        }
    }

    /// Permutation of the 8 corners. 0 <= corners < 40320, corners = 0 for solved cube.
    pub fn get_corners(&self) -> u16 {
        let mut perm = self.cp;
        let mut b = 0;
        for j in (1..8).rev() {
            let mut k = 0;
            while perm[j] as usize != j {
                perm[..=j].rotate_left(1);
                k += 1;
            }
            b = (j + 1) * b + k;
        }
        b as u16
    }

    pub fn set_corners(&mut self, idx: u16) {
        let mut idx = idx as usize;
        self.cp = ALL_CORNERS;
        for j in 0..8 {
            let mut k = idx % (j + 1);
            idx /= j + 1;
            while k > 0 {
                self.cp[..=j].rotate_right(1);
                k -= 1;
            }
        }
    }

    /// Permutation of the 8 U and D edges.
    ///
    /// Only defined in phase 2 where the UD-slice edges stay in the slice.
    /// 0 <= ud_edges < 40320, ud_edges = 0 for solved cube.
    pub fn get_ud_edges(&self) -> u16 {
        let mut perm = [UR; 8];
        perm.copy_from_slice(&self.ep[..8]);
        if perm.iter().any(|&e| e as usize >= FR as usize) {
            return u16::MAX;
        }
        let mut b = 0;
        for j in (1..8).rev() {
            let mut k = 0;
            while perm[j] as usize != j {
                perm[..=j].rotate_left(1);
                k += 1;
            }
            b = (j + 1) * b + k;
        }
        b as u16
    }

    pub fn set_ud_edges(&mut self, idx: u16) {
        let mut idx = idx as usize;
        self.ep = ALL_EDGES;
        for j in 0..8 {
            let mut k = idx % (j + 1);
            idx /= j + 1;
            while k > 0 {
                self.ep[..=j].rotate_right(1);
                k -= 1;
            }
        }
    }
}

/// Six basic cube moves, described by permutations and changes in orientation.
pub fn basic_move_cubes() -> [CubieCube; 6] {
    use crate::moves::{B_MOVE, D_MOVE, F_MOVE, L_MOVE, R_MOVE, U_MOVE};
    [U_MOVE, R_MOVE, F_MOVE, D_MOVE, L_MOVE, B_MOVE]
}
