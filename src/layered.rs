//! The beginner's layer-by-layer method.
//!
//! White is solved on U, yellow ends up on D. The white cross comes from a distance table,
//! every later phase from short trials over a handful of well known algorithms.
//!
//! The algorithms are written the usual way, with yellow up and the slot to work on at
//! front right. A z2 relabel moves them onto the physical cube, y relabels reach the other
//! three slots.
use std::fmt;

use crate::algorithm::{CancelToken, SolvingAlgorithm};
use crate::constants::{N_CROSS, N_MOVE};
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::facelet::{CubeState, Face};
use crate::moves::Move::*;
use crate::moves::{simplify_moves, Move, ALL_MOVES, MOVE_CUBES};

/// Solving stages in the order they are worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    WhiteCross,
    WhiteCorners,
    MiddleLayer,
    YellowCross,
    YellowFaceOriented,
    YellowCornersPositioned,
    YellowEdgesPositioned,
    Done,
}

pub const ALL_PHASES: [Phase; 7] = [
    Phase::WhiteCross,
    Phase::WhiteCorners,
    Phase::MiddleLayer,
    Phase::YellowCross,
    Phase::YellowFaceOriented,
    Phase::YellowCornersPositioned,
    Phase::YellowEdgesPositioned,
];

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::WhiteCross => "white cross",
            Phase::WhiteCorners => "white corners",
            Phase::MiddleLayer => "middle layer",
            Phase::YellowCross => "yellow cross",
            Phase::YellowFaceOriented => "yellow face",
            Phase::YellowCornersPositioned => "yellow corners",
            Phase::YellowEdgesPositioned => "yellow edges",
            Phase::Done => "done",
        };
        write!(f, "{name}")
    }
}

impl Phase {
    pub fn next(self) -> Phase {
        match self {
            Phase::WhiteCross => Phase::WhiteCorners,
            Phase::WhiteCorners => Phase::MiddleLayer,
            Phase::MiddleLayer => Phase::YellowCross,
            Phase::YellowCross => Phase::YellowFaceOriented,
            Phase::YellowFaceOriented => Phase::YellowCornersPositioned,
            Phase::YellowCornersPositioned => Phase::YellowEdgesPositioned,
            Phase::YellowEdgesPositioned | Phase::Done => Phase::Done,
        }
    }

    /// Independent sub-goals of the phase. Pieces of the first two layers are placed one at a time.
    fn goal_count(self) -> usize {
        match self {
            Phase::WhiteCorners | Phase::MiddleLayer => 4,
            Phase::Done => 0,
            _ => 1,
        }
    }

    fn goal(self, k: usize, cc: &CubieCube) -> bool {
        let edge_done = |i: usize| cc.ep[i] as usize == i && cc.eo[i] == 0;
        match self {
            Phase::WhiteCross => (0..4).all(edge_done),
            Phase::WhiteCorners => cc.cp[k] as usize == k && cc.co[k] == 0,
            Phase::MiddleLayer => edge_done(8 + k),
            Phase::YellowCross => cc.eo[4..8].iter().all(|&o| o == 0),
            Phase::YellowFaceOriented => cc.co[4..8].iter().all(|&o| o == 0),
            Phase::YellowCornersPositioned => (4..8).all(|i| cc.cp[i] as usize == i),
            Phase::YellowEdgesPositioned => cc.is_solved(),
            Phase::Done => true,
        }
    }

    fn goals_met(self, cc: &CubieCube) -> usize {
        (0..self.goal_count()).filter(|&k| self.goal(k, cc)).count()
    }

    /// The phase's own goals and those of all earlier phases hold.
    pub fn is_complete(self, cc: &CubieCube) -> bool {
        ALL_PHASES
            .iter()
            .take_while(|&&p| p <= self)
            .all(|&p| p.goals_met(cc) == p.goal_count())
    }

    /// First phase whose goals do not hold yet.
    pub fn current(cc: &CubieCube) -> Phase {
        ALL_PHASES
            .into_iter()
            .find(|p| !p.is_complete(cc))
            .unwrap_or(Phase::Done)
    }

    /// Trial depth in macros (algorithms or single turns).
    fn max_depth(self) -> usize {
        match self {
            Phase::WhiteCorners | Phase::MiddleLayer => 3,
            Phase::YellowFaceOriented => 5,
            _ => 4,
        }
    }
}

/// z2 relabel, index is the face in the yellow up frame.
const Z2: [Face; 6] = [
    Face::Down,
    Face::Left,
    Face::Front,
    Face::Up,
    Face::Right,
    Face::Back,
];
/// y relabel, moves an algorithm to the neighbouring slot.
const Y: [Face; 6] = [
    Face::Up,
    Face::Back,
    Face::Right,
    Face::Down,
    Face::Front,
    Face::Left,
];

/// Rename the faces of a sequence. Turning directions stay the same under whole cube rotations.
pub fn relabel(moves: &[Move], map: &[Face; 6]) -> Vec<Move> {
    moves
        .iter()
        .map(|m| Move::from_face_turns(map[m.face() as usize], m.quarter_turns()))
        .collect()
}

/// The four physical versions of an algorithm written in the yellow up frame.
fn variants(algorithm: &[Move]) -> Vec<Vec<Move>> {
    let mut rotated = algorithm.to_vec();
    let mut result = Vec::with_capacity(4);
    for _ in 0..4 {
        result.push(relabel(&rotated, &Z2));
        rotated = relabel(&rotated, &Y);
    }
    result
}

const SEXY: [Move; 4] = [R, U, R3, U3];
const INSERT_RIGHT: [Move; 8] = [U, R, U3, R3, U3, F3, U, F];
const INSERT_LEFT: [Move; 8] = [U3, L3, U, L, U, F, U3, F3];
const ORIENT_EDGES: [Move; 6] = [F, R, U, R3, U3, F3];
const SUNE: [Move; 7] = [R, U, R3, U, R, U2, R3];
const ANTI_SUNE: [Move; 7] = [R, U2, R3, U3, R, U3, R3];
const A_PERM_A: [Move; 9] = [R3, F, R3, B2, R, F3, R3, B2, R2];
const A_PERM_B: [Move; 9] = [R2, B2, R, F, R3, B2, R, F3, R];
const U_PERM_A: [Move; 11] = [R, U3, R, U, R, U, R, U3, R3, U3, R2];
const U_PERM_B: [Move; 11] = [R2, U, R, U, R3, U3, R3, U3, R3, U, R3];

/// One step of a trial: a single turn of the last layer or a whole algorithm.
#[derive(Debug, Clone)]
struct Macro {
    moves: Vec<Move>,
    cube: CubieCube,
    setup: bool,
}

impl Macro {
    fn new(moves: Vec<Move>, setup: bool) -> Self {
        let cube = CubieCube::default().apply_moves(&moves);
        Self { moves, cube, setup }
    }
}

fn macros(phase: Phase) -> Vec<Macro> {
    let mut result: Vec<Macro> = [D, D2, D3]
        .into_iter()
        .map(|m| Macro::new(vec![m], true))
        .collect();
    let algorithms: Vec<Vec<Move>> = match phase {
        Phase::WhiteCorners => (1..=5).map(|n| SEXY.repeat(n)).collect(),
        Phase::MiddleLayer => vec![INSERT_RIGHT.to_vec(), INSERT_LEFT.to_vec()],
        Phase::YellowCross => vec![ORIENT_EDGES.to_vec()],
        Phase::YellowFaceOriented => vec![SUNE.to_vec(), ANTI_SUNE.to_vec()],
        Phase::YellowCornersPositioned => vec![A_PERM_A.to_vec(), A_PERM_B.to_vec()],
        Phase::YellowEdgesPositioned => vec![U_PERM_A.to_vec(), U_PERM_B.to_vec()],
        Phase::WhiteCross | Phase::Done => Vec::new(),
    };
    for algorithm in algorithms {
        result.extend(variants(&algorithm).into_iter().map(|v| Macro::new(v, false)));
    }
    result
}

const UNVISITED: u8 = u8::MAX;

/// Position and orientation of each edge after each move, `EDGE_MOVE[m][2 * pos + ori]`.
fn edge_move_table() -> [[u8; 24]; N_MOVE] {
    let mut table = [[0; 24]; N_MOVE];
    for (m, cube) in MOVE_CUBES.iter().enumerate() {
        for i in 0..12 {
            let j = cube.ep[i] as usize;
            for o in 0..2 {
                table[m][2 * j + o] = (2 * i + (o + cube.eo[i] as usize) % 2) as u8;
            }
        }
    }
    table
}

fn cross_index(codes: [usize; 4]) -> usize {
    codes.iter().rev().fold(0, |acc, &c| 24 * acc + c)
}

fn cross_codes(idx: usize) -> [usize; 4] {
    let mut codes = [0; 4];
    let mut rest = idx;
    for code in codes.iter_mut() {
        *code = rest % 24;
        rest /= 24;
    }
    codes
}

fn cross_move(idx: usize, m: Move) -> usize {
    let row = &EDGE_MOVE[m as usize];
    cross_index(cross_codes(idx).map(|c| row[c] as usize))
}

/// Index into [CROSS_TABLE] for the UR, UF, UL and UB edges of a cube.
fn cross_state(cc: &CubieCube) -> usize {
    let mut codes = [0; 4];
    for (i, (&e, &o)) in cc.ep.iter().zip(cc.eo.iter()).enumerate() {
        let e = e as usize;
        if e < 4 {
            codes[e] = 2 * i + o as usize;
        }
    }
    cross_index(codes)
}

lazy_static! {
    static ref EDGE_MOVE: [[u8; 24]; N_MOVE] = edge_move_table();
    /// Moves needed to solve the white cross, by [cross_state].
    static ref CROSS_TABLE: Vec<u8> = {
        let mut table = vec![UNVISITED; N_CROSS];
        let solved = cross_index([0, 2, 4, 6]);
        table[solved] = 0;
        let mut frontier = vec![solved];
        let mut depth = 0;
        while !frontier.is_empty() {
            let mut upcoming = Vec::new();
            for &idx in &frontier {
                for m in ALL_MOVES {
                    let n = cross_move(idx, m);
                    if table[n] == UNVISITED {
                        table[n] = depth + 1;
                        upcoming.push(n);
                    }
                }
            }
            frontier = upcoming;
            depth += 1;
        }
        log::debug!("cross table built, depth {}", depth - 1);
        table
    };
}

/// Deterministic layer-by-layer solver, see the module documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerByLayerSolver;

impl LayerByLayerSolver {
    pub fn solve_cubie(&self, cc: CubieCube, cancel: &CancelToken) -> Result<Vec<Move>, Error> {
        let mut cube = cc;
        let mut moves = Vec::new();
        for phase in ALL_PHASES {
            let before = moves.len();
            if phase == Phase::WhiteCross {
                self.solve_cross(&mut cube, &mut moves, cancel)?;
            } else {
                self.solve_phase(phase, &mut cube, &mut moves, cancel)?;
            }
            log::debug!("{}: {} moves", phase, moves.len() - before);
        }
        Ok(simplify_moves(&moves))
    }

    fn solve_cross(
        &self,
        cube: &mut CubieCube,
        moves: &mut Vec<Move>,
        cancel: &CancelToken,
    ) -> Result<(), Error> {
        let mut idx = cross_state(cube);
        let mut dist = CROSS_TABLE[idx];
        if dist == UNVISITED {
            return Err(Error::InvalidCubieValue);
        }
        while dist > 0 {
            cancel.check()?;
            let (m, next) = ALL_MOVES
                .into_iter()
                .map(|m| (m, cross_move(idx, m)))
                .find(|&(_, n)| CROSS_TABLE[n] == dist - 1)
                .ok_or(Error::InvalidCubieValue)?;
            *cube = cube.apply_move(m);
            moves.push(m);
            idx = next;
            dist -= 1;
        }
        Ok(())
    }

    /// Work on `phase` until all its goals hold, one goal or more per trial.
    fn solve_phase(
        &self,
        phase: Phase,
        cube: &mut CubieCube,
        moves: &mut Vec<Move>,
        cancel: &CancelToken,
    ) -> Result<(), Error> {
        let alphabet = macros(phase);
        let previous = ALL_PHASES[phase as usize - 1];
        while !phase.is_complete(cube) {
            let met: Vec<bool> = (0..phase.goal_count())
                .map(|k| phase.goal(k, cube))
                .collect();
            let count = met.iter().filter(|&&b| b).count();
            let progress = |cc: &CubieCube| {
                previous.is_complete(cc)
                    && met.iter().enumerate().all(|(k, &was)| !was || phase.goal(k, cc))
                    && phase.goals_met(cc) > count
            };

            let mut path = Vec::new();
            let found = (1..=phase.max_depth()).find_map(|depth| {
                match trial(*cube, &alphabet, depth, &progress, &mut path, cancel) {
                    Ok(true) => Some(Ok(())),
                    Ok(false) => None,
                    Err(e) => Some(Err(e)),
                }
            });
            match found {
                Some(result) => result?,
                None => {
                    log::warn!("{}: no trial within {} steps", phase, phase.max_depth());
                    return Ok(());
                }
            }
            for &k in &path {
                let step: &Macro = &alphabet[k];
                cube.multiply(step.cube);
                moves.extend_from_slice(&step.moves);
            }
        }
        Ok(())
    }
}

/// Depth limited search over `alphabet`, the macro indices of a hit are left in `path`.
fn trial(
    cc: CubieCube,
    alphabet: &[Macro],
    depth: usize,
    goal: &dyn Fn(&CubieCube) -> bool,
    path: &mut Vec<usize>,
    cancel: &CancelToken,
) -> Result<bool, Error> {
    if goal(&cc) {
        return Ok(true);
    }
    if depth == 0 {
        return Ok(false);
    }
    cancel.check()?;
    for (k, step) in alphabet.iter().enumerate() {
        if let Some(&last) = path.last() {
            // two turns of the last layer in a row are a single turn
            if step.setup && alphabet[last].setup {
                continue;
            }
        }
        let mut next = cc;
        next.multiply(step.cube);
        path.push(k);
        if trial(next, alphabet, depth - 1, goal, path, cancel)? {
            return Ok(true);
        }
        path.pop();
    }
    Ok(false)
}

impl SolvingAlgorithm for LayerByLayerSolver {
    fn name(&self) -> &'static str {
        "layer-by-layer"
    }

    fn solve(&self, state: &CubeState, cancel: &CancelToken) -> Result<Vec<Move>, Error> {
        let cc = CubieCube::try_from(state)?;
        cc.verify()?;
        self.solve_cubie(cc, cancel)
    }

    fn prepare(&self) {
        lazy_static::initialize(&CROSS_TABLE);
    }
}
