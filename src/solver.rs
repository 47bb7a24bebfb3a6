use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::algorithm::{CancelToken, SolvingAlgorithm};
use crate::bridge;
use crate::constants::MAX_PHASE2_DEPTH;
use crate::coord::{CoordCube, INVALID_UD_EDGES};
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::facelet::CubeState;
use crate::moves::{Move, MoveTables, ALL_MOVES, PHASE2_MOVES};
use crate::pruning::PruningTables;
use crate::{decode_table, write_table};

/// Directory for cached tables. Unset means the tables are built in memory on first use.
pub const TABLES_DIR_ENV: &str = "CUBE_ASSEMBLY_TABLES";

/// All data tables.
///
/// * `mv`: [MoveTables]
/// * `pr`: [PruningTables]
pub struct SolverTables {
    pub mv: MoveTables,
    pub pr: PruningTables,
}

impl SolverTables {
    fn new() -> Self {
        match std::env::var_os(TABLES_DIR_ENV) {
            Some(dir) => Self::load_or_build(Path::new(&dir)).unwrap_or_else(|e| {
                log::warn!("cannot use table cache {:?}: {}", dir, e);
                Self::build()
            }),
            None => Self::build(),
        }
    }

    pub fn build() -> Self {
        let start = Instant::now();
        let mv = MoveTables::new();
        let pr = PruningTables::new(&mv);
        log::debug!("two-phase tables built in {:?}", start.elapsed());
        Self { mv, pr }
    }

    /// Read the tables from `dir`, creating and writing them when missing.
    pub fn load_or_build(dir: &Path) -> Result<Self, Error> {
        let mv_path: PathBuf = dir.join("move_tables");
        let pr_path: PathBuf = dir.join("pruning_tables");
        if let (Ok(mv_bytes), Ok(pr_bytes)) = (std::fs::read(&mv_path), std::fs::read(&pr_path)) {
            log::debug!("loading two-phase tables from {}", dir.display());
            return Ok(Self {
                mv: decode_table(&mv_bytes)?,
                pr: decode_table(&pr_bytes)?,
            });
        }
        let tables = Self::build();
        std::fs::create_dir_all(dir)?;
        write_table(&mv_path, &tables.mv)?;
        write_table(&pr_path, &tables.pr)?;
        Ok(tables)
    }
}

lazy_static! {
    static ref SOLVER_TABLES: SolverTables = SolverTables::new();
}

pub fn solver_tables() -> &'static SolverTables {
    &SOLVER_TABLES
}

/// Solution result:
/// * solution: a Move vector.
/// * solve_time: time to get solution (not including table construction).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SolveResult {
    pub solution: Vec<Move>,
    pub solve_time: Duration,
}

/// Kociemba's two-phase algorithm.
///
/// Phase 1 brings the cube into the subgroup <U, D, R2, F2, L2, B2>, phase 2 solves it
/// with those moves only. The search keeps trying longer phase 1 maneuvers with shorter
/// phase 2 completions.
///
/// * `target_length`: the search stops as soon as a solution of at most this length is found.
/// * `max_length`: no solution longer than this is ever returned.
/// * `improve_for`: once a solution exists, the search gives up improving it after this long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPhaseSolver {
    pub target_length: usize,
    pub max_length: usize,
    pub improve_for: Duration,
}

impl Default for TwoPhaseSolver {
    fn default() -> Self {
        Self {
            target_length: 22,
            max_length: 30,
            improve_for: Duration::from_millis(500),
        }
    }
}

impl TwoPhaseSolver {
    /// Solve a cube given as facelet string, see [crate::bridge].
    pub fn solve_facelets(&self, facelets: &str, cancel: &CancelToken) -> Result<Vec<Move>, Error> {
        let state = bridge::facelet_string_to_state(facelets)?;
        let cc = CubieCube::try_from(&state)?;
        self.solve_cubie(cc, cancel)
    }

    pub fn solve_cubie(&self, cc: CubieCube, cancel: &CancelToken) -> Result<Vec<Move>, Error> {
        cc.verify()?;
        Search {
            tables: solver_tables(),
            cube: cc,
            sofar_phase1: Vec::new(),
            sofar_phase2: Vec::new(),
            best: None,
            target_length: self.target_length,
            max_length: self.max_length,
            improve_for: self.improve_for,
            start: Instant::now(),
            cancel,
            done: false,
        }
        .run()
    }
}

impl SolvingAlgorithm for TwoPhaseSolver {
    fn name(&self) -> &'static str {
        "kociemba"
    }

    fn solve(&self, state: &CubeState, cancel: &CancelToken) -> Result<Vec<Move>, Error> {
        let facelets = bridge::state_to_facelet_string(state)?;
        self.solve_facelets(&facelets, cancel)
    }

    fn prepare(&self) {
        lazy_static::initialize(&SOLVER_TABLES);
    }
}

/// Solve a cube defined by its cube definition string.
///
/// # Parameters
/// * `cubestring`: The format of the string is given in [crate::bridge].
/// * `max_length`: The function will return if a maneuver of length <= max_length has been found
/// * `timeout`: Seconds spent improving once a first solution has been found.
///
/// # Examples
/// ```rust
/// use cube_assembly::solver::solve;
///
/// let result = solve(
///     "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF",
///     22,
///     1.0,
/// ).unwrap();
/// assert!(result.solution.len() <= 30);
/// ```
pub fn solve(cubestring: &str, max_length: usize, timeout: f32) -> Result<SolveResult, Error> {
    lazy_static::initialize(&SOLVER_TABLES);
    let solver = TwoPhaseSolver {
        target_length: max_length,
        improve_for: Duration::from_secs_f32(timeout),
        ..TwoPhaseSolver::default()
    };
    let start = Instant::now();
    let solution = solver.solve_facelets(cubestring, &CancelToken::new())?;
    Ok(SolveResult {
        solution,
        solve_time: start.elapsed(),
    })
}

/// Successive moves on the same face, or on opposite faces in the non-canonical order.
fn redundant(last: Move, m: Move) -> bool {
    let diff = last as i8 / 3 - m as i8 / 3;
    diff == 0 || diff == 3
}

/// One run of the two-phase search on a single cube.
struct Search<'a> {
    tables: &'a SolverTables,
    cube: CubieCube,
    sofar_phase1: Vec<Move>,
    sofar_phase2: Vec<Move>,
    best: Option<Vec<Move>>,
    target_length: usize,
    max_length: usize,
    improve_for: Duration,
    start: Instant,
    cancel: &'a CancelToken,
    done: bool,
}

impl<'a> Search<'a> {
    fn run(mut self) -> Result<Vec<Move>, Error> {
        let co = CoordCube::try_from(&self.cube)?;
        log::trace!("two-phase start {}", co);
        let dist = self.tables.pr.phase1_depth(co.twist, co.flip, co.slice()) as usize;
        for togo1 in dist..=self.max_length {
            // iterative deepening, solution has at least dist moves
            self.sofar_phase1.clear();
            self.search(co, dist, togo1)?;
            if self.done {
                break;
            }
            if let Some(best) = &self.best {
                if best.len() <= togo1 + 1 {
                    break;
                }
            }
        }
        let elapsed = self.start.elapsed();
        match self.best {
            Some(solution) => {
                log::debug!("two-phase: {} moves in {:?}", solution.len(), elapsed);
                Ok(solution)
            }
            None => Err(Error::AlgorithmError {
                message: format!("no solution within {} moves", self.max_length),
                cause: None,
            }),
        }
    }

    fn search(&mut self, co: CoordCube, dist: usize, togo_phase1: usize) -> Result<(), Error> {
        self.cancel.check()?;
        if togo_phase1 == 0 {
            // phase 1 solved
            if self.best.is_some() && self.start.elapsed() > self.improve_for {
                self.done = true;
                return Ok(());
            }
            return self.start_phase2(co);
        }

        let tables = self.tables;
        for m in ALL_MOVES {
            // dist = 0 means that we are already in the subgroup H. If there are less than 5 moves left
            // this forces all remaining moves to be phase 2 moves. So we can forbid these at the end of phase 1
            // and generate these moves in phase 2.
            if dist == 0 && togo_phase1 < 5 && PHASE2_MOVES.contains(&m) {
                continue;
            }
            if let Some(&last) = self.sofar_phase1.last() {
                if redundant(last, m) {
                    continue;
                }
            }

            let mut next = co;
            next.phase1_move(m, &tables.mv);
            let dist_new = tables.pr.phase1_depth(next.twist, next.flip, next.slice()) as usize;
            if dist_new >= togo_phase1 {
                // impossible to reach subgroup H in togo_phase1 - 1 moves
                continue;
            }

            self.sofar_phase1.push(m);
            self.search(next, dist_new, togo_phase1 - 1)?;
            self.sofar_phase1.pop();
            if self.done {
                break;
            }
        }
        Ok(())
    }

    fn start_phase2(&mut self, mut co: CoordCube) -> Result<(), Error> {
        if !co.in_phase2() {
            return Ok(());
        }
        let len1 = self.sofar_phase1.len();
        // a new solution must be shorter than the best one so far
        let limit = match &self.best {
            Some(best) => match best.len().checked_sub(len1 + 1) {
                Some(limit) => limit,
                None => return Ok(()),
            },
            None => self.max_length - len1,
        }
        .min(MAX_PHASE2_DEPTH);

        // ud_edges is not tracked through phase 1 moves
        co.ud_edges = self.cube.apply_moves(&self.sofar_phase1).get_ud_edges();
        if co.ud_edges == INVALID_UD_EDGES {
            return Ok(());
        }
        let dist2 = self.tables.pr.phase2_depth(co.corners, co.ud_edges, co.slice_sorted) as usize;
        for togo2 in dist2..=limit {
            self.sofar_phase2.clear();
            if self.search_phase2(co, togo2)? {
                let mut solution = self.sofar_phase1.clone();
                solution.extend_from_slice(&self.sofar_phase2);
                log::trace!("two-phase candidate: {} + {} moves", len1, self.sofar_phase2.len());
                if solution.len() <= self.target_length {
                    self.done = true;
                }
                self.best = Some(solution);
                break;
            }
        }
        Ok(())
    }

    fn search_phase2(&mut self, co: CoordCube, togo_phase2: usize) -> Result<bool, Error> {
        if togo_phase2 == 0 {
            return Ok(co.corners == 0 && co.ud_edges == 0 && co.slice_sorted == 0);
        }
        self.cancel.check()?;

        let tables = self.tables;
        for m in PHASE2_MOVES {
            let last = self.sofar_phase2.last().or(self.sofar_phase1.last());
            if let Some(&last) = last {
                if redundant(last, m) {
                    continue;
                }
            }
            let mut next = co;
            next.phase2_move(m, &tables.mv);
            let dist_new =
                tables.pr.phase2_depth(next.corners, next.ud_edges, next.slice_sorted) as usize;
            if dist_new >= togo_phase2 {
                // impossible to reach solved cube in togo_phase2 - 1 moves
                continue;
            }
            self.sofar_phase2.push(m);
            if self.search_phase2(next, togo_phase2 - 1)? {
                return Ok(true);
            }
            self.sofar_phase2.pop();
        }
        Ok(false)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::moves::Move::*;
    use crate::solver::*;

    #[test]
    fn test_solve() {
        let cubestring = "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF";
        let result = solve(cubestring, 22, 1.0).unwrap();
        assert!(result.solution.len() <= 30);
        let state = bridge::facelet_string_to_state(cubestring).unwrap();
        let cc = CubieCube::try_from(&state).unwrap();
        assert!(cc.apply_moves(&result.solution).is_solved());
    }

    #[test]
    fn test_solve_short_scramble() {
        let scramble = [R, U, F3];
        let cc = CubieCube::default().apply_moves(&scramble);
        let solution = TwoPhaseSolver::default()
            .solve_cubie(cc, &CancelToken::new())
            .unwrap();
        assert!(cc.apply_moves(&solution).is_solved());
        assert!(solution.len() <= 22);
    }

    #[test]
    fn test_solve_random_cubes() {
        let mut rng = StdRng::seed_from_u64(42);
        let solver = TwoPhaseSolver::default();
        for _ in 0..3 {
            let cc = CubieCube::random(&mut rng);
            let solution = solver.solve_cubie(cc, &CancelToken::new()).unwrap();
            assert!(cc.apply_moves(&solution).is_solved());
            assert!(solution.len() <= solver.max_length);
        }
    }

    #[test]
    fn test_solved_cube() {
        let solution = TwoPhaseSolver::default()
            .solve_cubie(CubieCube::default(), &CancelToken::new())
            .unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let cc = CubieCube::default().apply_moves(&[R, U, F]);
        assert!(matches!(
            TwoPhaseSolver::default().solve_cubie(cc, &cancel),
            Err(Error::SearchAborted)
        ));
    }

    #[test]
    fn test_rejects_unsolvable() {
        let mut cc = CubieCube::default();
        cc.co[0] = 2;
        assert!(TwoPhaseSolver::default()
            .solve_cubie(cc, &CancelToken::new())
            .is_err());
    }

    #[test]
    fn test_table_cache() {
        let dir = std::env::temp_dir().join(format!("cube-assembly-tables-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let built = SolverTables::load_or_build(&dir).unwrap();
        assert!(dir.join("move_tables").exists());
        assert!(dir.join("pruning_tables").exists());

        let loaded = SolverTables::load_or_build(&dir).unwrap();
        assert!(loaded.mv == built.mv);
        assert!(loaded.pr == built.pr);

        let path = dir.join("pruning_tables");
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(
            SolverTables::load_or_build(&dir),
            Err(Error::Decode(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_redundant() {
        assert!(redundant(U, U2));
        assert!(redundant(D, U3));
        assert!(!redundant(U, D));
        assert!(!redundant(R, F));
    }
}
