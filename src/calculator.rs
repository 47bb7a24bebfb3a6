use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::algorithm::{CancelToken, SolvingAlgorithm};
use crate::builder::{build_solution, Solution};
use crate::config::{Algorithm, SolverConfig, SolverConfigUpdate};
use crate::error::Error;
use crate::facelet::CubeState;
use crate::{simulator, validator};

/// Validates a cube, runs the configured algorithm on a blocking worker under a time
/// budget and turns its moves into a verified [Solution].
pub struct SolutionCalculator {
    config: SolverConfig,
    solver: Arc<dyn SolvingAlgorithm>,
}

impl Default for SolutionCalculator {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl SolutionCalculator {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            solver: config.algorithm.solver(),
            config,
        }
    }

    /// Use `solver` instead of the one selected by `config.algorithm`.
    pub fn with_solver(config: SolverConfig, solver: Arc<dyn SolvingAlgorithm>) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn update_config(&mut self, update: SolverConfigUpdate) {
        self.config.apply(update);
        if let Some(algorithm) = update.algorithm {
            self.solver = algorithm.solver();
        }
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.config.algorithm = algorithm;
        self.solver = algorithm.solver();
    }

    /// Build the lookup tables of the current algorithm.
    pub async fn initialize(&self) -> Result<(), Error> {
        let solver = Arc::clone(&self.solver);
        tokio::task::spawn_blocking(move || solver.prepare())
            .await
            .map_err(|e| Error::algorithm(e.into()))
    }

    pub async fn calculate_solution(&self, state: &CubeState) -> Result<Solution, Error> {
        let validation = validator::validate(state);
        if !validation.is_complete {
            return Err(Error::IncompleteCubeState {
                errors: validation.errors,
            });
        }
        if !validation.is_valid {
            if validation.errors.iter().all(|e| e.is_solvability()) {
                return Err(Error::UnsolvableCube {
                    errors: validation.errors,
                });
            }
            return Err(Error::InvalidCubeState {
                errors: validation.errors,
            });
        }

        let name = self.solver.name();
        if simulator::is_solved(state) {
            return Ok(build_solution(state, &[], name, 0.0));
        }

        self.initialize().await?;
        let start = Instant::now();
        let timeout_ms = self.config.timeout_ms;
        let cancel = CancelToken::new();
        let task = {
            let solver = Arc::clone(&self.solver);
            let state = state.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || solver.solve(&state, &cancel))
        };
        let moves = match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
            Err(_) => {
                cancel.cancel();
                log::warn!("{name}: no solution after {timeout_ms} ms");
                return Err(Error::CalculationTimeout { timeout_ms });
            }
            Ok(Err(e)) => return Err(Error::algorithm(e.into())),
            Ok(Ok(result)) => result.map_err(Error::algorithm)?,
        };
        let calculation_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let max_moves = self.config.move_limit();
        if moves.len() > max_moves {
            return Err(Error::MaxMovesExceeded {
                moves_found: moves.len(),
                max_moves,
            });
        }

        let solution = build_solution(state, &moves, name, calculation_time_ms);
        if !solution.is_solved {
            log::error!(
                "{name}: {} moves do not solve the cube: {}",
                moves.len(),
                crate::bridge::describe(solution.final_state())
            );
            return Err(Error::AlgorithmError {
                message: "Solution verification failed".to_owned(),
                cause: None,
            });
        }
        log::info!(
            "{name}: {} moves in {:.1} ms",
            solution.total_moves,
            calculation_time_ms
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::builder::Complexity;
    use crate::calculator::*;
    use crate::cubie::CubieCube;
    use crate::error::AssemblyErrorCode;
    use crate::executor::apply_moves;
    use crate::facelet::{Color, Face};
    use crate::moves::{invert_moves, Move, Move::*};
    use crate::validator::ValidationError;

    const SCRAMBLE: [Move; 8] = [R, U, R3, U3, F2, D, L3, B];

    fn scrambled() -> CubeState {
        apply_moves(&CubeState::solved(), &SCRAMBLE)
    }

    /// Answers with fixed moves and counts its calls.
    struct FixedSolver {
        moves: Vec<Move>,
        calls: AtomicUsize,
    }

    impl FixedSolver {
        fn new(moves: Vec<Move>) -> Arc<Self> {
            Arc::new(Self {
                moves,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SolvingAlgorithm for FixedSolver {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn solve(&self, _: &CubeState, _: &CancelToken) -> Result<Vec<Move>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.moves.clone())
        }
    }

    /// Spins until cancelled.
    struct SlowSolver {
        stopped: Arc<AtomicBool>,
    }

    impl SolvingAlgorithm for SlowSolver {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn solve(&self, _: &CubeState, cancel: &CancelToken) -> Result<Vec<Move>, Error> {
            loop {
                if let Err(e) = cancel.check() {
                    self.stopped.store(true, Ordering::SeqCst);
                    return Err(e);
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        }
    }

    struct FailingSolver;

    impl SolvingAlgorithm for FailingSolver {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn solve(&self, _: &CubeState, _: &CancelToken) -> Result<Vec<Move>, Error> {
            Err(Error::InvalidCubieValue)
        }
    }

    struct PanickingSolver;

    impl SolvingAlgorithm for PanickingSolver {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn solve(&self, _: &CubeState, _: &CancelToken) -> Result<Vec<Move>, Error> {
            panic!("lost a cubie")
        }
    }

    #[tokio::test]
    async fn test_two_phase() {
        let calculator = SolutionCalculator::default();
        let state = scrambled();
        let solution = calculator.calculate_solution(&state).await.unwrap();
        assert!(solution.is_solved);
        assert_eq!(solution.algorithm_used, "kociemba");
        assert!(solution.total_moves <= 30);
        assert_eq!(solution.increments.len(), solution.total_moves);
        assert!(simulator::verify_solution(&state, &solution.moves()));
    }

    #[tokio::test]
    async fn test_layer_by_layer() {
        let mut calculator = SolutionCalculator::default();
        calculator.set_algorithm(Algorithm::LayerByLayer);
        let state = scrambled();
        let solution = calculator.calculate_solution(&state).await.unwrap();
        assert!(solution.is_solved);
        assert_eq!(solution.algorithm_used, "layer-by-layer");
        assert!(solution.total_moves <= 300);
    }

    #[tokio::test]
    async fn test_already_solved() {
        let solver = FixedSolver::new(vec![R]);
        let calculator = SolutionCalculator::with_solver(SolverConfig::default(), solver.clone());
        let solution = calculator
            .calculate_solution(&CubeState::solved())
            .await
            .unwrap();
        assert_eq!(solution.total_moves, 0);
        assert!(solution.is_solved);
        assert_eq!(solution.metadata.complexity, Complexity::Easy);
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_incomplete() {
        let calculator = SolutionCalculator::default();
        let err = calculator
            .calculate_solution(&CubeState::empty())
            .await
            .unwrap_err();
        assert_eq!(err.code(), AssemblyErrorCode::IncompleteCubeState);
        assert_eq!(
            err.validation_errors(),
            &[ValidationError::IncompleteConfiguration { remaining: 48 }]
        );
    }

    #[tokio::test]
    async fn test_invalid() {
        let state = CubeState::solved()
            .with_color(Face::Up, 0, Some(Color::Red))
            .unwrap();
        let err = SolutionCalculator::default()
            .calculate_solution(&state)
            .await
            .unwrap_err();
        assert_eq!(err.code(), AssemblyErrorCode::InvalidCubeState);
        assert!(!err.validation_errors().is_empty());
    }

    #[tokio::test]
    async fn test_unsolvable() {
        let mut cc = CubieCube::default();
        cc.co[0] = 1;
        let state = CubeState::from(&cc);
        let err = SolutionCalculator::default()
            .calculate_solution(&state)
            .await
            .unwrap_err();
        assert_eq!(err.code(), AssemblyErrorCode::UnsolvableCube);
        assert!(err.validation_errors().iter().all(|e| e.is_solvability()));
    }

    #[tokio::test]
    async fn test_timeout() {
        let stopped = Arc::new(AtomicBool::new(false));
        let config = SolverConfig {
            timeout_ms: 50,
            ..SolverConfig::default()
        };
        let calculator = SolutionCalculator::with_solver(
            config,
            Arc::new(SlowSolver {
                stopped: stopped.clone(),
            }),
        );
        let err = calculator.calculate_solution(&scrambled()).await.unwrap_err();
        assert!(matches!(err, Error::CalculationTimeout { timeout_ms: 50 }));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_max_moves() {
        let solver = FixedSolver::new([R, R3].repeat(60));
        let calculator = SolutionCalculator::with_solver(SolverConfig::default(), solver);
        let err = calculator.calculate_solution(&scrambled()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::MaxMovesExceeded {
                moves_found: 120,
                max_moves: 100
            }
        ));
    }

    #[tokio::test]
    async fn test_wrong_solution() {
        let calculator = SolutionCalculator::with_solver(
            SolverConfig::default(),
            FixedSolver::new(vec![R, U]),
        );
        let err = calculator.calculate_solution(&scrambled()).await.unwrap_err();
        assert_eq!(err.code(), AssemblyErrorCode::AlgorithmError);
        assert!(err.to_string().contains("Solution verification failed"));
    }

    #[tokio::test]
    async fn test_correct_custom_solver() {
        let solver = FixedSolver::new(invert_moves(&SCRAMBLE));
        let calculator = SolutionCalculator::with_solver(SolverConfig::default(), solver.clone());
        let solution = calculator.calculate_solution(&scrambled()).await.unwrap();
        assert_eq!(solution.algorithm_used, "fixed");
        assert_eq!(solution.total_moves, SCRAMBLE.len());
        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_solver_errors() {
        let calculator =
            SolutionCalculator::with_solver(SolverConfig::default(), Arc::new(FailingSolver));
        let err = calculator.calculate_solution(&scrambled()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::AlgorithmError {
                cause: Some(ref cause),
                ..
            } if matches!(**cause, Error::InvalidCubieValue)
        ));

        let calculator =
            SolutionCalculator::with_solver(SolverConfig::default(), Arc::new(PanickingSolver));
        let err = calculator.calculate_solution(&scrambled()).await.unwrap_err();
        assert_eq!(err.code(), AssemblyErrorCode::AlgorithmError);
        match err {
            Error::AlgorithmError {
                message,
                cause: Some(cause),
            } => {
                assert!(message.starts_with("solver task failed"));
                assert!(matches!(*cause, Error::TaskFailed(ref e) if e.is_panic()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_swapped_centers_are_invalid() {
        let mut faces = CubeState::solved().faces;
        faces[Face::Front][4] = Some(Color::Blue);
        faces[Face::Back][4] = Some(Color::Green);
        let solver = FixedSolver::new(Vec::new());
        let calculator = SolutionCalculator::with_solver(SolverConfig::default(), solver.clone());
        let err = calculator
            .calculate_solution(&CubeState::from_faces(faces))
            .await
            .unwrap_err();
        assert_eq!(err.code(), AssemblyErrorCode::InvalidCubeState);
        assert_eq!(err.validation_errors()[0].code(), "MISPLACED_CENTER");
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_config() {
        let mut calculator = SolutionCalculator::default();
        calculator.update_config(SolverConfigUpdate {
            max_moves: Some(40),
            algorithm: Some(Algorithm::LayerByLayer),
            ..Default::default()
        });
        assert_eq!(calculator.config().max_moves, 40);
        assert_eq!(calculator.config().algorithm, Algorithm::LayerByLayer);
        calculator.initialize().await.unwrap();
    }
}
