use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cube_assembly::algorithm::{CancelToken, SolvingAlgorithm};
use cube_assembly::bridge::{facelet_string_to_state, state_to_facelet_string};
use cube_assembly::builder::Complexity;
use cube_assembly::calculator::SolutionCalculator;
use cube_assembly::config::{Algorithm, SolverConfig};
use cube_assembly::error::{AssemblyErrorCode, Error};
use cube_assembly::executor::apply_moves;
use cube_assembly::facelet::{CubeState, Face};
use cube_assembly::moves::Move;
use cube_assembly::scramble::scramble_from_str;
use cube_assembly::simulator::verify_solution;

const SCRAMBLE: &str = "D2 F' R U2 L B' D R2 F L' U B2 R' D' F2 L2 U' B R D";

struct CountingSolver(AtomicUsize);

impl SolvingAlgorithm for CountingSolver {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn solve(&self, _: &CubeState, _: &CancelToken) -> Result<Vec<Move>, Error> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn solved_cube_needs_no_moves() {
    let solution = SolutionCalculator::default()
        .calculate_solution(&CubeState::solved())
        .await
        .unwrap();
    assert_eq!(solution.total_moves, 0);
    assert!(solution.is_solved);
    assert_eq!(solution.metadata.complexity, Complexity::Easy);
}

#[tokio::test]
async fn single_move_is_undone() {
    let state = apply_moves(&CubeState::solved(), &[Move::R]);
    for algorithm in [Algorithm::TwoPhase, Algorithm::LayerByLayer] {
        let calculator = SolutionCalculator::new(SolverConfig {
            algorithm,
            ..SolverConfig::default()
        });
        let solution = calculator.calculate_solution(&state).await.unwrap();
        assert!(solution.total_moves > 0);
        assert!(verify_solution(&state, &solution.moves()));
    }
}

#[tokio::test]
async fn twenty_move_scramble() {
    let scramble = scramble_from_str(SCRAMBLE).unwrap();
    assert_eq!(scramble.len(), 20);
    let state = apply_moves(&CubeState::solved(), &scramble);
    for algorithm in [Algorithm::TwoPhase, Algorithm::LayerByLayer] {
        let config = SolverConfig {
            algorithm,
            ..SolverConfig::default()
        };
        let solution = SolutionCalculator::new(config)
            .calculate_solution(&state)
            .await
            .unwrap();
        assert!(solution.is_solved);
        assert!(solution.total_moves <= config.move_limit());
        assert!(verify_solution(&state, &solution.moves()));
        assert_eq!(solution.algorithm_used, algorithm.name());
    }
}

#[tokio::test]
async fn incomplete_cube_is_rejected_before_solving() {
    let state = CubeState::solved().with_color(Face::Down, 0, None).unwrap();
    assert_eq!(state.configured_count(), 53);
    let solver = Arc::new(CountingSolver(AtomicUsize::new(0)));
    let calculator = SolutionCalculator::with_solver(SolverConfig::default(), solver.clone());
    let err = calculator.calculate_solution(&state).await.unwrap_err();
    assert_eq!(err.code(), AssemblyErrorCode::IncompleteCubeState);
    assert_eq!(solver.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn facelet_string_input() {
    let state =
        facelet_string_to_state("RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF").unwrap();
    assert_eq!(
        state_to_facelet_string(&state).unwrap(),
        "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF"
    );
    let solution = SolutionCalculator::default()
        .calculate_solution(&state)
        .await
        .unwrap();
    assert!(solution.is_solved);
    let json = serde_json::to_value(&solution).unwrap();
    assert_eq!(json["algorithmUsed"], "kociemba");
    assert_eq!(json["increments"][0]["stepNumber"], 1);
}
