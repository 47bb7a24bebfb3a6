use criterion::{criterion_group, criterion_main, Criterion};

use cube_assembly::algorithm::CancelToken;
use cube_assembly::cubie::CubieCube;
use cube_assembly::executor;
use cube_assembly::facelet::CubeState;
use cube_assembly::layered::LayerByLayerSolver;
use cube_assembly::moves::Move::*;
use cube_assembly::solver::solve;

fn cc_apply_moves() {
    let cc = CubieCube::default();
    let _ = cc.apply_moves(&[R, U, R3, U3]);
}

fn cc_multi_moves() {
    let mut cc = CubieCube::default();
    cc.multiply_moves(&[R, U, R3, U3]);
}

fn facelet_apply_moves() {
    let _ = executor::apply_moves(&CubeState::solved(), &[R, U, R3, U3]);
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("Moves");
    group.bench_function("multiply_moves", |b| b.iter(cc_multi_moves));
    group.bench_function("apply_moves", |b| b.iter(cc_apply_moves));
    group.bench_function("facelet apply_moves", |b| b.iter(facelet_apply_moves));
    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    c.bench_function("Solver", |b| {
        b.iter(|| {
            solve(
                "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF",
                20,
                3.0,
            )
            .unwrap()
        })
    });
}

fn bench_layered(c: &mut Criterion) {
    let cc = CubieCube::default().apply_moves(&[R, U2, F3, L, D, B2, R3, U, F2, D3, L2, B]);
    c.bench_function("Layer by layer", |b| {
        b.iter(|| {
            LayerByLayerSolver
                .solve_cubie(cc, &CancelToken::new())
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_solver, bench_layered, bench_moves);
criterion_main!(benches);
