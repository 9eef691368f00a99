//! Benchmarks for the placement solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use navicust_solver::candidates::generate_candidates;
use navicust_solver::grid::Grid;
use navicust_solver::puzzles::builtin;
use navicust_solver::solve;

/// Benchmark the complete search over a built-in puzzle (bounded, since the
/// search can otherwise run far longer than a benchmark iteration should).
fn bench_solve(c: &mut Criterion) {
    let puzzle = builtin("command-line-pair").unwrap();
    c.bench_function("solve_command_line_pair", |b| {
        b.iter(|| {
            solve(
                black_box(&puzzle.parts),
                black_box(&puzzle.requirements),
                puzzle.grid_settings,
                &puzzle.spinnable_colors,
            )
            .take(50)
            .count()
        })
    });
}

/// Benchmark candidate generation for a single requirement.
fn bench_generate_candidates(c: &mut Criterion) {
    let puzzle = builtin("spinnable-l").unwrap();
    let part = &puzzle.parts[0];
    let requirement = &puzzle.requirements[0];

    c.bench_function("generate_candidates", |b| {
        b.iter(|| {
            generate_candidates(
                black_box(part),
                black_box(requirement),
                &puzzle.spinnable_colors,
                &puzzle.grid_settings,
            )
        })
    });
}

/// Benchmark fingerprinting a fully-placed grid.
fn bench_fingerprint(c: &mut Criterion) {
    let puzzle = builtin("command-line-pair").unwrap();
    let solution = solve(
        &puzzle.parts,
        &puzzle.requirements,
        puzzle.grid_settings,
        &puzzle.spinnable_colors,
    )
    .next()
    .expect("at least one solution");

    let grid = navicust_solver::place_all(
        &puzzle.parts,
        &puzzle.requirements,
        &solution,
        &puzzle.grid_settings,
    );
    black_box(grid);

    c.bench_function("grid_fingerprint", |b| {
        let mut g = Grid::new(&puzzle.grid_settings);
        for (i, req) in puzzle.requirements.iter().enumerate() {
            let part = &puzzle.parts[req.part_index];
            g.place(&part.compressed_mask, solution[i].loc.position, i as i32);
        }
        b.iter(|| g.fingerprint(|req_idx| puzzle.requirements[req_idx].part_index))
    });
}

criterion_group!(
    benches,
    bench_solve,
    bench_generate_candidates,
    bench_fingerprint
);
criterion_main!(benches);
