use criterion::{criterion_group, criterion_main, Criterion};
use dlx_solver::dlx::matrix::Matrix;
use dlx_solver::dlx::problem::Problem;
use dlx_solver::dlx::search::Dlx;
use dlx_solver::dlx::selection::{ColumnSelection, FirstActive, MinimumSize};
use dlx_solver::sudoku::solver::{Board, Sudoku, EXAMPLE_NINE, EXAMPLE_SIXTEEN};
use std::hint::black_box;
use std::time::Duration;

fn solve_problem<S: ColumnSelection>(problem: &Problem, selector: S) {
    let (solver, _) = problem.to_solver(selector);
    black_box(solver.solve());
}

fn bench_sudoku(c: &mut Criterion) {
    let nine = Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap();
    let sixteen = Sudoku::new(Board::from(EXAMPLE_SIXTEEN)).unwrap();
    let (nine, _) = nine.to_problem();
    let (sixteen, _) = sixteen.to_problem();

    let mut group = c.benchmark_group("sudoku - column selection");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("9x9 minimum size", |b| {
        b.iter(|| solve_problem(&nine, MinimumSize));
    });

    group.bench_function("9x9 first active", |b| {
        b.iter(|| solve_problem(&nine, FirstActive));
    });

    group.bench_function("16x16 minimum size", |b| {
        b.iter(|| solve_problem(&sixteen, MinimumSize));
    });

    group.bench_function("16x16 first active", |b| {
        b.iter(|| solve_problem(&sixteen, FirstActive));
    });

    group.finish();
}

fn bench_sudoku_encoding(c: &mut Criterion) {
    let sudoku = Sudoku::new(Board::from(EXAMPLE_SIXTEEN)).unwrap();

    c.bench_function("sudoku - 16x16 encode", |b| {
        b.iter(|| black_box(sudoku.to_problem()));
    });
}

fn bench_knuth(c: &mut Criterion) {
    let rows: [&[usize]; 6] = [
        &[2, 4, 5],
        &[0, 3, 6],
        &[1, 2, 5],
        &[0, 3],
        &[1, 6],
        &[3, 4, 6],
    ];

    c.bench_function("knuth example", |b| {
        b.iter(|| {
            let mut matrix = Matrix::new(7);
            for row in rows {
                matrix.add_row(row);
            }
            black_box(Dlx::from(matrix).solve());
        });
    });
}

/// A shuffled partition of `columns` into short rows, hidden among decoys.
fn random_partition(seed: u64, columns: usize, decoys: usize) -> Problem {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut order: Vec<usize> = (0..columns).collect();
    rng.shuffle(&mut order);

    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut rest = order.as_slice();
    while !rest.is_empty() {
        let take = rng.usize(1..=rest.len().min(5));
        rows.push(rest[..take].to_vec());
        rest = &rest[take..];
    }
    for _ in 0..decoys {
        let mut row: Vec<usize> = (0..columns).collect();
        rng.shuffle(&mut row);
        row.truncate(rng.usize(1..=5));
        rows.push(row);
    }
    rng.shuffle(&mut rows);

    let mut problem = Problem::new(columns);
    for row in rows {
        problem.add_row(row).unwrap();
    }
    problem
}

fn bench_random_partition(c: &mut Criterion) {
    let problem = random_partition(42, 200, 2000);

    let mut group = c.benchmark_group("random partition");
    group.sample_size(50);

    group.bench_function("minimum size", |b| {
        b.iter(|| solve_problem(&problem, MinimumSize));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_sudoku,
    bench_sudoku_encoding,
    bench_knuth,
    bench_random_partition
);

criterion_main!(benches);
