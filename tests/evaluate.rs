extern crate mandelmask;
extern crate num;
extern crate rand;

use mandelmask::chart::render_ascii;
use mandelmask::{is_stable, EscapePolicy, Grid, ParallelEvaluator};
use num::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(rng: &mut StdRng) -> Grid {
    let rows = rng.gen_range(1, 40);
    let columns = rng.gen_range(1, 40);
    let real_min = rng.gen_range(-2.5, 0.0);
    let imag_min = rng.gen_range(-1.5, 0.0);
    let width = rng.gen_range(0.0, 2.5);
    let height = rng.gen_range(0.0, 1.5);
    Grid::new(
        rows,
        columns,
        Complex::new(real_min, imag_min),
        Complex::new(real_min + width, imag_min + height),
    )
    .unwrap()
}

#[test]
fn random_grids_match_across_worker_counts() {
    let mut rng = StdRng::seed_from_u64(0x6d61_6e64);
    for _ in 0..25 {
        let grid = random_grid(&mut rng);
        let iterations = rng.gen_range(0, 300);
        let workers = rng.gen_range(2, 9);
        let chunk = rng.gen_range(1, 20);

        let reference = ParallelEvaluator::new(1).evaluate(&grid, iterations).unwrap();
        let parallel = ParallelEvaluator::new(workers)
            .cells_per_task(chunk)
            .evaluate(&grid, iterations)
            .unwrap();
        let serial = ParallelEvaluator::new(workers)
            .evaluate_serial(&grid, iterations)
            .unwrap();

        assert_eq!(reference.len(), grid.rows() * grid.columns());
        assert_eq!(reference, parallel, "{:?} with {} workers", grid, workers);
        assert_eq!(reference, serial);
    }
}

#[test]
fn every_cell_agrees_with_the_kernel() {
    let mut rng = StdRng::seed_from_u64(42);
    let grid = random_grid(&mut rng);
    let mask = ParallelEvaluator::new(4).evaluate(&grid, 150).unwrap();
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            assert_eq!(
                mask.get(row, column),
                Some(is_stable(grid.coordinate_at(row, column), 150))
            );
        }
    }
}

#[test]
fn random_points_never_come_back() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let c = Complex::new(rng.gen_range(-2.5, 1.0), rng.gen_range(-1.5, 1.5));
        let n = rng.gen_range(1, 200);
        let k = rng.gen_range(1, 200);
        if !is_stable(c, n) {
            assert!(!is_stable(c, n + k), "{} came back after {} iterations", c, n + k);
        }
        assert_eq!(
            EscapePolicy::EarlyExit.is_stable(c, n),
            EscapePolicy::FixedBudget.is_stable(c, n)
        );
    }
}

#[test]
fn zero_iterations_mark_everything_stable() {
    let grid = Grid::new(5, 8, Complex::new(-3.0, -3.0), Complex::new(3.0, 3.0)).unwrap();
    let mask = ParallelEvaluator::new(3).evaluate(&grid, 0).unwrap();
    assert_eq!(mask.stable_count(), 40);
    assert_eq!(render_ascii(&mask), "........\n".repeat(5));
}

#[test]
fn default_view_frames_the_set() {
    let config = mandelmask::Config::default();
    let grid = config.grid().unwrap();
    let mask = config.evaluator().evaluate(&grid, config.iterations).unwrap();
    let chart = render_ascii(&mask);
    let lines: Vec<&str> = chart.lines().collect();
    assert_eq!(lines.len(), 63);
    // The set never reaches imag = +-1.5.
    assert!(lines[0].trim().is_empty());
    assert!(lines[62].trim().is_empty());
    assert!(lines[31].contains(".........."));
    assert!(mask.stable_count() > 0);
}
