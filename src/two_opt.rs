//! 2-opt local search over a fixed-start tour.

use crate::matrix::DistanceMatrix;

/// Gains smaller than a meter are float noise, not progress.
const IMPROVEMENT_THRESHOLD: f64 = -0.001;

/// Refine a tour by repeated first-improvement 2-opt sweeps.
///
/// Each sweep scans every reversal candidate `(i, j)` with
/// `1 <= i < j <= len - 2`, applies any whose distance delta clears
/// the improvement threshold, and reverses `tour[i + 1..=j]` in
/// place. Stops after a sweep without improvement or after
/// `max_iterations` sweeps. Index 0 never moves, so the start stays
/// fixed; tours shorter than four stops come back unchanged.
pub fn refine(tour: &[usize], matrix: &DistanceMatrix, max_iterations: usize) -> Vec<usize> {
    let mut best = tour.to_vec();
    if best.len() < 4 {
        return best;
    }

    let mut iterations = 0;
    let mut improved = true;
    while improved && iterations < max_iterations {
        improved = sweep(&mut best, matrix);
        iterations += 1;
    }

    best
}

fn sweep(tour: &mut [usize], matrix: &DistanceMatrix) -> bool {
    let mut improved = false;
    for i in 1..tour.len() - 2 {
        for j in (i + 1)..tour.len() - 1 {
            if reversal_delta(tour, i, j, matrix) < IMPROVEMENT_THRESHOLD {
                tour[i + 1..=j].reverse();
                improved = true;
            }
        }
    }
    improved
}

/// Distance change from replacing legs `(i, i+1)` and `(j, j+1)` with
/// `(i, j)` and `(i+1, j+1)`. Negative means the reversal is shorter.
fn reversal_delta(tour: &[usize], i: usize, j: usize, matrix: &DistanceMatrix) -> f64 {
    let (a, b) = (tour[i], tour[i + 1]);
    let (c, d) = (tour[j], tour[j + 1]);
    matrix.distance(a, c) + matrix.distance(b, d)
        - matrix.distance(a, b)
        - matrix.distance(c, d)
}
