//! Constrained TSP solvers for delivery batches.
//!
//! Two strategies over the same matrix: exact Held-Karp bitmask DP
//! for small batches, and a Christofides-style construction (MST,
//! greedy odd-vertex matching, Eulerian tour, shortcut, 2-opt) for
//! everything larger. Both finish with pickup-before-delivery
//! enforcement and the same step assembly, so callers see one route
//! shape either way.

use std::collections::HashMap;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::matrix::{self, DistanceMatrix, LocationMetadata};
use crate::model::{
    Algorithm, DeliveryBatch, OptimizedRoute, RouteMetadata, RouteStep, StopKind, TimeWindow,
};
use crate::mst::{Edge, build_mst};
use crate::two_opt;

/// Hard ceiling for the exact solver: 21 locations (10 orders) keeps
/// the 2^n * n tables under control.
const MAX_EXACT_LOCATIONS: usize = 21;

/// Sweep cap for the heuristic's 2-opt refinement.
const TWO_OPT_MAX_ITERATIONS: usize = 100;

/// Failures inside a solver run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("matrix holds {actual} locations but the batch needs {expected}")]
    LocationCountMismatch { expected: usize, actual: usize },
    #[error("{count} locations exceed the exact solver limit of {max}")]
    TooManyLocations { count: usize, max: usize },
    #[error("constrained tour placed {placed} of {expected} stops")]
    IncompleteTour { placed: usize, expected: usize },
}

/// Solve a batch exactly with Held-Karp DP over the time matrix.
///
/// `dp[mask][last]` is the minimal cumulative travel time that starts
/// at location 0, visits exactly the set `mask`, and ends at `last`.
/// Exponential in the location count: callers route larger batches to
/// [`solve_heuristic`], and anything past the hard location cap is
/// refused outright rather than attempting an intractable table.
///
/// Time windows are advisory and accepted for signature stability
/// only; see [`crate::planner::compute_time_windows`].
pub fn solve_exact(
    matrix: &DistanceMatrix,
    _time_windows: &HashMap<String, TimeWindow>,
    batch: &DeliveryBatch,
) -> Result<OptimizedRoute, SolverError> {
    let started = Instant::now();
    check_dimensions(matrix, batch)?;

    let n = matrix.len();
    if n > MAX_EXACT_LOCATIONS {
        return Err(SolverError::TooManyLocations {
            count: n,
            max: MAX_EXACT_LOCATIONS,
        });
    }
    info!("solving exact TSP over {} locations", n);

    let size = 1usize << n;
    let mut dp = vec![f64::INFINITY; size * n];
    let mut parent = vec![-1i32; size * n];

    // Start state: standing at location 0 with only it visited.
    let start_mask = 1usize;
    dp[start_mask * n] = 0.0;

    for mask in 1..size {
        for last in 0..n {
            if mask & (1 << last) == 0 {
                continue;
            }
            let current = dp[mask * n + last];
            if !current.is_finite() {
                continue;
            }
            // TODO: add time-window feasibility to the transition cost
            for next in 0..n {
                if mask & (1 << next) != 0 {
                    continue;
                }
                let next_mask = mask | (1 << next);
                let candidate = current + matrix.time(last, next);
                if candidate < dp[next_mask * n + next] {
                    dp[next_mask * n + next] = candidate;
                    parent[next_mask * n + next] = last as i32;
                }
            }
        }
    }

    let full = size - 1;
    let end = best_end(&dp, n, full);
    let tour = reconstruct(&parent, n, full, end);
    let tour = enforce_precedence(&tour);
    ensure_complete(&tour, n)?;

    Ok(assemble_route(batch, &tour, matrix, Algorithm::ExactDp, started))
}

/// Solve a batch with a Christofides-style construction.
///
/// MST, greedy matching of odd-degree vertices, Eulerian tour over
/// the combined multigraph, Hamiltonian shortcut, then 2-opt. The
/// matching pairs greedily by nearest distance rather than computing
/// a minimum-weight perfect matching, trading the classic 1.5x
/// approximation bound for simplicity and determinism.
pub fn solve_heuristic(
    matrix: &DistanceMatrix,
    _time_windows: &HashMap<String, TimeWindow>,
    batch: &DeliveryBatch,
) -> Result<OptimizedRoute, SolverError> {
    let started = Instant::now();
    check_dimensions(matrix, batch)?;

    let n = matrix.len();
    info!("solving heuristic TSP over {} locations", n);

    let tree = build_mst(matrix);
    let odd = odd_degree_vertices(&tree, n);
    let matching = greedy_matching(&odd, matrix);
    debug!(
        "matched {} odd-degree vertices with {} edges",
        odd.len(),
        matching.len()
    );

    let mut graph = Multigraph::with_vertices(n);
    for edge in tree.iter().chain(matching.iter()) {
        graph.add_edge(edge.from, edge.to);
    }

    let eulerian = graph.into_eulerian_tour(0);
    let tour = shortcut(&eulerian);
    let tour = two_opt::refine(&tour, matrix, TWO_OPT_MAX_ITERATIONS);
    let tour = enforce_precedence(&tour);
    ensure_complete(&tour, n)?;

    Ok(assemble_route(
        batch,
        &tour,
        matrix,
        Algorithm::Christofides,
        started,
    ))
}

/// Reorder a tour so every pickup precedes its delivery.
///
/// Walks the tour left to right, each round placing the first
/// unplaced vertex whose precedence is satisfied; when every
/// remaining vertex is a blocked delivery, the fallback pulls that
/// delivery's pickup forward instead. The output is a permutation of
/// the input whenever each delivery's pickup is present, which holds
/// for every tour the solvers produce.
pub fn enforce_precedence(tour: &[usize]) -> Vec<usize> {
    let Some(&first) = tour.first() else {
        return Vec::new();
    };

    let capacity = tour.iter().copied().max().unwrap_or(0) + 1;
    let mut placed = vec![false; capacity];
    let mut constrained = Vec::with_capacity(tour.len());

    constrained.push(first);
    placed[first] = true;

    while constrained.len() < tour.len() {
        match next_admissible(tour, &placed) {
            Some(vertex) => {
                constrained.push(vertex);
                placed[vertex] = true;
            }
            None => break,
        }
    }

    constrained
}

// ============================================================================
// Exact solver internals
// ============================================================================

fn best_end(dp: &[f64], n: usize, full: usize) -> usize {
    let mut best = 0;
    let mut best_time = f64::INFINITY;
    for last in 0..n {
        let time = dp[full * n + last];
        if time < best_time {
            best_time = time;
            best = last;
        }
    }
    best
}

/// Walk the parent table backwards from `end`, clearing one visited
/// bit per step, until only the start remains.
fn reconstruct(parent: &[i32], n: usize, full: usize, end: usize) -> Vec<usize> {
    let mut tour = Vec::with_capacity(n);
    let mut mask = full;
    let mut current = end;

    loop {
        tour.push(current);
        let remaining = mask ^ (1 << current);
        if remaining == 0 {
            break;
        }
        let previous = parent[mask * n + current];
        if previous < 0 {
            break;
        }
        current = previous as usize;
        mask = remaining;
    }

    tour.reverse();
    tour
}

// ============================================================================
// Heuristic solver internals
// ============================================================================

/// Vertices with odd degree in the spanning tree, ascending.
fn odd_degree_vertices(edges: &[Edge], n: usize) -> Vec<usize> {
    let mut degree = vec![0usize; n];
    for edge in edges {
        degree[edge.from] += 1;
        degree[edge.to] += 1;
    }
    (0..n).filter(|&vertex| degree[vertex] % 2 == 1).collect()
}

/// Pair odd-degree vertices greedily: each unmatched vertex takes the
/// nearest unmatched vertex after it.
fn greedy_matching(odd: &[usize], matrix: &DistanceMatrix) -> Vec<Edge> {
    let mut matched = vec![false; matrix.len()];
    let mut edges = Vec::with_capacity(odd.len() / 2);

    for (i, &vertex) in odd.iter().enumerate() {
        if matched[vertex] {
            continue;
        }
        let mut best: Option<(usize, f64)> = None;
        for &other in &odd[i + 1..] {
            if matched[other] {
                continue;
            }
            let weight = matrix.distance(vertex, other);
            if best.map_or(true, |(_, w)| weight < w) {
                best = Some((other, weight));
            }
        }
        if let Some((other, weight)) = best {
            matched[vertex] = true;
            matched[other] = true;
            edges.push(Edge {
                from: vertex,
                to: other,
                weight,
            });
        }
    }

    edges
}

/// Adjacency-list multigraph; parallel edges are duplicate entries.
struct Multigraph {
    adjacency: Vec<Vec<usize>>,
}

impl Multigraph {
    fn with_vertices(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    /// Remove one occurrence of the edge from each endpoint, leaving
    /// any parallel copies in place.
    fn remove_edge(&mut self, a: usize, b: usize) {
        if let Some(position) = self.adjacency[a].iter().position(|&v| v == b) {
            self.adjacency[a].remove(position);
        }
        if let Some(position) = self.adjacency[b].iter().position(|&v| v == a) {
            self.adjacency[b].remove(position);
        }
    }

    /// Hierholzer's algorithm with an explicit stack, consuming the
    /// graph's edges. For a connected multigraph whose vertices all
    /// have even degree this yields a closed Eulerian tour.
    fn into_eulerian_tour(mut self, start: usize) -> Vec<usize> {
        let mut stack = vec![start];
        let mut tour = Vec::new();

        while let Some(&vertex) = stack.last() {
            match self.adjacency[vertex].first().copied() {
                Some(next) => {
                    self.remove_edge(vertex, next);
                    stack.push(next);
                }
                None => {
                    tour.push(vertex);
                    stack.pop();
                }
            }
        }

        tour
    }
}

/// Collapse an Eulerian tour to a Hamiltonian one by keeping only the
/// first visit to each vertex.
fn shortcut(eulerian: &[usize]) -> Vec<usize> {
    let capacity = eulerian.iter().copied().max().map_or(0, |m| m + 1);
    let mut seen = vec![false; capacity];
    let mut tour = Vec::new();

    for &vertex in eulerian {
        if !seen[vertex] {
            seen[vertex] = true;
            tour.push(vertex);
        }
    }

    tour
}

// ============================================================================
// Precedence internals
// ============================================================================

/// First unplaced vertex whose precedence is satisfied, or a fallback
/// that unblocks the earliest blocked delivery by taking its pickup.
fn next_admissible(tour: &[usize], placed: &[bool]) -> Option<usize> {
    for &vertex in tour {
        if !placed[vertex] && can_visit(vertex, placed) {
            return Some(vertex);
        }
    }
    for &vertex in tour {
        if placed[vertex] {
            continue;
        }
        if matrix::is_delivery_index(vertex) && !placed[vertex - 1] {
            return Some(vertex - 1);
        }
        return Some(vertex);
    }
    None
}

/// The start is always admissible, pickups are always admissible, and
/// a delivery needs its pickup (the index directly below) placed.
fn can_visit(vertex: usize, placed: &[bool]) -> bool {
    if vertex == 0 || matrix::is_pickup_index(vertex) {
        return true;
    }
    placed[vertex - 1]
}

// ============================================================================
// Route assembly
// ============================================================================

fn check_dimensions(matrix: &DistanceMatrix, batch: &DeliveryBatch) -> Result<(), SolverError> {
    let expected = 2 * batch.order_count() + 1;
    if matrix.len() != expected {
        return Err(SolverError::LocationCountMismatch {
            expected,
            actual: matrix.len(),
        });
    }
    Ok(())
}

fn ensure_complete(tour: &[usize], expected: usize) -> Result<(), SolverError> {
    if tour.len() != expected {
        return Err(SolverError::IncompleteTour {
            placed: tour.len(),
            expected,
        });
    }
    Ok(())
}

fn assemble_route(
    batch: &DeliveryBatch,
    tour: &[usize],
    matrix: &DistanceMatrix,
    algorithm: Algorithm,
    started: Instant,
) -> OptimizedRoute {
    OptimizedRoute {
        route_id: Uuid::new_v4(),
        batch_id: batch.id,
        steps: assemble_steps(tour, matrix),
        total_distance_km: leg_sum(tour, |from, to| matrix.distance(from, to)),
        total_time_minutes: leg_sum(tour, |from, to| matrix.time(from, to)),
        metadata: RouteMetadata {
            algorithm,
            optimization_time_ms: started.elapsed().as_millis() as u64,
            order_count: batch.order_count(),
        },
    }
}

/// Annotate each tour position with leg distance, cumulative arrival
/// time, and rider-facing instructions.
fn assemble_steps(tour: &[usize], matrix: &DistanceMatrix) -> Vec<RouteStep> {
    let mut steps = Vec::with_capacity(tour.len());
    let mut arrival = 0.0;

    for (position, &index) in tour.iter().enumerate() {
        let (distance_km, time_minutes) = match position {
            0 => (0.0, 0.0),
            _ => {
                let previous = tour[position - 1];
                (matrix.distance(previous, index), matrix.time(previous, index))
            }
        };
        arrival += time_minutes;

        let meta = matrix.metadata(index);
        steps.push(RouteStep {
            sequence: position + 1,
            location_id: meta.id,
            kind: meta.kind,
            location: *matrix.location(index),
            distance_from_previous_km: distance_km,
            time_from_previous_minutes: time_minutes,
            estimated_arrival_minutes: arrival,
            instructions: instructions_for(meta),
        });
    }

    steps
}

fn leg_sum(tour: &[usize], leg: impl Fn(usize, usize) -> f64) -> f64 {
    tour.windows(2).map(|pair| leg(pair[0], pair[1])).sum()
}

fn instructions_for(meta: &LocationMetadata) -> String {
    match meta.kind {
        StopKind::ExecutiveStart => "Start from executive location".to_string(),
        StopKind::RestaurantPickup => format!("Pick up order from restaurant {}", meta.id),
        StopKind::CustomerDelivery => format!("Deliver order {}", meta.id),
    }
}
