//! Minimum spanning tree over the distance matrix (Prim's algorithm).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::matrix::DistanceMatrix;

/// An undirected weighted edge between two location indexes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// Min-heap adapter: `BinaryHeap` is a max-heap, so the ordering is
/// reversed. Ties break on endpoint indexes to keep runs
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate(Edge);

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .weight
            .total_cmp(&self.0.weight)
            .then_with(|| other.0.to.cmp(&self.0.to))
            .then_with(|| other.0.from.cmp(&self.0.from))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the minimum spanning tree rooted at location 0.
///
/// Grows the tree one cheapest frontier edge at a time until all
/// locations are connected: n - 1 edges for n locations, empty for
/// fewer than two.
pub fn build_mst(matrix: &DistanceMatrix) -> Vec<Edge> {
    let n = matrix.len();
    if n < 2 {
        return Vec::new();
    }

    let mut in_tree = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut edges = Vec::with_capacity(n - 1);

    in_tree[0] = true;
    for to in 1..n {
        heap.push(Candidate(Edge {
            from: 0,
            to,
            weight: matrix.distance(0, to),
        }));
    }

    while let Some(Candidate(edge)) = heap.pop() {
        if edges.len() == n - 1 {
            break;
        }
        if in_tree[edge.to] {
            continue;
        }
        in_tree[edge.to] = true;

        for to in 0..n {
            if !in_tree[to] {
                heap.push(Candidate(Edge {
                    from: edge.to,
                    to,
                    weight: matrix.distance(edge.to, to),
                }));
            }
        }

        edges.push(edge);
    }

    edges
}
