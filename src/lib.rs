//! Route optimization core for food delivery batches.
//!
//! Builds distance and time matrices from rider and order
//! coordinates, solves small batches exactly with dynamic programming
//! and large ones with a Christofides-style heuristic, and keeps
//! every pickup ahead of its delivery throughout.

pub mod geo;
pub mod matrix;
pub mod model;
pub mod mst;
pub mod optimizer;
pub mod planner;
pub mod two_opt;

pub use geo::{
    AVERAGE_SPEED_KMH, GeoError, Location, haversine_distance, is_within_radius, travel_time,
};
pub use matrix::{DistanceMatrix, LocationMetadata};
pub use model::{
    Algorithm, BatchStatus, DeliveryBatch, ExecutiveLocation, OptimizedRoute, OrderInfo,
    OrderStatus, RouteMetadata, RouteStep, StopKind, TimeWindow,
};
pub use mst::{Edge, build_mst};
pub use optimizer::{SolverError, enforce_precedence, solve_exact, solve_heuristic};
pub use planner::{
    PlannerConfig, RoutePlanner, RoutingError, TimeWindowMap, compute_time_windows,
};
