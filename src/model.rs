//! Domain snapshots exchanged with the routing core.
//!
//! Plain data carriers with the wire casing used across the delivery
//! platform. Validation beyond coordinate ranges happens in the
//! planner, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Location;

/// Lifecycle of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Preparation,
    ReadyForPickup,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
}

/// Lifecycle of a delivery batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Pending,
    Optimizing,
    Optimized,
    Assigned,
    InProgress,
    Completed,
}

/// One order inside a batch: where to pick it up, where to drop it,
/// and how long the kitchen still needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInfo {
    pub order_id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_location: Location,
    pub delivery_location: Location,
    /// Remaining kitchen preparation time in minutes.
    pub preparation_time_minutes: u32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Last known position of a delivery executive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveLocation {
    pub executive_id: Uuid,
    pub location: Location,
    /// When the position was observed.
    pub timestamp: DateTime<Utc>,
}

/// The set of orders assigned to one executive for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryBatch {
    pub id: i64,
    pub executive_id: Uuid,
    pub orders: Vec<OrderInfo>,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
}

impl DeliveryBatch {
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

/// An advisory service window, minutes relative to route start.
///
/// Computed alongside every route but not yet enforced by the solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: u32,
    pub latest: u32,
    /// On-site handling time once arrived.
    pub service_time: u32,
}

/// Role a stop plays in the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopKind {
    ExecutiveStart,
    RestaurantPickup,
    CustomerDelivery,
}

/// One stop of the final route, annotated for the rider app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStep {
    /// 1-based position in the route.
    pub sequence: usize,
    /// Executive id at the start, restaurant id at pickups, order id
    /// at deliveries.
    pub location_id: Uuid,
    pub kind: StopKind,
    pub location: Location,
    pub distance_from_previous_km: f64,
    pub time_from_previous_minutes: f64,
    /// Cumulative travel time from route start.
    pub estimated_arrival_minutes: f64,
    pub instructions: String,
}

/// Which solver produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    ExactDp,
    Christofides,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::ExactDp => f.write_str("EXACT_DP"),
            Algorithm::Christofides => f.write_str("CHRISTOFIDES"),
        }
    }
}

/// Solver provenance and timing attached to a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMetadata {
    pub algorithm: Algorithm,
    /// Wall-clock optimization time.
    pub optimization_time_ms: u64,
    pub order_count: usize,
}

/// The optimized visiting order for a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub route_id: Uuid,
    pub batch_id: i64,
    pub steps: Vec<RouteStep>,
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    pub metadata: RouteMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_casing() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap(),
            "\"READY_FOR_PICKUP\""
        );
        assert_eq!(
            serde_json::to_string(&BatchStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&StopKind::ExecutiveStart).unwrap(),
            "\"EXECUTIVE_START\""
        );
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(Algorithm::ExactDp.to_string(), "EXACT_DP");
        assert_eq!(Algorithm::Christofides.to_string(), "CHRISTOFIDES");
        assert_eq!(
            serde_json::to_string(&Algorithm::ExactDp).unwrap(),
            "\"EXACT_DP\""
        );
    }

    #[test]
    fn test_status_round_trip() {
        let status: OrderStatus = serde_json::from_str("\"PICKED_UP\"").unwrap();
        assert_eq!(status, OrderStatus::PickedUp);
    }
}
