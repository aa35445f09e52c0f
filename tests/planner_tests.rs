//! Orchestration tests: validation, solver selection, and worker
//! pool plumbing through [`RoutePlanner`].

use chrono::Utc;
use uuid::Uuid;

use delivery_routing::geo::Location;
use delivery_routing::model::{
    Algorithm, BatchStatus, DeliveryBatch, ExecutiveLocation, OrderInfo, OrderStatus,
};
use delivery_routing::planner::{PlannerConfig, RoutePlanner, RoutingError};

// ============================================================================
// Test Fixtures
// ============================================================================

fn location(lat: f64, lon: f64) -> Location {
    Location::new(lat, lon).expect("fixture coordinates are valid")
}

fn order(restaurant: (f64, f64), delivery: (f64, f64)) -> OrderInfo {
    OrderInfo {
        order_id: Uuid::new_v4(),
        restaurant_id: Uuid::new_v4(),
        restaurant_location: location(restaurant.0, restaurant.1),
        delivery_location: location(delivery.0, delivery.1),
        preparation_time_minutes: 10,
        status: OrderStatus::Preparation,
        created_at: Utc::now(),
    }
}

fn batch_of(orders: Vec<OrderInfo>) -> DeliveryBatch {
    DeliveryBatch {
        id: 42,
        executive_id: Uuid::new_v4(),
        orders,
        status: BatchStatus::Optimizing,
        created_at: Utc::now(),
    }
}

fn executive_at(coords: (f64, f64)) -> ExecutiveLocation {
    ExecutiveLocation {
        executive_id: Uuid::new_v4(),
        location: location(coords.0, coords.1),
        timestamp: Utc::now(),
    }
}

fn spread_orders(count: usize) -> Vec<OrderInfo> {
    (0..count)
        .map(|i| {
            let offset = 0.01 * i as f64;
            order((12.90 + offset, 77.58), (12.90 + offset, 77.64))
        })
        .collect()
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_empty_batch_is_rejected() {
    let planner = RoutePlanner::with_defaults();
    let executive = executive_at((12.95, 77.60));

    let err = planner
        .find_optimal_route(&batch_of(Vec::new()), &executive)
        .unwrap_err();

    assert!(matches!(err, RoutingError::EmptyBatch));
    assert!(err.is_invalid_input());
}

#[test]
fn test_oversized_batch_is_rejected() {
    let planner = RoutePlanner::with_defaults();
    let executive = executive_at((12.95, 77.60));

    let err = planner
        .find_optimal_route(&batch_of(spread_orders(11)), &executive)
        .unwrap_err();

    assert!(matches!(
        err,
        RoutingError::BatchTooLarge { actual: 11, max: 10 }
    ));
    assert!(err.is_invalid_input());
}

// ============================================================================
// Solver selection
// ============================================================================

#[test]
fn test_default_planner_solves_small_batches_exactly() {
    let planner = RoutePlanner::with_defaults();
    let batch = batch_of(spread_orders(2));
    let executive = executive_at((12.95, 77.60));

    let route = planner.find_optimal_route(&batch, &executive).unwrap();

    assert_eq!(route.batch_id, batch.id);
    assert_eq!(route.metadata.algorithm, Algorithm::ExactDp);
    assert_eq!(route.metadata.order_count, 2);
    assert_eq!(route.steps.len(), 5);
}

#[test]
fn test_solver_selection_respects_threshold() {
    let config = PlannerConfig {
        exact_algorithm_threshold: 2,
        ..PlannerConfig::default()
    };
    let planner = RoutePlanner::new(config).unwrap();
    let executive = executive_at((12.95, 77.60));

    let at_threshold = planner
        .find_optimal_route(&batch_of(spread_orders(2)), &executive)
        .unwrap();
    assert_eq!(
        at_threshold.metadata.algorithm,
        Algorithm::ExactDp,
        "the threshold is inclusive"
    );

    let above_threshold = planner
        .find_optimal_route(&batch_of(spread_orders(3)), &executive)
        .unwrap();
    assert_eq!(above_threshold.metadata.algorithm, Algorithm::Christofides);
}

// ============================================================================
// Worker pools
// ============================================================================

#[test]
fn test_dedicated_pool_matches_global_pool() {
    let batch = batch_of(spread_orders(3));
    let executive = executive_at((12.95, 77.60));

    let global = RoutePlanner::with_defaults();
    let dedicated = RoutePlanner::new(PlannerConfig {
        worker_threads: Some(4),
        ..PlannerConfig::default()
    })
    .unwrap();

    let first = global.find_optimal_route(&batch, &executive).unwrap();
    let second = dedicated.find_optimal_route(&batch, &executive).unwrap();

    let first_ids: Vec<Uuid> = first.steps.iter().map(|step| step.location_id).collect();
    let second_ids: Vec<Uuid> = second.steps.iter().map(|step| step.location_id).collect();
    assert_eq!(
        first_ids, second_ids,
        "the same batch solves to the same stop order on any pool"
    );
    assert_eq!(first.total_distance_km, second.total_distance_km);
    assert_eq!(first.total_time_minutes, second.total_time_minutes);
}
