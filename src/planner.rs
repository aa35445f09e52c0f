//! Batch orchestration: validation, concurrent preparation, solver
//! selection, and error wrapping.

use std::collections::HashMap;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::matrix::DistanceMatrix;
use crate::model::{DeliveryBatch, ExecutiveLocation, OptimizedRoute, TimeWindow};
use crate::optimizer::{self, SolverError};

/// Extra minutes a pickup may wait past food readiness.
const PICKUP_GRACE_PERIOD_MINUTES: u32 = 10;
/// Delivery promise, minutes after food readiness.
const DELIVERY_SLA_MINUTES: u32 = 40;
/// Handoff time at a restaurant counter.
const PICKUP_SERVICE_TIME_MINUTES: u32 = 2;
/// Handoff time at a customer's door.
const DELIVERY_SERVICE_TIME_MINUTES: u32 = 3;

/// Advisory windows keyed by stop: `R_<order_id>` for pickups,
/// `C_<order_id>` for deliveries.
pub type TimeWindowMap = HashMap<String, TimeWindow>;

/// Routing failures, split into validation (the request itself is
/// bad) and processing (the batch was plausible but optimization
/// failed).
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("batch must contain at least one order")]
    EmptyBatch,
    #[error("batch holds {actual} orders, more than the allowed {max}")]
    BatchTooLarge { actual: usize, max: usize },
    #[error("route optimization failed for batch {batch_id}")]
    OptimizationFailed {
        batch_id: i64,
        #[source]
        source: SolverError,
    },
}

impl RoutingError {
    /// Whether the failure lies in the caller's input rather than in
    /// processing, so transports can map it to a client error.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, RoutingError::OptimizationFailed { .. })
    }
}

/// Tuning knobs for [`RoutePlanner`].
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Largest order count still solved exactly.
    pub exact_algorithm_threshold: usize,
    /// Largest batch accepted at all.
    pub max_batch_size: usize,
    /// Dedicated worker pool size; `None` shares the global rayon
    /// pool.
    pub worker_threads: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            exact_algorithm_threshold: 10,
            max_batch_size: 10,
            worker_threads: None,
        }
    }
}

/// Computes optimized routes for delivery batches.
#[derive(Debug)]
pub struct RoutePlanner {
    config: PlannerConfig,
    pool: Option<ThreadPool>,
}

impl RoutePlanner {
    /// Create a planner, building its dedicated worker pool when one
    /// is configured.
    pub fn new(config: PlannerConfig) -> Result<Self, ThreadPoolBuildError> {
        let pool = match config.worker_threads {
            Some(threads) => Some(ThreadPoolBuilder::new().num_threads(threads).build()?),
            None => None,
        };
        Ok(Self { config, pool })
    }

    /// Planner with the default configuration on the global rayon
    /// pool.
    pub fn with_defaults() -> Self {
        Self {
            config: PlannerConfig::default(),
            pool: None,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Compute the optimal visiting order for a batch.
    ///
    /// Validates the batch, prepares the distance matrix and advisory
    /// time windows concurrently, then picks the solver by order
    /// count. Solver failures come back wrapped with the batch id;
    /// validation failures are reported directly.
    pub fn find_optimal_route(
        &self,
        batch: &DeliveryBatch,
        executive: &ExecutiveLocation,
    ) -> Result<OptimizedRoute, RoutingError> {
        self.validate(batch)?;
        info!(
            "starting route optimization for batch {} with {} orders",
            batch.id,
            batch.order_count()
        );

        let (matrix, time_windows) = self.install(|| {
            rayon::join(
                || DistanceMatrix::build(batch, executive),
                || compute_time_windows(batch),
            )
        });

        let result = if batch.order_count() <= self.config.exact_algorithm_threshold {
            debug!("batch {} within exact threshold, using DP solver", batch.id);
            self.install(|| optimizer::solve_exact(&matrix, &time_windows, batch))
        } else {
            debug!(
                "batch {} above exact threshold, using heuristic solver",
                batch.id
            );
            self.install(|| optimizer::solve_heuristic(&matrix, &time_windows, batch))
        };

        match result {
            Ok(route) => {
                info!(
                    "optimized batch {}: {:.2} km, {:.1} min over {} steps",
                    batch.id,
                    route.total_distance_km,
                    route.total_time_minutes,
                    route.steps.len()
                );
                Ok(route)
            }
            Err(source) => {
                error!("route optimization failed for batch {}: {}", batch.id, source);
                Err(RoutingError::OptimizationFailed {
                    batch_id: batch.id,
                    source,
                })
            }
        }
    }

    fn validate(&self, batch: &DeliveryBatch) -> Result<(), RoutingError> {
        if batch.orders.is_empty() {
            return Err(RoutingError::EmptyBatch);
        }
        if batch.order_count() > self.config.max_batch_size {
            return Err(RoutingError::BatchTooLarge {
                actual: batch.order_count(),
                max: self.config.max_batch_size,
            });
        }
        Ok(())
    }

    fn install<T: Send>(&self, work: impl FnOnce() -> T + Send) -> T {
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}

/// Advisory service windows for every stop of a batch, in minutes
/// relative to route start. Pickups run from zero to food readiness
/// plus a short grace period; deliveries run from readiness to the
/// delivery SLA.
pub fn compute_time_windows(batch: &DeliveryBatch) -> TimeWindowMap {
    let mut windows = HashMap::with_capacity(2 * batch.orders.len());

    for order in &batch.orders {
        let preparation = order.preparation_time_minutes;
        windows.insert(
            format!("R_{}", order.order_id),
            TimeWindow {
                earliest: 0,
                latest: preparation + PICKUP_GRACE_PERIOD_MINUTES,
                service_time: PICKUP_SERVICE_TIME_MINUTES,
            },
        );
        windows.insert(
            format!("C_{}", order.order_id),
            TimeWindow {
                earliest: preparation,
                latest: preparation + DELIVERY_SLA_MINUTES,
                service_time: DELIVERY_SERVICE_TIME_MINUTES,
            },
        );
    }

    windows
}
