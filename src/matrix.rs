//! Distance and travel-time matrices over a batch's stops.
//!
//! Row/column 0 is the executive's current position; the order at
//! batch position `k` occupies pickup index `2k + 1` and delivery
//! index `2k + 2`. Everything downstream (solvers, precedence
//! enforcement, step assembly) relies on that layout.

use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::geo::{self, Location};
use crate::model::{DeliveryBatch, ExecutiveLocation, StopKind};

/// Identity of the stop behind a matrix index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocationMetadata {
    /// Executive id at index 0, restaurant id at pickups, order id at
    /// deliveries.
    pub id: Uuid,
    pub kind: StopKind,
}

/// Dense symmetric distance/time matrix, row-major.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    locations: Vec<Location>,
    metadata: Vec<LocationMetadata>,
    distances_km: Vec<f64>,
    times_minutes: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for a batch starting at the executive's
    /// position.
    ///
    /// Distances are haversine kilometers, with the upper triangle
    /// computed in parallel and mirrored. The time matrix is derived
    /// from the same values at the fleet average speed, so
    /// `time(i, j) == distance(i, j) / 20 * 60` holds exactly.
    pub fn build(batch: &DeliveryBatch, executive: &ExecutiveLocation) -> Self {
        let mut locations = Vec::with_capacity(2 * batch.orders.len() + 1);
        let mut metadata = Vec::with_capacity(2 * batch.orders.len() + 1);

        locations.push(executive.location);
        metadata.push(LocationMetadata {
            id: executive.executive_id,
            kind: StopKind::ExecutiveStart,
        });

        for order in &batch.orders {
            locations.push(order.restaurant_location);
            metadata.push(LocationMetadata {
                id: order.restaurant_id,
                kind: StopKind::RestaurantPickup,
            });

            locations.push(order.delivery_location);
            metadata.push(LocationMetadata {
                id: order.order_id,
                kind: StopKind::CustomerDelivery,
            });
        }

        let distances_km = symmetric_distances(&locations);
        let times_minutes = distances_km
            .iter()
            .map(|&km| geo::minutes_at_average_speed(km))
            .collect();

        Self {
            locations,
            metadata,
            distances_km,
            times_minutes,
        }
    }

    /// Number of locations: two per order, plus the start.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Distance in kilometers between two location indexes.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances_km[from * self.len() + to]
    }

    /// Travel time in minutes between two location indexes.
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.times_minutes[from * self.len() + to]
    }

    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    pub fn metadata(&self, index: usize) -> &LocationMetadata {
        &self.metadata[index]
    }
}

/// Pickup stops sit at odd indexes.
pub(crate) fn is_pickup_index(index: usize) -> bool {
    index % 2 == 1
}

/// Delivery stops sit at even indexes above zero; the paired pickup
/// is the index directly below.
pub(crate) fn is_delivery_index(index: usize) -> bool {
    index > 0 && index % 2 == 0
}

fn symmetric_distances(locations: &[Location]) -> Vec<f64> {
    let n = locations.len();
    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| geo::haversine_distance(&locations[i], &locations[j]))
                .collect()
        })
        .collect();

    let mut values = vec![0.0; n * n];
    for (i, row) in rows.iter().enumerate() {
        for (offset, &km) in row.iter().enumerate() {
            let j = i + 1 + offset;
            values[i * n + j] = km;
            values[j * n + i] = km;
        }
    }
    values
}
