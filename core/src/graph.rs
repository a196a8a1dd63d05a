use std::collections::HashMap;
use std::num::NonZeroU32;

use serde::Serialize;
use thiserror::Error;

use crate::record::StopRecord;

/// Index of a stop in the store. Always `< capacity` once validated.
pub type StopId = usize;

/// Edge weight. Zero is not representable: a zero weight means "no edge".
pub type Weight = u32;

/// Metadata for a loaded stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("stop number {id} out of bounds (capacity {capacity})")]
    StopOutOfBounds { id: i64, capacity: usize },

    #[error("edge nodes {from}-{to} out of bounds (capacity {capacity})")]
    EdgeOutOfBounds { from: i64, to: i64, capacity: usize },

    #[error("edge {from}-{to} has negative weight {weight}")]
    NegativeWeight { from: i64, to: i64, weight: i64 },

    #[error("edge {from}-{to} weight {weight} exceeds {max}", max = Weight::MAX)]
    WeightTooLarge { from: i64, to: i64, weight: i64 },

    #[error("graph capacity must be at least 1")]
    InvalidCapacity,

    #[error("unable to allocate a {capacity}x{capacity} weight matrix")]
    Allocation { capacity: usize },
}

/// Fixed-capacity undirected graph: a dense `capacity × capacity` weight
/// matrix plus sparse stop metadata.
///
/// `weight(u, v) == weight(v, u)` holds after every insertion. An id can
/// carry edges without having a [`Stop`] entry; callers must check
/// [`GraphStore::has_stop`] before treating an id as a known stop.
pub struct GraphStore {
    capacity: usize,
    weights: Vec<Option<NonZeroU32>>,
    stops: HashMap<StopId, Stop>,
}

impl GraphStore {
    /// Allocate a zero-filled matrix for `capacity` stops.
    ///
    /// Allocation failure is reported instead of aborting so the caller
    /// decides how to end the process.
    pub fn initialize(capacity: usize) -> Result<Self, StoreError> {
        if capacity == 0 {
            return Err(StoreError::InvalidCapacity);
        }
        let slots = capacity
            .checked_mul(capacity)
            .ok_or(StoreError::Allocation { capacity })?;

        let mut weights = Vec::new();
        weights
            .try_reserve_exact(slots)
            .map_err(|_| StoreError::Allocation { capacity })?;
        weights.resize(slots, None);

        Ok(Self {
            capacity,
            weights,
            stops: HashMap::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Map a raw id onto `0..capacity`.
    pub fn index(&self, id: i64) -> Option<StopId> {
        usize::try_from(id).ok().filter(|&i| i < self.capacity)
    }

    /// Set the symmetric weight between `from` and `to`, replacing any
    /// previous value. A zero weight removes the edge.
    pub fn set_edge(&mut self, from: i64, to: i64, weight: i64) -> Result<(), StoreError> {
        let (Some(u), Some(v)) = (self.index(from), self.index(to)) else {
            return Err(StoreError::EdgeOutOfBounds {
                from,
                to,
                capacity: self.capacity,
            });
        };
        if weight < 0 {
            return Err(StoreError::NegativeWeight { from, to, weight });
        }
        let w = Weight::try_from(weight)
            .map_err(|_| StoreError::WeightTooLarge { from, to, weight })?;

        let slot = NonZeroU32::new(w);
        self.weights[u * self.capacity + v] = slot;
        self.weights[v * self.capacity + u] = slot;
        Ok(())
    }

    /// Insert or overwrite the metadata for a stop.
    pub fn set_stop(&mut self, record: StopRecord) -> Result<StopId, StoreError> {
        let Some(id) = self.index(record.id) else {
            return Err(StoreError::StopOutOfBounds {
                id: record.id,
                capacity: self.capacity,
            });
        };
        self.stops.insert(
            id,
            Stop {
                id,
                name: record.name,
                latitude: record.latitude,
                longitude: record.longitude,
            },
        );
        Ok(id)
    }

    pub fn has_stop(&self, id: i64) -> bool {
        self.index(id).is_some_and(|i| self.stops.contains_key(&i))
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    /// Weight of the edge between `u` and `v`, or `None` when there is no
    /// edge or either id is out of range.
    pub fn weight(&self, u: StopId, v: StopId) -> Option<Weight> {
        if u >= self.capacity || v >= self.capacity {
            return None;
        }
        self.weights[u * self.capacity + v].map(NonZeroU32::get)
    }

    /// Every `(neighbor, weight)` adjacent to `u`, in id order.
    pub fn neighbors(&self, u: StopId) -> impl Iterator<Item = (StopId, Weight)> + '_ {
        let row: &[Option<NonZeroU32>] = if u < self.capacity {
            &self.weights[u * self.capacity..(u + 1) * self.capacity]
        } else {
            &[]
        };
        row.iter()
            .enumerate()
            .filter_map(|(v, w)| w.map(|w| (v, w.get())))
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of undirected edges (self-loops count once).
    pub fn edge_count(&self) -> usize {
        (0..self.capacity)
            .map(|u| self.neighbors(u).filter(|&(v, _)| v >= u).count())
            .sum()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let matrix = self.weights.len() * size_of::<Option<NonZeroU32>>();
        let stops: usize = self
            .stops
            .values()
            .map(|s| size_of::<StopId>() + size_of::<Stop>() + s.name.capacity())
            .sum();

        matrix + stops
    }
}
