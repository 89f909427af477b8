//! Depot roster and unassigned pool
//!
//! The roster is the ordered list of every tram in the depot. The pool holds
//! the indices of trams that still have no mission, smallest index first.
//! Neither type synchronizes on its own; the coordinator owns both.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{DepotError, DepotResult};
use crate::tram::{Tram, TramIndex};

const SEED_RANGE_MESSAGE: &str = "C must be between 0 and N (and N must not be negative).";

/// Validated seeding parameters for a depot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    /// Highest tram index (inclusive)
    pub last_index: TramIndex,

    /// Highest index that starts with a mission (inclusive)
    pub missioned_through: TramIndex,
}

impl SeedPlan {
    /// Validate raw `n`/`c` input against the configured upper bound.
    pub fn validate(n: i64, c: i64, max_index: i64) -> DepotResult<Self> {
        if n < 0 || c < 0 || c > n {
            return Err(DepotError::Validation(SEED_RANGE_MESSAGE.to_string()));
        }
        if n > max_index {
            return Err(DepotError::Validation(format!(
                "N must not exceed {}.",
                max_index
            )));
        }

        let last_index = TramIndex::try_from(n).map_err(|_| {
            DepotError::Validation(format!("N must not exceed {}.", TramIndex::MAX))
        })?;
        let missioned_through = TramIndex::try_from(c)
            .map_err(|_| DepotError::Validation(SEED_RANGE_MESSAGE.to_string()))?;

        Ok(Self {
            last_index,
            missioned_through,
        })
    }

    /// Number of trams the plan creates
    pub fn tram_count(&self) -> usize {
        self.last_index as usize + 1
    }
}

/// Min-ordered pool of idle tram indices
#[derive(Debug, Clone, Default)]
pub struct UnassignedPool {
    heap: BinaryHeap<Reverse<TramIndex>>,
}

impl UnassignedPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an idle tram
    pub fn push(&mut self, index: TramIndex) {
        self.heap.push(Reverse(index));
    }

    /// Remove and return the smallest idle index
    pub fn pop(&mut self) -> Option<TramIndex> {
        self.heap.pop().map(|Reverse(index)| index)
    }

    /// Smallest idle index without removing it
    pub fn peek(&self) -> Option<TramIndex> {
        self.heap.peek().map(|Reverse(index)| *index)
    }

    /// Number of idle trams
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if no tram is idle
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Ordered list of every tram in the depot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    trams: Vec<Tram>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster and matching pool from a seed plan.
    ///
    /// Trams `0..=missioned_through` start with a mission, the rest go into
    /// the pool.
    pub fn seeded(plan: SeedPlan) -> (Self, UnassignedPool) {
        let mut trams = Vec::with_capacity(plan.tram_count());
        let mut pool = UnassignedPool::new();

        for index in 0..=plan.last_index {
            let tram = Tram::new(index, index <= plan.missioned_through);
            if tram.is_idle() {
                pool.push(index);
            }
            trams.push(tram);
        }

        (Self { trams }, pool)
    }

    /// All trams in index order
    pub fn trams(&self) -> &[Tram] {
        &self.trams
    }

    /// Flag a tram popped from the pool as missioned.
    ///
    /// A tram that is missing or already missioned means the pool and roster
    /// have diverged.
    pub fn mark_missioned(&mut self, index: TramIndex) -> DepotResult<()> {
        let tram = self.trams.get_mut(index as usize).ok_or_else(|| {
            DepotError::InvariantViolation(format!("tram #{} is not in the roster", index))
        })?;

        if tram.has_mission {
            return Err(DepotError::InvariantViolation(format!(
                "tram #{} was pooled but already has a mission",
                index
            )));
        }

        tram.has_mission = true;
        Ok(())
    }

    /// Total tram count
    pub fn len(&self) -> usize {
        self.trams.len()
    }

    /// Check if the depot has not been initialized
    pub fn is_empty(&self) -> bool {
        self.trams.is_empty()
    }

    /// Count trams with a mission
    pub fn missioned_count(&self) -> usize {
        self.trams.iter().filter(|t| t.has_mission).count()
    }
}
