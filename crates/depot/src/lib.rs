//! SmartDepot Depot
//!
//! Tram roster and mission-assignment coordination for a single depot.
//!
//! This crate provides:
//! - The tram model and its wire representation
//! - A roster with a smallest-index-first pool of idle trams
//! - [`MissionCoordinator`], which lets at most one mission assignment run at
//!   a time and rejects concurrent callers instead of queueing them
//!
//! # Examples
//!
//! ```no_run
//! use smartdepot_depot::{CoordinatorConfig, MissionCoordinator};
//!
//! # async fn run() -> Result<(), smartdepot_depot::DepotError> {
//! let coordinator = MissionCoordinator::new(CoordinatorConfig::default());
//! coordinator.initialize(5, 2).await?;
//!
//! let assignment = coordinator.assign_mission().await?;
//! assert_eq!(assignment.tram_index, 3);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod coordinator;
pub mod error;
pub mod roster;
pub mod tram;

pub use coordinator::{
    CoordinatorConfig, DepotStatus, HoldPolicy, MissionCoordinator, DEFAULT_LOCKOUT_DELAY_MS,
    DEFAULT_PLANNING_DELAY_MS, INITIALIZED_MESSAGE,
};
pub use error::{DepotError, DepotResult, ErrorKind};
pub use roster::{Roster, SeedPlan, UnassignedPool};
pub use tram::{MissionAssignment, Tram, TramIndex};
