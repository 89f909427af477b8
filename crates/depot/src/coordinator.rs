//! Mission assignment coordinator
//!
//! Serializes mission assignment over a single coordination token. The token
//! is a `tokio::sync::Mutex` guarding the unassigned pool: assignments
//! try-acquire it and fail fast, initialization waits for it. The roster sits
//! behind a short read/write lock so listing never waits on an assignment;
//! writers only take that lock while already holding the token.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use crate::error::{DepotError, DepotResult};
use crate::roster::{Roster, SeedPlan, UnassignedPool};
use crate::tram::{MissionAssignment, Tram};

/// Confirmation returned by a successful initialization
pub const INITIALIZED_MESSAGE: &str = "Depot initialized.";

/// Default simulated planning time for [`HoldPolicy::Synchronous`], in milliseconds
pub const DEFAULT_PLANNING_DELAY_MS: u64 = 2_000;

/// Default lockout window for [`HoldPolicy::Detached`], in milliseconds
pub const DEFAULT_LOCKOUT_DELAY_MS: u64 = 5_000;

/// Default simulated planning time for [`HoldPolicy::Synchronous`]
pub const DEFAULT_PLANNING_DELAY: Duration = Duration::from_millis(DEFAULT_PLANNING_DELAY_MS);

/// Default lockout window for [`HoldPolicy::Detached`]
pub const DEFAULT_LOCKOUT_DELAY: Duration = Duration::from_millis(DEFAULT_LOCKOUT_DELAY_MS);

/// Default upper bound for the highest tram index
pub const DEFAULT_MAX_TRAM_INDEX: i64 = 10_000;

/// How long the coordination token is held by a successful assignment.
///
/// Both policies reject concurrent callers immediately instead of queueing
/// them. They differ in when the assigning caller gets its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldPolicy {
    /// The caller waits out the planning delay while holding the token, then
    /// pops a tram and releases the token before replying. Planning runs in a
    /// spawned task, so a caller that stops waiting does not cancel it: the
    /// tram is still assigned once the delay has passed.
    #[default]
    Synchronous,

    /// The caller pops a tram and gets its reply at once. A spawned task keeps
    /// the token for the lockout delay, so every other caller is rejected for
    /// that whole window, even after the assigning caller has its response.
    Detached,
}

/// Coordinator tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Token hold policy
    pub hold: HoldPolicy,

    /// Simulated planning time under [`HoldPolicy::Synchronous`]
    pub planning_delay: Duration,

    /// Lockout window under [`HoldPolicy::Detached`]
    pub lockout_delay: Duration,

    /// Largest accepted `n` for initialization
    pub max_tram_index: i64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            hold: HoldPolicy::default(),
            planning_delay: DEFAULT_PLANNING_DELAY,
            lockout_delay: DEFAULT_LOCKOUT_DELAY,
            max_tram_index: DEFAULT_MAX_TRAM_INDEX,
        }
    }
}

/// Point-in-time depot summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepotStatus {
    /// Trams in the roster
    pub total: usize,

    /// Trams with a mission
    pub missioned: usize,

    /// Trams still waiting for a mission
    pub idle: usize,
}

/// Owns the depot roster and serializes mission assignment.
///
/// Construct one per depot and share it behind an `Arc`.
pub struct MissionCoordinator {
    config: CoordinatorConfig,
    roster: Arc<RwLock<Roster>>,
    token: Arc<Mutex<UnassignedPool>>,
}

impl MissionCoordinator {
    /// Create a coordinator with an empty depot
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            roster: Arc::new(RwLock::new(Roster::new())),
            token: Arc::new(Mutex::new(UnassignedPool::new())),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Replace the roster with `n + 1` trams, the first `c + 1` of which
    /// already have a mission.
    ///
    /// Waits for any in-flight assignment (including a detached lockout) to
    /// release the token. Invalid input is rejected before the token is
    /// touched and leaves the current depot as it was.
    pub async fn initialize(&self, n: i64, c: i64) -> DepotResult<()> {
        let plan = SeedPlan::validate(n, c, self.config.max_tram_index)
            .inspect_err(|err| warn!(n, c, "Rejected depot initialization: {}", err))?;

        let mut pool = self.token.lock().await;

        let (roster, fresh_pool) = Roster::seeded(plan);
        let idle = fresh_pool.len();
        *write_roster(&self.roster) = roster;
        *pool = fresh_pool;

        info!(trams = plan.tram_count(), idle, "Depot initialized");
        Ok(())
    }

    /// Assign a mission to the idle tram with the smallest index.
    ///
    /// Fails with [`DepotError::PlanningInProgress`] without waiting if another
    /// assignment holds the token. See [`HoldPolicy`] for how long a
    /// successful call keeps other callers out.
    pub async fn assign_mission(&self) -> DepotResult<MissionAssignment> {
        let mut pool = self.try_acquire()?;

        if pool.is_empty() {
            debug!("No idle tram left to assign");
            return Err(DepotError::NoAvailableTram);
        }

        match self.config.hold {
            HoldPolicy::Synchronous => {
                let roster = Arc::clone(&self.roster);
                let delay = self.config.planning_delay;
                let planning = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    assign_next(&roster, &mut pool)
                });
                planning.await.map_err(|err| {
                    error!("Planning task failed: {}", err);
                    DepotError::InvariantViolation(format!("planning task failed: {}", err))
                })?
            }
            HoldPolicy::Detached => {
                let assignment = assign_next(&self.roster, &mut pool)?;
                let lockout = self.config.lockout_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(lockout).await;
                    drop(pool);
                    debug!("Planning lockout elapsed, token released");
                });
                Ok(assignment)
            }
        }
    }

    /// Snapshot of the roster in index order
    pub fn list_trams(&self) -> Vec<Tram> {
        read_roster(&self.roster).trams().to_vec()
    }

    /// Summary counts for the current roster
    pub fn status(&self) -> DepotStatus {
        let roster = read_roster(&self.roster);
        let missioned = roster.missioned_count();
        DepotStatus {
            total: roster.len(),
            missioned,
            idle: roster.len() - missioned,
        }
    }

    fn try_acquire(&self) -> DepotResult<OwnedMutexGuard<UnassignedPool>> {
        Arc::clone(&self.token).try_lock_owned().map_err(|_| {
            debug!("Assignment rejected, planning already in progress");
            DepotError::PlanningInProgress
        })
    }
}

// Caller must hold the token.
fn assign_next(
    roster: &RwLock<Roster>,
    pool: &mut UnassignedPool,
) -> DepotResult<MissionAssignment> {
    let tram_index = pool.pop().ok_or(DepotError::NoAvailableTram)?;

    write_roster(roster)
        .mark_missioned(tram_index)
        .inspect_err(|err| error!("Roster and pool diverged: {}", err))?;

    info!(tram_index, remaining = pool.len(), "Mission assigned");
    Ok(MissionAssignment { tram_index })
}

fn read_roster(roster: &RwLock<Roster>) -> RwLockReadGuard<'_, Roster> {
    roster.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_roster(roster: &RwLock<Roster>) -> RwLockWriteGuard<'_, Roster> {
    roster.write().unwrap_or_else(PoisonError::into_inner)
}
