//! Per-layout seating service.
//!
//! Loads a layout's snapshot from a store, solves it on a blocking worker and
//! saves the exported seats back. Recomputes of the same layout run one at a
//! time, from snapshot load to save, even when a caller stops waiting for
//! its result; different layouts run in parallel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use seatplan_core::{LayoutId, Snapshot};
use seatplan_solver::{
    import, SeatAssignmentRecord, SeatingPlan, SeatingRequest, SeatingSolver, SolverError,
};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

/// Storage collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("layout `{0}` not found")]
    NotFound(LayoutId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Error returned by [`SeatingService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The blocking worker panicked or was cancelled by the runtime.
    #[error("Solver worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Where layouts come from and where their seats go.
///
/// `save_assignment` replaces every record previously saved for the layout
/// in one step (delete-then-insert or upsert).
pub trait SeatingStore: Send + Sync + 'static {
    fn load_snapshot(&self, layout: &LayoutId) -> Result<Snapshot, StoreError>;

    /// Records last saved for the layout, if any.
    fn load_assignment(
        &self,
        _layout: &LayoutId,
    ) -> Result<Option<Vec<SeatAssignmentRecord>>, StoreError> {
        Ok(None)
    }

    fn save_assignment(
        &self,
        layout: &LayoutId,
        records: &[SeatAssignmentRecord],
    ) -> Result<(), StoreError>;
}

/// Lock and stop flag of one layout.
#[derive(Debug, Default)]
struct LayoutSlot {
    running: Arc<tokio::sync::Mutex<()>>,
    /// Stop flag of the run holding `running`, if one does.
    terminate: Mutex<Option<Arc<AtomicBool>>>,
}

type Slots = Arc<Mutex<HashMap<LayoutId, Arc<LayoutSlot>>>>;

/// Exclusive hold on a layout for one run, from snapshot load to save.
///
/// Dropping it retires the run's stop flag and forgets the slot when nobody
/// else waits on the layout.
struct LayoutRun {
    layout: LayoutId,
    slot: Arc<LayoutSlot>,
    slots: Slots,
    _lock: OwnedMutexGuard<()>,
}

impl Drop for LayoutRun {
    fn drop(&mut self) {
        *self.slot.terminate.lock() = None;
        let mut slots = self.slots.lock();
        // one reference in the map, one here
        let idle = Arc::strong_count(&self.slot) == 2;
        if idle
            && slots
                .get(&self.layout)
                .is_some_and(|slot| Arc::ptr_eq(slot, &self.slot))
        {
            slots.remove(&self.layout);
        }
    }
}

/// Recomputes seating per layout over a [`SeatingStore`].
///
/// # Example
///
/// ```
/// use seatplan::prelude::*;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryStore::new();
/// let layout = LayoutId::from("hall");
/// store.insert_snapshot(
///     layout.clone(),
///     Snapshot::new(
///         vec![Guest::new("ann", "Ann"), Guest::new("bob", "Bob")],
///         vec![Table::new("t1", 2)],
///         vec![SeatingPreference::must_together("ann", "bob")],
///     ),
/// );
///
/// let service = SeatingService::new(store, SeatingSolver::default());
/// let plan = service.recompute(&layout).await.unwrap();
/// assert!(plan.is_feasible());
/// assert_eq!(service.store().records(&layout).map(|r| r.len()), Some(2));
/// # });
/// ```
pub struct SeatingService<St: SeatingStore> {
    store: Arc<St>,
    solver: SeatingSolver,
    layouts: Slots,
}

impl<St: SeatingStore> SeatingService<St> {
    pub fn new(store: St, solver: SeatingSolver) -> Self {
        Self {
            store: Arc::new(store),
            solver,
            layouts: Slots::default(),
        }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn solver(&self) -> &SeatingSolver {
        &self.solver
    }

    /// Solves the layout from scratch and saves the result.
    ///
    /// Waits while another recompute of the same layout is running.
    pub async fn recompute(&self, layout: &LayoutId) -> Result<SeatingPlan, ServiceError> {
        self.run(layout, false).await
    }

    /// Like [`recompute`](Self::recompute), starting from the saved seats.
    ///
    /// Guests the saved plan seats keep their tables during construction.
    pub async fn reoptimize(&self, layout: &LayoutId) -> Result<SeatingPlan, ServiceError> {
        self.run(layout, true).await
    }

    /// Asks the running recompute of `layout` to stop early.
    ///
    /// It still saves its best plan so far. Returns false when nothing runs;
    /// recomputes still waiting for the layout are not affected.
    pub fn cancel(&self, layout: &LayoutId) -> bool {
        let layouts = self.layouts.lock();
        let Some(slot) = layouts.get(layout) else {
            return false;
        };
        let cancelled = match slot.terminate.lock().as_ref() {
            Some(flag) => {
                flag.store(true, Ordering::SeqCst);
                info!(event = "recompute_cancel", layout = %layout);
                true
            }
            None => false,
        };
        cancelled
    }

    /// Returns true while a recompute of `layout` is running.
    pub fn is_running(&self, layout: &LayoutId) -> bool {
        self.layouts
            .lock()
            .get(layout)
            .is_some_and(|slot| slot.terminate.lock().is_some())
    }

    fn slot(&self, layout: &LayoutId) -> Arc<LayoutSlot> {
        self.layouts
            .lock()
            .entry(layout.clone())
            .or_default()
            .clone()
    }

    async fn run(&self, layout: &LayoutId, warm: bool) -> Result<SeatingPlan, ServiceError> {
        let slot = self.slot(layout);
        let lock = match Arc::clone(&slot.running).try_lock_owned() {
            Ok(lock) => lock,
            Err(_) => {
                debug!(event = "layout_busy", layout = %layout);
                Arc::clone(&slot.running).lock_owned().await
            }
        };
        let terminate = Arc::new(AtomicBool::new(false));
        *slot.terminate.lock() = Some(Arc::clone(&terminate));
        let run = LayoutRun {
            layout: layout.clone(),
            slot,
            slots: Arc::clone(&self.layouts),
            _lock: lock,
        };

        info!(event = "recompute_start", layout = %layout, warm_start = warm);

        let store = Arc::clone(&self.store);
        let solver = self.solver.clone();
        let id = layout.clone();
        let plan = tokio::task::spawn_blocking(move || -> Result<SeatingPlan, ServiceError> {
            // the layout stays held until the save returns, even if the
            // caller dropped its future
            let _run = run;
            let snapshot = store.load_snapshot(&id)?;
            let mut request = SeatingRequest::new(snapshot);
            if warm {
                if let Some(records) = store.load_assignment(&id)? {
                    request = request.with_warm_start(import(&records));
                }
            }
            let plan = solver.solve_with_flag(request, &terminate)?;
            store.save_assignment(&id, &plan.records)?;
            Ok(plan)
        })
        .await??;

        info!(
            event = "recompute_end",
            layout = %layout,
            score = %plan.score,
            records = plan.records.len(),
        );
        Ok(plan)
    }
}

/// Store that keeps layouts in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshots: RwLock<HashMap<LayoutId, Snapshot>>,
    assignments: RwLock<HashMap<LayoutId, Vec<SeatAssignmentRecord>>>,
    saves: RwLock<HashMap<LayoutId, usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a layout's snapshot.
    pub fn insert_snapshot(&self, layout: LayoutId, snapshot: Snapshot) {
        self.snapshots.write().insert(layout, snapshot);
    }

    /// Records last saved for the layout.
    pub fn records(&self, layout: &LayoutId) -> Option<Vec<SeatAssignmentRecord>> {
        self.assignments.read().get(layout).cloned()
    }

    /// Number of saves for the layout so far.
    pub fn save_count(&self, layout: &LayoutId) -> usize {
        self.saves.read().get(layout).copied().unwrap_or(0)
    }
}

impl SeatingStore for InMemoryStore {
    fn load_snapshot(&self, layout: &LayoutId) -> Result<Snapshot, StoreError> {
        self.snapshots
            .read()
            .get(layout)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(layout.clone()))
    }

    fn load_assignment(
        &self,
        layout: &LayoutId,
    ) -> Result<Option<Vec<SeatAssignmentRecord>>, StoreError> {
        Ok(self.records(layout))
    }

    fn save_assignment(
        &self,
        layout: &LayoutId,
        records: &[SeatAssignmentRecord],
    ) -> Result<(), StoreError> {
        self.assignments
            .write()
            .insert(layout.clone(), records.to_vec());
        *self.saves.write().entry(layout.clone()).or_insert(0) += 1;
        Ok(())
    }
}
