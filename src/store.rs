//! Shared state store - the authoritative in-memory snapshot of the
//! three collections
//!
//! Each collection moves `Empty -> Loading -> Populated` and re-enters
//! `Loading -> Populated` on every refresh. A failed refresh leaves the
//! previous snapshot untouched; the provider's notification is the only
//! signal to the user. Concurrent refreshes of the same collection are not
//! deduplicated - whichever resolves last wins.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use crate::models::{Employee, Position, Resource, Task};
use crate::provider::{ApiError, DataProvider};

/// List access the store needs from the data layer.
///
/// `DataProvider` is the production implementation; tests inject fakes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn employees(&self) -> Result<Vec<Employee>, ApiError>;
    async fn positions(&self) -> Result<Vec<Position>, ApiError>;
    async fn tasks(&self) -> Result<Vec<Task>, ApiError>;
}

#[async_trait]
impl Backend for DataProvider {
    async fn employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.list(Resource::Employees).await
    }

    async fn positions(&self) -> Result<Vec<Position>, ApiError> {
        self.list(Resource::Positions).await
    }

    async fn tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.list(Resource::Tasks).await
    }
}

/// Lifecycle of a collection snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Populated,
}

/// One collection snapshot plus its lifecycle state
#[derive(Debug)]
struct Cell<T> {
    records: Vec<T>,
    state: LoadState,
    ever_populated: bool,
}

impl<T> Default for Cell<T> {
    fn default() -> Self {
        Cell {
            records: Vec::new(),
            state: LoadState::Empty,
            ever_populated: false,
        }
    }
}

impl<T> Cell<T> {
    fn begin(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Wholesale replacement; no incremental merge
    fn commit(&mut self, records: Vec<T>) {
        self.records = records;
        self.state = LoadState::Populated;
        self.ever_populated = true;
    }

    /// Stale-on-error: keep the previous records, drop the Loading marker
    fn rollback(&mut self) {
        self.state = if self.ever_populated {
            LoadState::Populated
        } else {
            LoadState::Empty
        };
    }
}

/// Injectable state container owning the three collections
pub struct Store<B> {
    backend: Arc<B>,
    employees: RwLock<Cell<Employee>>,
    positions: RwLock<Cell<Position>>,
    tasks: RwLock<Cell<Task>>,
    revision: watch::Sender<u64>,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: Arc<B>) -> Self {
        let (revision, _) = watch::channel(0);
        Store {
            backend,
            employees: RwLock::new(Cell::default()),
            positions: RwLock::new(Cell::default()),
            tasks: RwLock::new(Cell::default()),
            revision,
        }
    }

    /// Watch for snapshot changes; the value is a monotonic revision counter
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Re-fetch the employee collection and replace the snapshot
    pub async fn refresh_employees(&self) -> Result<(), ApiError> {
        self.employees.write().await.begin();
        match self.backend.employees().await {
            Ok(records) => {
                self.employees.write().await.commit(records);
                self.bump();
                Ok(())
            }
            Err(err) => {
                self.employees.write().await.rollback();
                Err(err)
            }
        }
    }

    /// Re-fetch the position collection and replace the snapshot
    pub async fn refresh_positions(&self) -> Result<(), ApiError> {
        self.positions.write().await.begin();
        match self.backend.positions().await {
            Ok(records) => {
                self.positions.write().await.commit(records);
                self.bump();
                Ok(())
            }
            Err(err) => {
                self.positions.write().await.rollback();
                Err(err)
            }
        }
    }

    /// Re-fetch the task collection and replace the snapshot
    pub async fn refresh_tasks(&self) -> Result<(), ApiError> {
        self.tasks.write().await.begin();
        match self.backend.tasks().await {
            Ok(records) => {
                self.tasks.write().await.commit(records);
                self.bump();
                Ok(())
            }
            Err(err) => {
                self.tasks.write().await.rollback();
                Err(err)
            }
        }
    }

    /// Refresh the collection backing the given resource
    pub async fn refresh(&self, resource: Resource) -> Result<(), ApiError> {
        match resource {
            Resource::Employees => self.refresh_employees().await,
            Resource::Positions => self.refresh_positions().await,
            Resource::Tasks => self.refresh_tasks().await,
        }
    }

    /// Current employee snapshot; never triggers a fetch
    pub async fn employees(&self) -> Vec<Employee> {
        self.employees.read().await.records.clone()
    }

    /// Current position snapshot
    pub async fn positions(&self) -> Vec<Position> {
        self.positions.read().await.records.clone()
    }

    /// Current task snapshot
    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.records.clone()
    }

    pub async fn employees_state(&self) -> LoadState {
        self.employees.read().await.state
    }

    pub async fn positions_state(&self) -> LoadState {
        self.positions.read().await.state
    }

    pub async fn tasks_state(&self) -> LoadState {
        self.tasks.read().await.state
    }
}

impl<B: Backend + 'static> Store<B> {
    /// Trigger the initial load of all three collections, concurrently
    /// and with no ordering guarantee. Failures have already been
    /// reported through the provider's notification path.
    pub fn start(self: &Arc<Self>) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let _ = store.refresh_employees().await;
        });
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let _ = store.refresh_positions().await;
        });
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let _ = store.refresh_tasks().await;
        });
    }
}
