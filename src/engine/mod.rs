mod error;
mod mutations;
mod queries;
mod validate;

pub use error::EngineError;
pub use mutations::{CancelOutcome, Confirmation};
pub use validate::is_valid_date;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::limits::{MAX_ACTIVE_RESERVATIONS, MAX_TABLES};
use crate::model::*;

pub type SharedTableState = Arc<RwLock<TableState>>;

/// Owns the table inventory and the active reservations.
///
/// Locking: a table's write lock covers check-then-occupy and
/// check-then-release on that table. `reservations` is only locked while the
/// relevant table lock is already held (tables always before reservations),
/// so every change to the list happens together with its calendar change.
pub struct BookingRegistry {
    tables: Vec<SharedTableState>,
    /// Immutable identity per entry of `tables`, readable without locking.
    infos: Vec<TableInfo>,
    by_id: HashMap<TableId, usize>,
    /// Indices into `tables`: premium first, then ascending id.
    display_order: Vec<usize>,
    pub(super) reservations: Mutex<Vec<Reservation>>,
    reservation_cap: usize,
    window: OperatingWindow,
}

impl BookingRegistry {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let registry = Self::with_tables(config.window(), config.inventory())?;
        Ok(registry.with_reservation_cap(config.max_active_reservations))
    }

    /// Build a registry over an explicit inventory.
    pub fn with_tables(
        window: OperatingWindow,
        tables: impl IntoIterator<Item = (TableId, Category)>,
    ) -> Result<Self, EngineError> {
        window.validate()?;

        let mut states = Vec::new();
        let mut infos = Vec::new();
        let mut by_id = HashMap::new();
        for (id, category) in tables {
            if id == 0 {
                return Err(EngineError::InvalidConfig("table id 0 is reserved".into()));
            }
            if by_id.contains_key(&id) {
                return Err(EngineError::AlreadyExists(id));
            }
            if states.len() >= MAX_TABLES {
                return Err(EngineError::LimitExceeded("too many tables"));
            }
            by_id.insert(id, states.len());
            infos.push(TableInfo { id, category });
            states.push(Arc::new(RwLock::new(TableState::new(id, category, window))));
        }
        if states.is_empty() {
            return Err(EngineError::InvalidConfig("inventory is empty".into()));
        }

        let mut display_order: Vec<usize> = (0..infos.len()).collect();
        display_order.sort_by_key(|&i| (!infos[i].is_premium(), infos[i].id));

        info!("registry ready: {} tables, window {window}", states.len());
        metrics::gauge!(crate::observability::TABLES).set(states.len() as f64);

        Ok(Self {
            tables: states,
            infos,
            by_id,
            display_order,
            reservations: Mutex::new(Vec::new()),
            reservation_cap: MAX_ACTIVE_RESERVATIONS,
            window,
        })
    }

    /// Lower the number of reservations held at once. Clamped to
    /// `1..=MAX_ACTIVE_RESERVATIONS`.
    pub fn with_reservation_cap(mut self, cap: usize) -> Self {
        self.reservation_cap = cap.clamp(1, MAX_ACTIVE_RESERVATIONS);
        self
    }

    pub fn reservation_cap(&self) -> usize {
        self.reservation_cap
    }

    pub fn window(&self) -> OperatingWindow {
        self.window
    }

    pub fn get_table(&self, id: TableId) -> Option<SharedTableState> {
        self.by_id.get(&id).map(|&i| self.tables[i].clone())
    }

    /// Inventory in display order.
    pub fn tables(&self) -> Vec<TableInfo> {
        self.display_order.iter().map(|&i| self.infos[i]).collect()
    }

    /// First reservation (insertion order) matching folio, date and hour.
    pub(super) async fn lookup_reservation(
        &self,
        folio: &str,
        date: NaiveDate,
        hour: Hour,
    ) -> Option<Reservation> {
        let reservations = self.reservations.lock().await;
        reservations
            .iter()
            .find(|r| r.matches(folio, date, hour))
            .cloned()
    }
}

/// Inconsistencies are operator-visible; ordinary rejections are not.
pub(super) fn log_rejection(operation: &str, err: &EngineError) {
    match err {
        EngineError::InternalInconsistency(_) => warn!("{operation} failed: {err}"),
        _ => debug!("{operation} rejected: {err}"),
    }
}
