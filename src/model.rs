use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::EngineError;
use crate::limits::LAST_HOUR_OF_DAY;

/// Hour of day a one-hour slot starts at.
pub type Hour = u32;

/// Table number, assigned once when the inventory is built.
pub type TableId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Standard,
    Premium,
}

impl Category {
    /// Prefix used when deriving a reservation folio.
    pub fn folio_prefix(self) -> &'static str {
        match self {
            Category::Standard => "GX",
            Category::Premium => "VX",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Standard => "Standard",
            Category::Premium => "Premium",
        }
    }
}

/// Inclusive `[open, close]` range of bookable start hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingWindow {
    pub open: Hour,
    pub close: Hour,
}

impl OperatingWindow {
    pub fn new(open: Hour, close: Hour) -> Self {
        debug_assert!(open <= close, "window open must not be after close");
        Self { open, close }
    }

    pub fn contains(&self, hour: Hour) -> bool {
        self.open <= hour && hour <= self.close
    }

    pub fn hours(&self) -> RangeInclusive<Hour> {
        self.open..=self.close
    }

    /// Hour 0 is the "missing" sentinel for inputs, so it can never open a
    /// window; the last slot starts at 23:00.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.open == 0 {
            return Err(EngineError::InvalidConfig("open hour must be at least 1".into()));
        }
        if self.open > self.close {
            return Err(EngineError::InvalidConfig(format!(
                "open hour {} is after close hour {}",
                self.open, self.close
            )));
        }
        if self.close > LAST_HOUR_OF_DAY {
            return Err(EngineError::InvalidConfig(format!(
                "close hour {} is past {LAST_HOUR_OF_DAY}",
                self.close
            )));
        }
        Ok(())
    }
}

impl Default for OperatingWindow {
    fn default() -> Self {
        Self::new(13, 16)
    }
}

impl fmt::Display for OperatingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00-{}:00", self.open, self.close)
    }
}

// ── Slot calendar ────────────────────────────────────────────────

/// Per-date map of hour → free. A date that was never touched counts as
/// entirely free; the first access materializes every hour of the window.
#[derive(Debug, Clone, Default)]
pub struct SlotCalendar {
    days: BTreeMap<NaiveDate, BTreeMap<Hour, bool>>,
}

impl SlotCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize `date` with every hour of `window` free. Idempotent.
    pub fn ensure_date(&mut self, date: NaiveDate, window: OperatingWindow) {
        self.days
            .entry(date)
            .or_insert_with(|| window.hours().map(|h| (h, true)).collect());
    }

    pub fn is_free(&mut self, date: NaiveDate, hour: Hour, window: OperatingWindow) -> bool {
        self.ensure_date(date, window);
        self.days
            .get(&date)
            .and_then(|hours| hours.get(&hour))
            .copied()
            .unwrap_or(true)
    }

    /// Mark a free in-window hour as occupied. Returns false (and changes
    /// nothing) if the hour is already occupied or outside the window.
    pub fn occupy(&mut self, date: NaiveDate, hour: Hour, window: OperatingWindow) -> bool {
        self.ensure_date(date, window);
        match self.days.get_mut(&date).and_then(|hours| hours.get_mut(&hour)) {
            Some(free) if *free => {
                *free = false;
                true
            }
            _ => false,
        }
    }

    /// Mark an hour free again. Never materializes `date`.
    pub fn release(&mut self, date: NaiveDate, hour: Hour) -> bool {
        match self.days.get_mut(&date).and_then(|hours| hours.get_mut(&hour)) {
            Some(free) => {
                *free = true;
                true
            }
            None => false,
        }
    }

    pub fn is_materialized(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Hour states for a materialized date, ascending by hour.
    pub fn hours(&self, date: NaiveDate) -> impl Iterator<Item = (Hour, bool)> + '_ {
        self.days
            .get(&date)
            .into_iter()
            .flat_map(|hours| hours.iter().map(|(h, free)| (*h, *free)))
    }

    /// Every occupied `(date, hour)` across all materialized dates.
    pub fn occupied(&self) -> impl Iterator<Item = (NaiveDate, Hour)> + '_ {
        self.days.iter().flat_map(|(date, hours)| {
            hours
                .iter()
                .filter(|(_, free)| !**free)
                .map(move |(h, _)| (*date, *h))
        })
    }
}

// ── Tables ───────────────────────────────────────────────────────

/// Immutable identity of a table, cheap to copy out from under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableInfo {
    pub id: TableId,
    pub category: Category,
}

impl TableInfo {
    pub fn is_premium(&self) -> bool {
        self.category == Category::Premium
    }
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table {} ({})", self.id, self.category.label())
    }
}

#[derive(Debug, Clone)]
pub struct TableState {
    pub id: TableId,
    pub category: Category,
    window: OperatingWindow,
    calendar: SlotCalendar,
}

impl TableState {
    pub fn new(id: TableId, category: Category, window: OperatingWindow) -> Self {
        Self {
            id,
            category,
            window,
            calendar: SlotCalendar::new(),
        }
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            id: self.id,
            category: self.category,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.category == Category::Premium
    }

    pub fn ensure_date(&mut self, date: NaiveDate) {
        self.calendar.ensure_date(date, self.window);
    }

    pub fn is_free(&mut self, date: NaiveDate, hour: Hour) -> bool {
        self.calendar.is_free(date, hour, self.window)
    }

    pub fn occupy(&mut self, date: NaiveDate, hour: Hour) -> bool {
        self.calendar.occupy(date, hour, self.window)
    }

    pub fn release(&mut self, date: NaiveDate, hour: Hour) -> bool {
        self.calendar.release(date, hour)
    }

    /// Materialize `date` and report every hour of the window.
    pub fn hour_statuses(&mut self, date: NaiveDate) -> Vec<HourStatus> {
        self.ensure_date(date);
        self.calendar
            .hours(date)
            .map(|(hour, free)| HourStatus { hour, free })
            .collect()
    }

    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }
}

// ── Reservations ─────────────────────────────────────────────────

/// A booked slot. Fields are fixed at construction; cancelling removes the
/// record rather than changing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    customer_name: String,
    date: NaiveDate,
    hour: Hour,
    table: TableInfo,
    folio: String,
}

impl Reservation {
    pub fn new(customer_name: String, date: NaiveDate, hour: Hour, table: TableInfo) -> Self {
        let folio = derive_folio(table);
        Self {
            customer_name,
            date,
            hour,
            table,
            folio,
        }
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }

    pub fn table(&self) -> TableInfo {
        self.table
    }

    /// `GX<id>` for standard tables, `VX<id>` for premium ones. Only unique
    /// together with date and hour.
    pub fn folio(&self) -> &str {
        &self.folio
    }

    pub fn matches(&self, folio: &str, date: NaiveDate, hour: Hour) -> bool {
        self.folio == folio && self.date == date && self.hour == hour
    }
}

pub fn derive_folio(table: TableInfo) -> String {
    format!("{}{}", table.category.folio_prefix(), table.id)
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation for {} at {} on {} at {}:00, folio {}",
            self.customer_name, self.table, self.date, self.hour, self.folio
        )
    }
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourStatus {
    pub hour: Hour,
    pub free: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAvailability {
    pub table: TableInfo,
    pub hours: Vec<HourStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub date: NaiveDate,
    pub window: OperatingWindow,
    /// Premium tables first, then ascending id.
    pub tables: Vec<TableAvailability>,
}

impl AvailabilityReport {
    pub fn table(&self, id: TableId) -> Option<&TableAvailability> {
        self.tables.iter().find(|t| t.table.id == id)
    }

    pub fn is_free(&self, id: TableId, hour: Hour) -> Option<bool> {
        self.table(id)?
            .hours
            .iter()
            .find(|s| s.hour == hour)
            .map(|s| s.free)
    }
}
