use std::collections::HashSet;
use std::time::Instant;

use crate::model::*;
use crate::observability;

use super::validate::{check_hour, parse_date, require_present};
use super::{log_rejection, BookingRegistry, EngineError};

impl BookingRegistry {
    /// Per-table, per-hour status for `date`. Materializes the date on every
    /// table but never changes whether a slot is free.
    pub async fn list_availability(&self, date: &str) -> Result<AvailabilityReport, EngineError> {
        let started = Instant::now();
        let result = self.try_list_availability(date).await;
        observability::record_outcome(
            observability::AVAILABILITY_QUERIES_TOTAL,
            "availability",
            started,
            result.as_ref().err(),
        );
        if let Err(e) = &result {
            log_rejection("availability query", e);
        }
        result
    }

    async fn try_list_availability(&self, date: &str) -> Result<AvailabilityReport, EngineError> {
        let day = parse_date(date)?;

        let mut tables = Vec::with_capacity(self.display_order.len());
        for &i in &self.display_order {
            let mut guard = self.tables[i].write().await;
            tables.push(TableAvailability {
                table: guard.info(),
                hours: guard.hour_statuses(day),
            });
        }

        Ok(AvailabilityReport {
            date: day,
            window: self.window,
            tables,
        })
    }

    /// Run the cancellation checks and return the reservation they target,
    /// so a caller can ask for confirmation before cancelling.
    pub async fn find_reservation(
        &self,
        date: &str,
        hour: Hour,
        folio: &str,
    ) -> Result<Reservation, EngineError> {
        let folio = folio.trim();
        require_present(&[
            ("date", !date.trim().is_empty()),
            ("hour", hour != 0),
            ("folio", !folio.is_empty()),
        ])?;
        let day = parse_date(date)?;
        check_hour(hour, self.window)?;
        self.lookup_reservation(folio, day, hour)
            .await
            .ok_or_else(|| EngineError::ReservationNotFound {
                folio: folio.to_string(),
                date: day,
                hour,
            })
    }

    /// Snapshot of active reservations in insertion order.
    pub async fn list_reservations(&self) -> Vec<Reservation> {
        self.reservations.lock().await.clone()
    }

    pub async fn reservation_count(&self) -> usize {
        self.reservations.lock().await.len()
    }

    /// Check that occupied slots and active reservations correspond one to
    /// one. Takes every table lock (ascending id) and then the reservation
    /// lock, so it sees a consistent snapshot.
    pub async fn audit(&self) -> Result<(), EngineError> {
        let mut order: Vec<usize> = (0..self.tables.len()).collect();
        order.sort_by_key(|&i| self.infos[i].id);

        let mut guards = Vec::with_capacity(order.len());
        for &i in &order {
            guards.push(self.tables[i].read().await);
        }
        let reservations = self.reservations.lock().await;

        let mut booked = HashSet::new();
        for r in reservations.iter() {
            let slot = (r.table().id, r.date(), r.hour());
            if !booked.insert(slot) {
                return Err(EngineError::InternalInconsistency(format!(
                    "slot {slot:?} is held by more than one reservation"
                )));
            }
        }

        let mut occupied = HashSet::new();
        for guard in &guards {
            for (date, hour) in guard.calendar().occupied() {
                occupied.insert((guard.id, date, hour));
            }
        }

        if let Some(slot) = booked.difference(&occupied).next() {
            return Err(EngineError::InternalInconsistency(format!(
                "reservation for slot {slot:?} but the slot is free"
            )));
        }
        if let Some(slot) = occupied.difference(&booked).next() {
            return Err(EngineError::InternalInconsistency(format!(
                "slot {slot:?} is occupied without a reservation"
            )));
        }
        Ok(())
    }
}
