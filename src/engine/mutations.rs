use std::time::Instant;

use tracing::info;

use crate::model::*;
use crate::observability;

use super::validate::{check_customer_name, check_hour, parse_date, require_present};
use super::{log_rejection, BookingRegistry, EngineError};

/// Decision from whoever confirms a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The reservation was removed and its slot released.
    Removed(Reservation),
    /// The user declined; nothing changed.
    Declined(Reservation),
}

impl BookingRegistry {
    /// Book one hour on one table.
    ///
    /// Checks run in a fixed order and stop at the first failure: missing
    /// inputs, date format, hour window, table existence, slot availability.
    pub async fn book_table(
        &self,
        customer_name: &str,
        date: &str,
        hour: Hour,
        table_id: TableId,
    ) -> Result<Reservation, EngineError> {
        let started = Instant::now();
        let result = self.try_book(customer_name, date, hour, table_id).await;
        observability::record_outcome(
            observability::BOOKINGS_TOTAL,
            "book",
            started,
            result.as_ref().err(),
        );
        if let Err(e) = &result {
            log_rejection("booking", e);
        }
        result
    }

    async fn try_book(
        &self,
        customer_name: &str,
        date: &str,
        hour: Hour,
        table_id: TableId,
    ) -> Result<Reservation, EngineError> {
        let customer_name = customer_name.trim();
        require_present(&[
            ("customer_name", !customer_name.is_empty()),
            ("date", !date.trim().is_empty()),
            ("hour", hour != 0),
            ("table", table_id != 0),
        ])?;
        check_customer_name(customer_name)?;
        let day = parse_date(date)?;
        check_hour(hour, self.window)?;
        let table = self
            .get_table(table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;

        let mut guard = table.write().await;
        if !guard.is_free(day, hour) {
            return Err(EngineError::SlotUnavailable {
                table_id,
                date: day,
                hour,
            });
        }

        let mut reservations = self.reservations.lock().await;
        if reservations.len() >= self.reservation_cap {
            return Err(EngineError::LimitExceeded("too many active reservations"));
        }
        if !guard.occupy(day, hour) {
            return Err(EngineError::InternalInconsistency(format!(
                "table {table_id} on {day} at {hour}:00 was free but could not be occupied"
            )));
        }
        let reservation = Reservation::new(customer_name.to_string(), day, hour, guard.info());
        reservations.push(reservation.clone());
        metrics::gauge!(observability::RESERVATIONS_ACTIVE).set(reservations.len() as f64);

        info!(
            "booked {} for {} on {day} at {hour}:00",
            reservation.folio(),
            reservation.customer_name()
        );
        Ok(reservation)
    }

    /// Cancel the reservation identified by folio, date and hour.
    ///
    /// All checks run before `decision` is looked at, so a declined request
    /// still reports invalid input or a missing reservation.
    pub async fn cancel_reservation(
        &self,
        date: &str,
        hour: Hour,
        folio: &str,
        decision: Confirmation,
    ) -> Result<CancelOutcome, EngineError> {
        let started = Instant::now();
        let result = self.try_cancel(date, hour, folio, decision).await;
        observability::record_outcome(
            observability::CANCELLATIONS_TOTAL,
            "cancel",
            started,
            result.as_ref().err(),
        );
        if let Err(e) = &result {
            log_rejection("cancellation", e);
        }
        result
    }

    async fn try_cancel(
        &self,
        date: &str,
        hour: Hour,
        folio: &str,
        decision: Confirmation,
    ) -> Result<CancelOutcome, EngineError> {
        let found = self.find_reservation(date, hour, folio).await?;
        if decision == Confirmation::Declined {
            info!("cancellation of {} declined", found.folio());
            return Ok(CancelOutcome::Declined(found));
        }

        let (day, folio) = (found.date(), found.folio());
        let table = self.get_table(found.table().id).ok_or_else(|| {
            EngineError::InternalInconsistency(format!(
                "reservation {folio} references unknown table {}",
                found.table().id
            ))
        })?;

        let mut guard = table.write().await;
        let mut reservations = self.reservations.lock().await;
        // It may have been cancelled while we waited for the confirmation.
        let pos = reservations
            .iter()
            .position(|r| r.matches(folio, day, hour))
            .ok_or_else(|| EngineError::ReservationNotFound {
                folio: folio.to_string(),
                date: day,
                hour,
            })?;
        if !guard.release(day, hour) {
            return Err(EngineError::InternalInconsistency(format!(
                "reservation {folio} on {day} at {hour}:00 has no slot to release"
            )));
        }
        let removed = reservations.remove(pos);
        metrics::gauge!(observability::RESERVATIONS_ACTIVE).set(reservations.len() as f64);

        info!(
            "cancelled {} for {} on {day} at {hour}:00",
            removed.folio(),
            removed.customer_name()
        );
        Ok(CancelOutcome::Removed(removed))
    }
}
