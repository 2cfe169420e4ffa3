use chrono::NaiveDate;

use crate::model::{Hour, OperatingWindow, TableId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Names of the inputs that were empty or zero.
    MissingFields(Vec<&'static str>),
    InvalidDateFormat(String),
    /// Signed so that out-of-range console input can be reported as typed.
    InvalidHour {
        hour: i64,
        window: OperatingWindow,
    },
    TableNotFound(TableId),
    SlotUnavailable {
        table_id: TableId,
        date: NaiveDate,
        hour: Hour,
    },
    ReservationNotFound {
        folio: String,
        date: NaiveDate,
        hour: Hour,
    },
    /// Calendar and reservation list disagree. Always a defect.
    InternalInconsistency(String),
    AlreadyExists(TableId),
    InvalidConfig(String),
    LimitExceeded(&'static str),
}

impl EngineError {
    /// Short stable code for metrics labels and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EngineError::MissingFields(_) => "missing_fields",
            EngineError::InvalidDateFormat(_) => "invalid_date_format",
            EngineError::InvalidHour { .. } => "invalid_hour",
            EngineError::TableNotFound(_) => "table_not_found",
            EngineError::SlotUnavailable { .. } => "slot_unavailable",
            EngineError::ReservationNotFound { .. } => "reservation_not_found",
            EngineError::InternalInconsistency(_) => "internal_inconsistency",
            EngineError::AlreadyExists(_) => "already_exists",
            EngineError::InvalidConfig(_) => "invalid_config",
            EngineError::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            EngineError::InvalidDateFormat(input) => {
                write!(f, "invalid date {input:?}: expected YYYY-MM-DD")
            }
            EngineError::InvalidHour { hour, window } => {
                write!(f, "invalid hour {hour}: bookings run {window}")
            }
            EngineError::TableNotFound(id) => write!(f, "table {id} not found"),
            EngineError::SlotUnavailable {
                table_id,
                date,
                hour,
            } => write!(f, "table {table_id} is not available on {date} at {hour}:00"),
            EngineError::ReservationNotFound { folio, date, hour } => {
                write!(f, "no reservation with folio {folio:?} on {date} at {hour}:00")
            }
            EngineError::InternalInconsistency(msg) => write!(f, "internal inconsistency: {msg}"),
            EngineError::AlreadyExists(id) => write!(f, "table {id} already exists"),
            EngineError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
