use chrono::NaiveDate;

use crate::limits::MAX_CUSTOMER_NAME_LEN;
use crate::model::{Hour, OperatingWindow};

use super::EngineError;

/// True for exactly `YYYY-MM-DD` naming a real calendar day.
pub fn is_valid_date(input: &str) -> bool {
    parse_strict(input).is_some()
}

fn parse_strict(input: &str) -> Option<NaiveDate> {
    // chrono alone accepts unpadded fields and signed years
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, EngineError> {
    parse_strict(input).ok_or_else(|| EngineError::InvalidDateFormat(input.to_string()))
}

pub(crate) fn check_hour(hour: Hour, window: OperatingWindow) -> Result<(), EngineError> {
    if window.contains(hour) {
        Ok(())
    } else {
        Err(EngineError::InvalidHour {
            hour: i64::from(hour),
            window,
        })
    }
}

pub(crate) fn require_present(fields: &[(&'static str, bool)]) -> Result<(), EngineError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EngineError::MissingFields(missing))
    }
}

pub(crate) fn check_customer_name(name: &str) -> Result<(), EngineError> {
    if name.len() > MAX_CUSTOMER_NAME_LEN {
        return Err(EngineError::LimitExceeded("customer name too long"));
    }
    Ok(())
}
