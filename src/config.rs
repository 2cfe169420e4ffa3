use crate::engine::EngineError;
use crate::limits::{MAX_ACTIVE_RESERVATIONS, MAX_TABLES};
use crate::model::{Category, Hour, OperatingWindow, TableId};

/// Operating window and inventory composition for one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub open_hour: Hour,
    /// Last bookable start hour (inclusive).
    pub close_hour: Hour,
    pub standard_tables: u32,
    pub premium_tables: u32,
    /// Cap on reservations held at once, at most `MAX_ACTIVE_RESERVATIONS`.
    pub max_active_reservations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            open_hour: 13,
            close_hour: 16,
            standard_tables: 5,
            premium_tables: 5,
            max_active_reservations: MAX_ACTIVE_RESERVATIONS,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// Read `TABLEBOOK_*` variables, falling back to defaults for anything
    /// unset or unparseable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            open_hour: env_or("TABLEBOOK_OPEN_HOUR", d.open_hour),
            close_hour: env_or("TABLEBOOK_CLOSE_HOUR", d.close_hour),
            standard_tables: env_or("TABLEBOOK_STANDARD_TABLES", d.standard_tables),
            premium_tables: env_or("TABLEBOOK_PREMIUM_TABLES", d.premium_tables),
            max_active_reservations: env_or(
                "TABLEBOOK_MAX_RESERVATIONS",
                d.max_active_reservations,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        OperatingWindow {
            open: self.open_hour,
            close: self.close_hour,
        }
        .validate()?;
        let total = self.standard_tables as usize + self.premium_tables as usize;
        if total == 0 {
            return Err(EngineError::InvalidConfig("inventory is empty".into()));
        }
        if total > MAX_TABLES {
            return Err(EngineError::LimitExceeded("too many tables"));
        }
        if self.max_active_reservations == 0 {
            return Err(EngineError::InvalidConfig(
                "reservation cap must be at least 1".into(),
            ));
        }
        if self.max_active_reservations > MAX_ACTIVE_RESERVATIONS {
            return Err(EngineError::LimitExceeded("reservation cap too large"));
        }
        Ok(())
    }

    pub fn window(&self) -> OperatingWindow {
        OperatingWindow::new(self.open_hour, self.close_hour)
    }

    /// Standard tables numbered from 1, premium tables continuing after them.
    pub fn inventory(&self) -> Vec<(TableId, Category)> {
        let standard = (1..=self.standard_tables).map(|id| (id, Category::Standard));
        let premium = (1..=self.premium_tables)
            .map(|n| (self.standard_tables + n, Category::Premium));
        standard.chain(premium).collect()
    }
}
