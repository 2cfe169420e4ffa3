/// Upper bound on the table inventory of one registry.
pub const MAX_TABLES: usize = 1_000;

/// Maximum byte length of a customer name on a reservation.
pub const MAX_CUSTOMER_NAME_LEN: usize = 128;

/// Maximum number of reservations held by one registry at any time.
pub const MAX_ACTIVE_RESERVATIONS: usize = 1_000_000;

/// Last hour a slot may start at (the 23:00-24:00 slot).
pub const LAST_HOUR_OF_DAY: u32 = 23;
