/// Width of the `key`, `value` and `author` columns.
pub const DEFAULT_FIELD_LIMIT: usize = 96;

pub const DEFAULT_TABLE: &str = "quotes";

/// How many times a dead connection is re-pinged before an operation gives
/// up with `StoreError::Unavailable`.
pub const DEFAULT_HEALTH_CHECK_RETRIES: u32 = 3;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
