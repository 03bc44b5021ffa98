use sqlx::mysql::MySqlConnectOptions;

use crate::constants::{
    DEFAULT_FIELD_LIMIT, DEFAULT_HEALTH_CHECK_RETRIES, DEFAULT_MAX_CONNECTIONS, DEFAULT_TABLE,
};

/// Settings for the quote store, supplied by whatever hosts the plugin.
///
/// The database coordinates mirror the original deployment surface (host,
/// user, password, database name); the rest are knobs the store itself
/// grew: which table to use, the field width limit, whether key lookups
/// ignore case, and how hard to try reviving a dead connection.
#[derive(Clone, Debug)]
pub struct QuotesConfig {
    pub db_host: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    /// Table the quotes live in. Interpolated into SQL, so it is restricted
    /// to `[A-Za-z0-9_]+` when the store is constructed.
    pub table: String,
    pub field_limit: usize,
    /// Key lookups are case-sensitive by default; flip this to compare
    /// keys with `LOWER()` on both sides instead.
    pub case_insensitive: bool,
    pub health_check_retries: u32,
    pub max_connections: u32,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            db_host: "localhost".to_string(),
            db_user: "quotes".to_string(),
            db_pass: String::new(),
            db_name: "quotes".to_string(),
            table: DEFAULT_TABLE.to_string(),
            field_limit: DEFAULT_FIELD_LIMIT,
            case_insensitive: false,
            health_check_retries: DEFAULT_HEALTH_CHECK_RETRIES,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl QuotesConfig {
    /// Reads the database coordinates from the environment. `QUOTES_DB_PASS`
    /// is required; everything else falls back to the defaults above.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("QUOTES_DB_HOST") {
            config.db_host = host;
        }
        if let Ok(user) = std::env::var("QUOTES_DB_USER") {
            config.db_user = user;
        }
        if let Ok(name) = std::env::var("QUOTES_DB_NAME") {
            config.db_name = name;
        }
        if let Ok(table) = std::env::var("QUOTES_DB_TABLE") {
            config.table = table;
        }
        config.db_pass = std::env::var("QUOTES_DB_PASS").expect("missing QUOTES_DB_PASS");

        config
    }

    /// Connection options for the backing MySQL database. The charset is
    /// pinned to `utf8mb4` so multi-byte quotes round-trip intact.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .username(&self.db_user)
            .password(&self.db_pass)
            .database(&self.db_name)
            .charset("utf8mb4")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_schema() {
        let config = QuotesConfig::default();
        assert_eq!(config.table, "quotes");
        assert_eq!(config.field_limit, 96);
        assert!(!config.case_insensitive);
        assert_eq!(config.health_check_retries, 3);
    }
}
