use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};

use crate::config::QuotesConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::quotes::QuoteRecord;

/// What happened to an `add`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An active quote with this key already exists; nothing was written.
    AlreadyExists,
}

/// Access to the quotes table.
///
/// Owns its connection pool and is handed to callers explicitly; there is
/// no process-global session. At most one *active* row per key exists at
/// any time, enforced by a unique index on a generated column that is NULL
/// for soft-deleted rows, so a concurrent double-add resolves to exactly
/// one `Added` and one `AlreadyExists`.
#[derive(Clone, Debug)]
pub struct QuoteStore {
    pool: Pool<MySql>,
    table: String,
    field_limit: usize,
    case_insensitive: bool,
    health_check_retries: u32,
}

impl QuoteStore {
    /// Connects a new pool and wraps it.
    pub async fn connect(config: &QuotesConfig) -> StoreResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await
            .map_err(StoreError::Unavailable)?;

        Self::from_pool(pool, config)
    }

    /// Wraps an existing pool. Used by tests and by hosts that manage their
    /// own pool lifecycle.
    pub fn from_pool(pool: Pool<MySql>, config: &QuotesConfig) -> StoreResult<Self> {
        validate_table(&config.table)?;

        Ok(Self {
            pool,
            table: config.table.clone(),
            field_limit: config.field_limit,
            case_insensitive: config.case_insensitive,
            health_check_retries: config.health_check_retries,
        })
    }

    /// Applies the bundled migrations. Only creates the default `quotes`
    /// table; deployments using another table name provision it themselves.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(sqlx::Error::Migrate(Box::new(e))))
    }

    /// Inserts a quote unless an active one with the same key exists.
    ///
    /// All three fields are checked against the configured width before the
    /// database is touched. The insert itself is a single statement; the
    /// existence check rides on the unique active-key index, so two racing
    /// adds for the same key can never both report `Added`.
    #[tracing::instrument(skip(self))]
    pub async fn add(&self, key: &str, value: &str, author: &str) -> StoreResult<AddOutcome> {
        self.check_len("key", key)?;
        self.check_len("value", value)?;
        self.check_len("author", author)?;
        self.ensure_live().await?;

        let sql = format!(
            "INSERT INTO {} (`key`, value, author, active) VALUES (?, ?, ?, TRUE)",
            self.table
        );

        let mut retried = false;
        loop {
            match sqlx::query(&sql)
                .bind(key)
                .bind(value)
                .bind(author)
                .execute(&self.pool)
                .await
            {
                Ok(_) => return Ok(AddOutcome::Added),
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    return Ok(AddOutcome::AlreadyExists);
                }
                Err(e) if !retried && StoreError::is_connection_error(&e) => {
                    tracing::warn!(err = ?e, "lost connection mid-insert, reconnecting");
                    retried = true;
                    self.ensure_live().await?;
                }
                Err(e) => return Err(StoreError::Unavailable(e)),
            }
        }
    }

    /// Soft-deletes every active quote with this key and returns how many
    /// rows were flipped. Zero means the key was not active; calling twice
    /// in a row always yields zero the second time.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> StoreResult<u64> {
        self.ensure_live().await?;

        let sql = format!(
            "UPDATE {} SET active = FALSE WHERE {} AND active",
            self.table,
            self.key_predicate()
        );

        let mut retried = false;
        loop {
            match sqlx::query(&sql).bind(key).execute(&self.pool).await {
                Ok(res) => return Ok(res.rows_affected()),
                Err(e) if !retried && StoreError::is_connection_error(&e) => {
                    tracing::warn!(err = ?e, "lost connection mid-update, reconnecting");
                    retried = true;
                    self.ensure_live().await?;
                }
                Err(e) => return Err(StoreError::Unavailable(e)),
            }
        }
    }

    /// Picks one active quote uniformly at random. `None` when the table
    /// has no active quotes.
    #[tracing::instrument(skip(self))]
    pub async fn random(&self) -> StoreResult<Option<QuoteRecord>> {
        self.ensure_live().await?;

        let sql = format!(
            "SELECT id, `key`, value, author, active FROM {} \
             WHERE active ORDER BY RAND() LIMIT 1",
            self.table
        );

        let mut retried = false;
        loop {
            match sqlx::query_as::<_, QuoteRecord>(&sql)
                .fetch_optional(&self.pool)
                .await
            {
                Ok(record) => return Ok(record),
                Err(e) if !retried && StoreError::is_connection_error(&e) => {
                    tracing::warn!(err = ?e, "lost connection mid-select, reconnecting");
                    retried = true;
                    self.ensure_live().await?;
                }
                Err(e) => return Err(StoreError::Unavailable(e)),
            }
        }
    }

    /// Exact-match lookup among active quotes.
    ///
    /// The store's own invariant means at most one row can match. If more
    /// than one ever does (a bypassed add), the newest wins and the
    /// violation is logged rather than crashing anything.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, key: &str) -> StoreResult<Option<QuoteRecord>> {
        self.ensure_live().await?;

        let sql = format!(
            "SELECT id, `key`, value, author, active FROM {} \
             WHERE {} AND active ORDER BY id DESC LIMIT 2",
            self.table,
            self.key_predicate()
        );

        let mut retried = false;
        loop {
            match sqlx::query_as::<_, QuoteRecord>(&sql)
                .bind(key)
                .fetch_all(&self.pool)
                .await
            {
                Ok(rows) => {
                    if rows.len() > 1 {
                        tracing::warn!(
                            key,
                            "more than one active quote for key, returning the newest"
                        );
                    }
                    return Ok(rows.into_iter().next());
                }
                Err(e) if !retried && StoreError::is_connection_error(&e) => {
                    tracing::warn!(err = ?e, "lost connection mid-select, reconnecting");
                    retried = true;
                    self.ensure_live().await?;
                }
                Err(e) => return Err(StoreError::Unavailable(e)),
            }
        }
    }

    /// Returns the keys of all active quotes matching a SQL `LIKE` pattern
    /// (`%` and `_` wildcards), in storage order. The pattern is used as
    /// supplied; glob-to-LIKE translation is the caller's business.
    #[tracing::instrument(skip(self))]
    pub async fn match_keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.ensure_live().await?;

        let sql = format!(
            "SELECT `key` FROM {} WHERE {} AND active ORDER BY id",
            self.table,
            self.like_predicate()
        );

        let mut retried = false;
        loop {
            match sqlx::query_scalar::<_, String>(&sql)
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
            {
                Ok(keys) => return Ok(keys),
                Err(e) if !retried && StoreError::is_connection_error(&e) => {
                    tracing::warn!(err = ?e, "lost connection mid-select, reconnecting");
                    retried = true;
                    self.ensure_live().await?;
                }
                Err(e) => return Err(StoreError::Unavailable(e)),
            }
        }
    }

    /// Pings the pool with `SELECT 1`, retrying up to the configured bound.
    /// A stale pooled connection gets dropped and replaced by the ping
    /// itself, so surviving this means the next statement has a live
    /// connection to run on.
    async fn ensure_live(&self) -> StoreResult<()> {
        let mut last = None;

        for attempt in 0..self.health_check_retries {
            match sqlx::query("SELECT 1").execute(&self.pool).await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::warn!(err = ?e, attempt, "database ping failed");
                    last = Some(e);
                }
            }
        }

        Err(StoreError::Unavailable(
            last.unwrap_or(sqlx::Error::PoolClosed),
        ))
    }

    fn check_len(&self, field: &'static str, text: &str) -> StoreResult<()> {
        let len = text.chars().count();
        if len > self.field_limit {
            return Err(StoreError::Validation {
                field,
                len,
                limit: self.field_limit,
            });
        }
        Ok(())
    }

    fn key_predicate(&self) -> &'static str {
        if self.case_insensitive {
            "LOWER(`key`) = LOWER(?)"
        } else {
            "`key` = ?"
        }
    }

    fn like_predicate(&self) -> &'static str {
        if self.case_insensitive {
            "LOWER(`key`) LIKE LOWER(?)"
        } else {
            "`key` LIKE ?"
        }
    }
}

/// The table name is spliced into SQL text, so only identifier characters
/// are allowed through.
fn validate_table(name: &str) -> StoreResult<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(name.to_string()))
    }
}
