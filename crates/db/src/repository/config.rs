//! Store configuration and connection with bounded retries.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use burger_core::{AppError, AppResult};
use tracing::{info, warn};

use super::MongoStore;

/// Document store configuration.
#[derive(Debug, Clone)]
#[must_use]
pub struct StoreConfig {
    pub uri: String,
    pub db_name: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub server_selection_timeout: Duration,
}

impl StoreConfig {
    /// Default database name.
    pub const DEFAULT_DB_NAME: &'static str = "burgerDB";
    /// Default number of connection attempts.
    pub const DEFAULT_MAX_RETRIES: u32 = 5;
    /// Default delay between attempts.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(4000);
    /// Default per-attempt server selection timeout.
    pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(15000);

    /// Creates a configuration from a URI with default settings.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            db_name: Self::DEFAULT_DB_NAME.to_string(),
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
            server_selection_timeout: Self::DEFAULT_SERVER_SELECTION_TIMEOUT,
        }
    }
}

/// Connect to the store, retrying up to `max_retries` times, then ensure indexes.
///
/// # Errors
/// Returns `AppError::Internal` once every attempt has failed or index
/// creation fails.
pub async fn connect(config: &StoreConfig) -> AppResult<MongoStore> {
    let store = retry_with_delay(config.max_retries, config.retry_delay, |attempt| async move {
        info!(attempt, db = %config.db_name, "Connecting to document store");
        MongoStore::connect(config).await
    })
    .await
    .map_err(|e| AppError::Internal(format!("Store connection failed: {e}")))?;

    store.ensure_indexes().await?;
    info!(db = %config.db_name, "Document store connected");

    Ok(store)
}

/// Run `op` until it succeeds or `max_attempts` (at least one) have failed,
/// sleeping `delay` between attempts. The attempt number starts at 1.
///
/// # Errors
/// Returns the error of the last attempt.
pub async fn retry_with_delay<T, E, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %e, "Attempt failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn retry_stops_on_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> =
            retry_with_delay(5, Duration::from_millis(1), |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(format!("attempt {attempt}"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_delay(4, Duration::from_millis(1), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("attempt {attempt}")) }
        })
        .await;

        assert_eq!(result, Err("attempt 4".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let _: Result<(), String> = retry_with_delay(0, Duration::from_millis(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn defaults_match_deployment_settings() {
        let config = StoreConfig::from_uri("mongodb://localhost:27017");
        assert_eq!(config.db_name, "burgerDB");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(4000));
        assert_eq!(config.server_selection_timeout, Duration::from_millis(15000));
    }
}
