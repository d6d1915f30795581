//! Time-boxed cache for the rendered catalog report.
//!
//! Holds one value and refills it when it is older than the expiry window
//! or a refresh is forced.
//!
//! The lock is held across the refill, so concurrent callers that observe a
//! stale entry wait for one producer instead of racing several.

use chrono::{DateTime, TimeDelta, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The cached value and when it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: String,
    pub produced_at: DateTime<Utc>,
}

pub struct DataCache {
    expiry: TimeDelta,
    entry: Mutex<Option<CacheEntry>>,
}

impl DataCache {
    pub fn new(expiry: Duration) -> Self {
        Self {
            expiry: TimeDelta::from_std(expiry).unwrap_or(TimeDelta::MAX),
            entry: Mutex::new(None),
        }
    }

    /// Return the cached value, refilling it with `produce` when needed.
    ///
    /// A failing `produce` leaves the previous entry untouched (neither
    /// replaced nor refreshed) and its error is returned to the caller.
    pub async fn get<F, Fut, E>(&self, force_refresh: bool, produce: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        self.get_at(force_refresh, Utc::now(), produce).await
    }

    /// [`get`](Self::get) with an explicit clock reading.
    pub async fn get_at<F, Fut, E>(
        &self,
        force_refresh: bool,
        now: DateTime<Utc>,
        produce: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let mut entry = self.entry.lock().await;

        if !force_refresh {
            if let Some(cached) = entry.as_ref() {
                if now - cached.produced_at < self.expiry {
                    debug!(age_secs = (now - cached.produced_at).num_seconds(), "Using cached report");
                    return Ok(cached.value.clone());
                }
            }
        }

        let value = produce().await?;
        *entry = Some(CacheEntry {
            value: value.clone(),
            produced_at: now,
        });
        info!(chars = value.len(), forced = force_refresh, "Report refreshed and cached");
        Ok(value)
    }

    /// The last produced value, however old.
    pub async fn stale(&self) -> Option<String> {
        self.entry.lock().await.as_ref().map(|e| e.value.clone())
    }

    /// Drop the cached value.
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }
}
