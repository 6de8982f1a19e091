//! Fixed-window rate-limit counters.
//!
//! Redis backs the counters when `REDIS_URL` is configured so that every
//! instance shares one window; otherwise they live in process memory.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outcome of counting one request against a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Requests seen in the current window, this one included
    pub count: u64,
    pub allowed: bool,
    /// Seconds until the window resets
    pub retry_after: u64,
}

impl RateLimitDecision {
    fn new(count: u64, permits: u64, retry_after: u64) -> Self {
        Self {
            count,
            allowed: count <= permits,
            retry_after,
        }
    }

    pub fn remaining(&self, permits: u64) -> u64 {
        permits.saturating_sub(self.count)
    }
}

/// Counter store consulted by the rate-limit middleware.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count a request for `key` and decide whether it is within `permits`.
    async fn check(&self, key: &str, permits: u64, window_seconds: u64)
        -> AppResult<RateLimitDecision>;
}

/// Redis-backed counters (`INCR` + window TTL)
#[derive(Clone)]
pub struct RedisRateLimiter {
    connection: ConnectionManager,
}

impl RedisRateLimiter {
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis rate limiter connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        key: &str,
        permits: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, key);
        let mut conn = self.connection.clone();

        let (count, ttl): (u64, i64) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .ttl(&key)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        // A key without a TTL opens the window, whether it is new or a
        // previous EXPIRE never landed
        if ttl < 0 {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        Ok(RateLimitDecision::new(
            count,
            permits,
            retry_after_from_ttl(ttl, window_seconds),
        ))
    }
}

/// Seconds left in a Redis window, given the key's `TTL` reply.
fn retry_after_from_ttl(ttl: i64, window_seconds: u64) -> u64 {
    if ttl > 0 {
        ttl as u64
    } else {
        window_seconds
    }
}

/// Per-process counters
#[derive(Default)]
pub struct InMemoryRateLimiter {
    counters: Mutex<Counters>,
}

#[derive(Default)]
struct Counters {
    windows: HashMap<String, Window>,
    last_sweep: Option<Instant>,
}

impl Counters {
    /// Drop closed windows, at most once per window length.
    fn sweep(&mut self, length: Duration, now: Instant) {
        let due = self
            .last_sweep
            .map_or(true, |last| now.duration_since(last) >= length);
        if due {
            self.windows
                .retain(|_, window| now.duration_since(window.started) < length);
            self.last_sweep = Some(now);
        }
    }
}

struct Window {
    started: Instant,
    count: u64,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn count_at(
        &self,
        key: &str,
        permits: u64,
        window_seconds: u64,
        now: Instant,
    ) -> AppResult<RateLimitDecision> {
        let length = Duration::from_secs(window_seconds);
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| AppError::internal("Rate limit state poisoned"))?;
        counters.sweep(length, now);

        let window = counters.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= length {
            window.started = now;
            window.count = 0;
        }
        window.count += 1;

        let elapsed = now.duration_since(window.started);
        let retry_after = length.saturating_sub(elapsed).as_secs().max(1);

        Ok(RateLimitDecision::new(window.count, permits, retry_after))
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(
        &self,
        key: &str,
        permits: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision> {
        self.count_at(key, permits, window_seconds, Instant::now())
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
