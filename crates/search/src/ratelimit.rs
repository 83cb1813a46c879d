//! Quota enforcement over a shared counter store.
//!
//! Two strategies are offered: a fixed window (one counter per aligned
//! time bucket, cheap but bursty at bucket edges) and a sliding window
//! (sorted set of request timestamps, smooth but one store round-trip
//! more expensive). Both fail open: when the store is unreachable the
//! request is allowed and the failure is logged, so a degraded store
//! never takes search traffic down with it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::core::CounterStore;
use crate::error::StoreResult;

/// One hour, the default quota window for authenticated traffic.
pub const HOUR: Duration = Duration::from_secs(3600);

/// Login attempts: 5 per 15 minutes.
pub const LOGIN_ATTEMPT_LIMIT: u64 = 5;
pub const LOGIN_ATTEMPT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Password resets: 3 per hour.
pub const PASSWORD_RESET_LIMIT: u64 = 3;
pub const PASSWORD_RESET_WINDOW: Duration = HOUR;

/// Identifier classes that can be temporarily blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    User,
    Ip,
    Session,
}

impl BlockKind {
    fn as_str(&self) -> &'static str {
        match self {
            BlockKind::User => "user",
            BlockKind::Ip => "ip",
            BlockKind::Session => "session",
        }
    }
}

/// Outcome of a quota check.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when denied).
    pub remaining: u64,
    /// When the current window ends and the quota refills.
    pub reset_time: DateTime<Utc>,
    /// Requests counted in the current window, including this one when it
    /// was admitted.
    pub current: u64,
}

/// Rate limiter over a [`CounterStore`].
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Quota key for an authenticated user.
    pub fn user_key(user_id: &str) -> String {
        format!("rate_limit:user:{user_id}")
    }

    /// Quota key for an API key.
    pub fn api_key_key(api_key_id: &str) -> String {
        format!("rate_limit:api_key:{api_key_id}")
    }

    /// Quota key for anonymous traffic, by client address.
    pub fn ip_key(ip: &str) -> String {
        format!("rate_limit:ip:{ip}")
    }

    /// Quota key for login attempts on an account.
    pub fn login_key(identifier: &str) -> String {
        format!("rate_limit:login_attempts:{identifier}")
    }

    /// Quota key for password reset requests on an account.
    pub fn password_reset_key(identifier: &str) -> String {
        format!("rate_limit:password_reset:{identifier}")
    }

    /// Fixed-window check: one counter per aligned window bucket.
    pub async fn check_fixed_window(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> RateLimitDecision {
        self.fixed_window_at(key, limit, window, Utc::now().timestamp_millis())
            .await
    }

    /// Sliding-window check: prune expired entries, count, admit if under
    /// the limit.
    pub async fn check_sliding_window(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> RateLimitDecision {
        self.sliding_window_at(key, limit, window, Utc::now().timestamp_millis())
            .await
    }

    async fn fixed_window_at(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
        now_ms: i64,
    ) -> RateLimitDecision {
        let window_ms = (window.as_millis() as i64).max(1);
        let bucket = now_ms.div_euclid(window_ms);
        let bucket_key = format!("{key}:{bucket}");
        let reset_time = millis_to_datetime((bucket + 1) * window_ms);

        match self.fixed_window_count(&bucket_key, window).await {
            Ok(current) => RateLimitDecision {
                allowed: current <= limit,
                remaining: limit.saturating_sub(current),
                reset_time,
                current,
            },
            Err(error) => {
                tracing::warn!(%key, %error, "counter store unavailable, allowing request");
                RateLimitDecision {
                    allowed: true,
                    remaining: limit,
                    reset_time,
                    current: 0,
                }
            }
        }
    }

    async fn fixed_window_count(&self, bucket_key: &str, window: Duration) -> StoreResult<u64> {
        let current = self.store.increment(bucket_key).await?;
        if current == 1 {
            // New bucket, give it a lifetime of one window
            self.store
                .expire(bucket_key, window.as_secs().max(1))
                .await?;
        }
        Ok(current)
    }

    async fn sliding_window_at(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
        now_ms: i64,
    ) -> RateLimitDecision {
        let window_ms = window.as_millis() as i64;
        let reset_time = millis_to_datetime(now_ms + window_ms);

        match self.sliding_window_count(key, limit, window, now_ms).await {
            Ok((allowed, count)) => RateLimitDecision {
                allowed,
                remaining: if allowed {
                    limit.saturating_sub(count + 1)
                } else {
                    0
                },
                reset_time,
                current: if allowed { count + 1 } else { count },
            },
            Err(error) => {
                tracing::warn!(%key, %error, "counter store unavailable, allowing request");
                RateLimitDecision {
                    allowed: true,
                    remaining: limit,
                    reset_time,
                    current: 0,
                }
            }
        }
    }

    async fn sliding_window_count(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
        now_ms: i64,
    ) -> StoreResult<(bool, u64)> {
        let window_ms = window.as_millis() as i64;
        self.store.prune_set(key, now_ms - window_ms).await?;
        let count = self.store.set_len(key).await?;
        if count >= limit {
            return Ok((false, count));
        }
        let member = format!("{now_ms}-{}", Uuid::new_v4());
        self.store.add_to_set(key, now_ms, &member).await?;
        self.store.expire(key, window.as_secs().max(1)).await?;
        Ok((true, count))
    }

    /// Drop all window state for a key (admin reset). Returns the number
    /// of fixed-window buckets removed.
    pub async fn reset(&self, key: &str) -> StoreResult<u64> {
        let removed = self.store.delete_matching(&format!("{key}:")).await?;
        // Sliding-window sets live at the bare key, outside the bucket prefix
        self.store.delete(key).await?;
        Ok(removed)
    }

    /// Remaining quota in the current fixed window without consuming any.
    pub async fn remaining(&self, key: &str, limit: u64, window: Duration) -> StoreResult<u64> {
        let window_ms = (window.as_millis() as i64).max(1);
        let bucket = Utc::now().timestamp_millis().div_euclid(window_ms);
        let current = self
            .store
            .get_count(&format!("{key}:{bucket}"))
            .await?
            .unwrap_or(0);
        Ok(limit.saturating_sub(current))
    }

    /// Temporarily block an identifier for `duration`.
    pub async fn block(
        &self,
        kind: BlockKind,
        id: &str,
        reason: &str,
        duration: Duration,
    ) -> StoreResult<()> {
        tracing::warn!(kind = kind.as_str(), %id, %reason, "blocking identifier");
        self.store
            .set_value(&block_key(kind, id), reason, duration.as_secs().max(1))
            .await
    }

    /// Whether an identifier is currently blocked. Fails open: a store
    /// error reports not-blocked.
    pub async fn is_blocked(&self, kind: BlockKind, id: &str) -> bool {
        match self.store.get_value(&block_key(kind, id)).await {
            Ok(value) => value.is_some(),
            Err(error) => {
                tracing::warn!(%id, %error, "counter store unavailable, treating as not blocked");
                false
            }
        }
    }

    /// Lift a block before its TTL expires.
    pub async fn unblock(&self, kind: BlockKind, id: &str) -> StoreResult<()> {
        self.store.delete(&block_key(kind, id)).await
    }
}

fn block_key(kind: BlockKind, id: &str) -> String {
    format!("blocked:{}:{id}", kind.as_str())
}

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    // Out-of-range only for timestamps tens of millennia away
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or_else(Utc::now)
}
