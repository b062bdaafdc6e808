//! Per-user rate limiting.
//!
//! One GCRA bucket per authenticated user id, refilled at
//! `security.rate_limit_per_minute`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::num::NonZeroU32;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<Uuid>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// A limit of zero is clamped to one request per minute; callers disable
    /// limiting by not constructing a limiter at all.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        }
    }

    /// Returns `Err(retry_after_secs)` when `user_id` is over its quota.
    pub fn check(&self, user_id: Uuid) -> Result<(), u64> {
        self.limiter.check_key(&user_id).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }

    /// Number of users currently tracked.
    pub fn tracked_users(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_users", &self.tracked_users())
            .finish()
    }
}

/// Must be layered inside `require_user_auth`: it reads the caller from
/// request extensions and lets anonymous requests through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (Some(limiter), Some(auth)) = (
        state.rate_limiter.as_ref(),
        req.extensions().get::<UserAuth>(),
    ) else {
        return next.run(req).await;
    };

    if let Err(retry_after_secs) = limiter.check(auth.user_id) {
        tracing::debug!(user_id = %auth.user_id, retry_after_secs, "Rate limit exceeded");
        return ApiError::RateLimited { retry_after_secs }.into_response();
    }

    next.run(req).await
}
