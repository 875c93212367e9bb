// src/services/rate_limit.rs
// DOCUMENTATION: Per-user fixed-window limiter for share creation
// PURPOSE: Cap how many share links one account can mint per minute

use crate::errors::RazorError;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Thread-safe limiter shared across workers through web::Data
/// DOCUMENTATION: user -> (requests in window, window start)
#[derive(Clone)]
pub struct ShareRateLimiter {
    state: Arc<DashMap<Uuid, (u32, Instant)>>,
    limit: u32,
    window: Duration,
}

impl ShareRateLimiter {
    /// `limit` requests per minute and per user
    pub fn per_minute(limit: u32) -> Self {
        Self::with_window(limit, Duration::from_secs(60))
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            state: Arc::new(DashMap::new()),
            limit: limit.max(1),
            window,
        }
    }

    /// Count one request for `user`; Err(RateLimitExceeded) once over the limit
    pub fn check(&self, user: Uuid) -> Result<(), RazorError> {
        self.check_at(user, Instant::now())
    }

    fn check_at(&self, user: Uuid, now: Instant) -> Result<(), RazorError> {
        let mut entry = self.state.entry(user).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) >= self.window {
            *count = 0;
            *window_start = now;
        }

        if *count >= self.limit {
            log::warn!("Share rate limit hit for user {}", user);
            return Err(RazorError::RateLimitExceeded);
        }

        *count += 1;
        Ok(())
    }

    /// Drop windows that have already elapsed
    pub fn cleanup(&self) {
        let before = self.tracked_users();
        let now = Instant::now();
        self.state
            .retain(|_, (_, start)| now.duration_since(*start) < self.window);
        let removed = before.saturating_sub(self.tracked_users());
        if removed > 0 {
            log::debug!("Rate limiter cleanup: removed {} idle users", removed);
        }
    }

    pub fn tracked_users(&self) -> usize {
        self.state.len()
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically forgets users whose window elapsed
pub fn start_cleanup_task(limiter: ShareRateLimiter, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_limit_per_user() {
        let limiter = ShareRateLimiter::per_minute(2);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert_ok!(limiter.check(alice));
        assert_ok!(limiter.check(alice));
        assert!(matches!(
            limiter.check(alice),
            Err(RazorError::RateLimitExceeded)
        ));
        // Other users have their own window
        assert!(limiter.check(bob).is_ok());
    }

    #[test]
    fn test_window_resets() {
        let limiter = ShareRateLimiter::with_window(1, Duration::from_secs(60));
        let user = Uuid::new_v4();
        let start = Instant::now();

        assert_ok!(limiter.check_at(user, start));
        assert_err!(limiter.check_at(user, start + Duration::from_secs(30)));
        assert_ok!(limiter.check_at(user, start + Duration::from_secs(61)));
    }

    #[test]
    fn test_zero_limit_still_allows_one() {
        let limiter = ShareRateLimiter::per_minute(0);
        assert!(limiter.check(Uuid::new_v4()).is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_forgets_elapsed_windows() {
        let limiter = ShareRateLimiter::with_window(5, Duration::from_millis(50));
        limiter.check(Uuid::new_v4()).unwrap();
        assert_eq!(limiter.tracked_users(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        limiter.cleanup();

        assert_eq!(limiter.tracked_users(), 0);
    }
}
