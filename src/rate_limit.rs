use dashmap::DashMap;
use std::time::{Duration, Instant};

// Fixed-window counter for one (client, route) pair
#[derive(Debug, Clone, Copy)]
pub struct RateBucket {
    pub count: u32,
    pub window_end: Instant,
}

/// Per (client, route) fixed-window limiter.
///
/// Buckets are created on first sight and reset in place once their window
/// has passed. The read-check-increment runs under the bucket's map entry
/// lock, so concurrent requests for the same key never lose updates.
pub struct RateLimiter {
    buckets: DashMap<(String, String), RateBucket>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn check(&self, client_id: &str, route: &str) -> bool {
        self.check_at(client_id, route, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, client_id: &str, route: &str, now: Instant) -> bool {
        let mut bucket = self
            .buckets
            .entry((client_id.to_string(), route.to_string()))
            .or_insert(RateBucket {
                count: 0,
                window_end: now + self.window,
            });

        // window over..? start a new one
        if now > bucket.window_end {
            bucket.count = 0;
            bucket.window_end = now + self.window;
        }

        bucket.count = bucket.count.saturating_add(1);
        bucket.count <= self.max_requests
    }

    pub fn bucket(&self, client_id: &str, route: &str) -> Option<RateBucket> {
        self.buckets
            .get(&(client_id.to_string(), route.to_string()))
            .map(|b| *b)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
