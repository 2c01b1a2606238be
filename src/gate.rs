//! Admin request gate.
//!
//! Every mutating admin route goes through [`AdminGate::admit`] which applies
//! the per (client, route) rate limit first and the shared-secret check
//! second. Unauthenticated floods are therefore throttled before any
//! credential work and spend quota even when their key is wrong.

use std::sync::Arc;
use std::time::Instant;

use crate::config::GateConfig;
use crate::error::AppError;
use crate::events::{EventSink, GateEvent, GateEventKind};
use crate::metrics::ADMIN_REJECTIONS;
use crate::rate_limit::RateLimiter;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// True only for a non-empty key equal to a non-empty secret.
pub fn check_authorized(expected: &str, supplied: &str) -> bool {
    !expected.is_empty() && !supplied.is_empty() && expected == supplied
}

pub struct AdminGate {
    limiter: RateLimiter,
    secret: String,
    sink: Arc<dyn EventSink>,
}

impl AdminGate {
    pub fn new(config: &GateConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            limiter: RateLimiter::new(config.max_requests, config.window),
            secret: config.secret.clone(),
            sink,
        }
    }

    pub fn check_rate_limit(&self, client_id: &str, route: &str) -> bool {
        self.limiter.check(client_id, route)
    }

    pub fn check_authorized(&self, supplied: &str) -> bool {
        check_authorized(&self.secret, supplied)
    }

    pub fn admit(&self, client_id: &str, route: &str, supplied: &str) -> Result<(), AppError> {
        self.admit_at(client_id, route, supplied, Instant::now())
    }

    pub fn admit_at(
        &self,
        client_id: &str,
        route: &str,
        supplied: &str,
        now: Instant,
    ) -> Result<(), AppError> {
        if !self.limiter.check_at(client_id, route, now) {
            self.reject(GateEventKind::RateLimited, client_id, route);
            return Err(AppError::RateLimited);
        }

        if !self.check_authorized(supplied) {
            self.reject(GateEventKind::Unauthorized, client_id, route);
            return Err(AppError::Unauthorized);
        }

        Ok(())
    }

    fn reject(&self, kind: GateEventKind, client_id: &str, route: &str) {
        ADMIN_REJECTIONS.with_label_values(&[kind.as_str()]).inc();
        self.sink.record(&GateEvent::now(kind, client_id, route));
    }
}
