//! Metrics tracking.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub tokens_issued: AtomicU64,
    pub tokens_verified: AtomicU64,
    pub tokens_rejected: AtomicU64,
    pub logins_rejected: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            tokens_issued: AtomicU64::new(0),
            tokens_verified: AtomicU64::new(0),
            tokens_rejected: AtomicU64::new(0),
            logins_rejected: AtomicU64::new(0),
        }
    }

    pub fn record_issue(&self) {
        self.tokens_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verify(&self) {
        self.tokens_verified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reject(&self) {
        self.tokens_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_login_rejected(&self) {
        self.logins_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tokens_issued: self.tokens_issued.load(Ordering::Relaxed),
            tokens_verified: self.tokens_verified.load(Ordering::Relaxed),
            tokens_rejected: self.tokens_rejected.load(Ordering::Relaxed),
            logins_rejected: self.logins_rejected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub tokens_issued: u64,
    pub tokens_verified: u64,
    pub tokens_rejected: u64,
    pub logins_rejected: u64,
}
