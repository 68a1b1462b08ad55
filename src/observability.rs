//! In-process counters for proxy activity

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle shared by the token cache and request handlers
#[derive(Debug, Default)]
pub struct Metrics {
    searches_proxied: AtomicU64,
    searches_failed: AtomicU64,
    token_refreshes: AtomicU64,
    products_created: AtomicU64,
    products_reused: AtomicU64,
    inquiries_accepted: AtomicU64,
    emails_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_proxied(&self) {
        self.searches_proxied.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "searches_proxied", "Metric incremented");
    }

    pub fn search_failed(&self) {
        self.searches_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "searches_failed", "Metric incremented");
    }

    pub fn token_refreshed(&self) {
        self.token_refreshes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "token_refreshes", "Metric incremented");
    }

    pub fn product_created(&self) {
        self.products_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "products_created", "Metric incremented");
    }

    pub fn product_reused(&self) {
        self.products_reused.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "products_reused", "Metric incremented");
    }

    pub fn inquiry_accepted(&self) {
        self.inquiries_accepted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "inquiries_accepted", "Metric incremented");
    }

    pub fn email_failed(&self) {
        self.emails_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "emails_failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches_proxied: self.searches_proxied.load(Ordering::Relaxed),
            searches_failed: self.searches_failed.load(Ordering::Relaxed),
            token_refreshes: self.token_refreshes.load(Ordering::Relaxed),
            products_created: self.products_created.load(Ordering::Relaxed),
            products_reused: self.products_reused.load(Ordering::Relaxed),
            inquiries_accepted: self.inquiries_accepted.load(Ordering::Relaxed),
            emails_failed: self.emails_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub searches_proxied: u64,
    pub searches_failed: u64,
    pub token_refreshes: u64,
    pub products_created: u64,
    pub products_reused: u64,
    pub inquiries_accepted: u64,
    pub emails_failed: u64,
}
