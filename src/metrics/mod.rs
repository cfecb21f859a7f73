//! Request and entity counters for the Ecclesia client.
//!
//! All counters are shared atomics, so cloned `Metrics` handles observe the same values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Kinds of records the client fetches from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Tither,
    Contribution,
    Parish,
    Community,
    ReportRow,
}

impl Entity {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            Entity::Tither => 0,
            Entity::Contribution => 1,
            Entity::Parish => 2,
            Entity::Community => 3,
            Entity::ReportRow => 4,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    http_requests: AtomicU64,
    http_errors: AtomicU64,
    http_duration_ms: AtomicU64,
    auth_failures: AtomicU64,
    fetched: [AtomicU64; Entity::COUNT],
}

/// Metrics collector shared by the HTTP client and services.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    counters: Arc<Counters>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed HTTP request.
    pub fn record_http_request(&self, duration: Duration) {
        self.counters.http_requests.fetch_add(1, Ordering::Relaxed);
        self.counters
            .http_duration_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_http_error(&self) {
        self.counters.http_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a 401 from the backend.
    pub fn record_auth_failure(&self) {
        self.counters.auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` records of `entity` received from the backend.
    pub fn record_fetched(&self, entity: Entity, count: usize) {
        self.counters.fetched[entity.index()].fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn http_requests_total(&self) -> u64 {
        self.counters.http_requests.load(Ordering::Relaxed)
    }

    pub fn http_errors_total(&self) -> u64 {
        self.counters.http_errors.load(Ordering::Relaxed)
    }

    pub fn http_duration_total_ms(&self) -> u64 {
        self.counters.http_duration_ms.load(Ordering::Relaxed)
    }

    pub fn auth_failures_total(&self) -> u64 {
        self.counters.auth_failures.load(Ordering::Relaxed)
    }

    pub fn fetched_total(&self, entity: Entity) -> u64 {
        self.counters.fetched[entity.index()].load(Ordering::Relaxed)
    }

    /// Average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let count = self.http_requests_total();
        if count == 0 {
            0.0
        } else {
            self.http_duration_total_ms() as f64 / count as f64
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.counters.http_requests.store(0, Ordering::Relaxed);
        self.counters.http_errors.store(0, Ordering::Relaxed);
        self.counters.http_duration_ms.store(0, Ordering::Relaxed);
        self.counters.auth_failures.store(0, Ordering::Relaxed);
        for counter in &self.counters.fetched {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            auth_failures_total: self.auth_failures_total(),
            tithers_fetched_total: self.fetched_total(Entity::Tither),
            contributions_fetched_total: self.fetched_total(Entity::Contribution),
            report_rows_fetched_total: self.fetched_total(Entity::ReportRow),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
    pub auth_failures_total: u64,
    pub tithers_fetched_total: u64,
    pub contributions_fetched_total: u64,
    pub report_rows_fetched_total: u64,
}

/// Times one HTTP request and records it on completion.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn complete(self) {
        self.metrics.record_http_request(self.start.elapsed());
    }

    pub fn complete_with_error(self) {
        self.metrics.record_http_request(self.start.elapsed());
        self.metrics.record_http_error();
    }
}
