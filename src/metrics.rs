//! Performance metrics for the prediction service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the two prediction paths.
pub struct ServiceMetrics {
    /// Total successful predictions
    pub predictions_served: AtomicU64,
    /// Total failed predictions
    pub predictions_failed: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for throughput calculation
    start_time: Instant,
}

/// Latency statistics snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

impl ServiceMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            predictions_failed: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record one successful prediction.
    pub fn record_success(&self, latency: Duration) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the most recent samples for memory efficiency
            if latencies.len() > 10000 {
                latencies.drain(0..5000);
            }
        }
    }

    /// Record one failed prediction.
    pub fn record_failure(&self) {
        self.predictions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get latency statistics over the retained samples.
    pub fn latency_stats(&self) -> LatencyStats {
        let latencies = match self.latencies.read() {
            Ok(l) => l,
            Err(_) => return LatencyStats::default(),
        };
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (predictions per second).
    pub fn throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log a summary of the collected metrics.
    pub fn log_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let failed = self.predictions_failed.load(Ordering::Relaxed);
        let stats = self.latency_stats();

        info!(
            predictions_served = served,
            predictions_failed = failed,
            throughput = format!("{:.1} req/s", self.throughput()),
            latency_mean_us = stats.mean_us,
            latency_p50_us = stats.p50_us,
            latency_p95_us = stats.p95_us,
            latency_p99_us = stats.p99_us,
            "Service metrics summary"
        );
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic reporter that logs a metrics summary in the background.
pub struct MetricsReporter;

impl MetricsReporter {
    /// Spawn a task that logs a summary every `interval`.
    pub fn spawn(metrics: Arc<ServiceMetrics>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                metrics.log_summary();
            }
        })
    }
}
