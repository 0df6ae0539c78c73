//! Performance metrics and statistics tracking for the scoring pipeline.

use crate::types::score::DetectionMethod;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for pipeline performance
pub struct PipelineMetrics {
    /// Total transactions scored
    pub transactions_processed: AtomicU64,
    /// Total alerts generated
    pub alerts_generated: AtomicU64,
    /// Calls scored on the model path
    model_path_calls: AtomicU64,
    /// Calls scored on the rule path
    rule_path_calls: AtomicU64,
    /// Per-call degradations from model to rule path
    model_fallbacks: AtomicU64,
    /// Alerts by severity tier
    alerts_by_severity: RwLock<HashMap<String, u64>>,
    /// Scoring times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Fraud probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            transactions_processed: AtomicU64::new(0),
            alerts_generated: AtomicU64::new(0),
            model_path_calls: AtomicU64::new(0),
            rule_path_calls: AtomicU64::new(0),
            model_fallbacks: AtomicU64::new(0),
            alerts_by_severity: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a scored transaction
    pub fn record_transaction(
        &self,
        processing_time: Duration,
        probability: f64,
        method: DetectionMethod,
    ) {
        self.transactions_processed.fetch_add(1, Ordering::Relaxed);

        match method {
            DetectionMethod::Model => self.model_path_calls.fetch_add(1, Ordering::Relaxed),
            DetectionMethod::RuleBased => self.rule_path_calls.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the recent window for memory efficiency
            if times.len() > 10_000 {
                times.drain(0..5_000);
            }
        }

        let bucket = ((probability * 10.0) as usize).min(9);
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a per-call model-to-rules degradation
    pub fn record_fallback(&self) {
        self.model_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an alert
    pub fn record_alert(&self, severity: &str) {
        self.alerts_generated.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_severity) = self.alerts_by_severity.write() {
            *by_severity.entry(severity.to_string()).or_insert(0) += 1;
        }
    }

    /// Get scoring time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (transactions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.transactions_processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get probability distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        *self.score_buckets.read().unwrap()
    }

    /// Get alerts by severity tier
    pub fn get_alerts_by_severity(&self) -> HashMap<String, u64> {
        self.alerts_by_severity.read().unwrap().clone()
    }

    /// Get per-path call counts: (model, rules, fallbacks)
    pub fn get_path_counts(&self) -> (u64, u64, u64) {
        (
            self.model_path_calls.load(Ordering::Relaxed),
            self.rule_path_calls.load(Ordering::Relaxed),
            self.model_fallbacks.load(Ordering::Relaxed),
        )
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let tx_count = self.transactions_processed.load(Ordering::Relaxed);
        let alert_count = self.alerts_generated.load(Ordering::Relaxed);
        let alert_rate = if tx_count > 0 {
            (alert_count as f64 / tx_count as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let (model_calls, rule_calls, fallbacks) = self.get_path_counts();
        let alerts_by_severity = self.get_alerts_by_severity();
        let score_dist = self.get_score_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            FRAUD SCORING PIPELINE - METRICS SUMMARY          ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Transactions Scored:    {:>8}  │  Throughput: {:>6.1} tx/s ║",
            tx_count, throughput
        );
        info!(
            "║ Alerts Generated:       {:>8}  │  Alert Rate: {:>6.1}%     ║",
            alert_count, alert_rate
        );
        info!(
            "║ Model Path: {:>8}  Rule Path: {:>8}  Fallbacks: {:>5} ║",
            model_calls, rule_calls, fallbacks
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Scoring Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5}    ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Alerts by Severity:                                          ║");
        for (severity, count) in &alerts_by_severity {
            let pct = if alert_count > 0 {
                (*count as f64 / alert_count as f64) * 100.0
            } else {
                0.0
            };
            info!(
                "║   {:10}: {:>6} ({:>5.1}%)                                ║",
                severity, count, pct
            );
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Fraud Probability Distribution:                              ║");
        let total: u64 = score_dist.iter().sum();
        for (i, &count) in score_dist.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "█".repeat(bar_len.min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoring time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
