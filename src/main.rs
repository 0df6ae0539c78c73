//! Fraud Scoring Pipeline - Main Entry Point
//!
//! Consumes UPI transactions from NATS, scores each one through the fraud
//! detection engine, and publishes alerts for fraud verdicts. Supports
//! parallel transaction processing for high throughput.

use anyhow::Result;
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use upi_fraud_engine::{
    config::AppConfig,
    consumer::TransactionConsumer,
    detector::FraudDetector,
    metrics::{MetricsReporter, PipelineMetrics},
    producer::AlertProducer,
    types::{score::DetectionMethod, FraudAlert, Transaction},
};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("upi_fraud_engine={}", config.logging.level))
    });

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config);

    info!("Starting UPI Fraud Scoring Pipeline");
    info!(
        "Severity tiers: medium>={:.2}, high>={:.2}, critical>={:.2}",
        config.scoring.severity.medium,
        config.scoring.severity.high,
        config.scoring.severity.critical
    );

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Build the detector; resolves the scoring path once for the process
    // lifetime (model if the artifacts load, rules otherwise).
    let detector = Arc::new(FraudDetector::new(&config));
    info!(
        detection_path = detector.detection_path_name(),
        "Fraud detector initialized"
    );

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = TransactionConsumer::new(client.clone(), &config.nats.transaction_subject);
    let producer = Arc::new(AlertProducer::new(client.clone(), &config.nats.alert_subject));

    // Parallel processing configuration
    let num_workers = config.pipeline.workers;
    info!(
        "Starting transaction scoring loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.transaction_subject);
    info!("Publishing alerts to: {}", config.nats.alert_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process transactions in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        // Clone shared resources for the spawned task
        let detector = detector.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to score this transaction
        tokio::spawn(async move {
            let start_time = Instant::now();

            match serde_json::from_slice::<Transaction>(&message.payload) {
                Ok(transaction) => {
                    let tx_id = transaction.transaction_id.clone();

                    let result = detector.predict(&transaction);
                    let processing_time = start_time.elapsed();

                    // Record metrics; a rule-based result on a process that
                    // has a model means this call degraded.
                    metrics.record_transaction(
                        processing_time,
                        result.fraud_probability,
                        result.detection_method,
                    );
                    if detector.has_model()
                        && result.detection_method == DetectionMethod::RuleBased
                    {
                        metrics.record_fallback();
                    }

                    if result.is_fraud {
                        let alert = FraudAlert::from_score(&transaction, &result);
                        metrics.record_alert(alert.severity.as_str());

                        if let Err(e) = producer.publish(&alert).await {
                            error!(
                                transaction_id = %tx_id,
                                error = %e,
                                "Failed to publish fraud alert"
                            );
                        } else {
                            info!(
                                transaction_id = %tx_id,
                                fraud_probability = result.fraud_probability,
                                severity = alert.severity.as_str(),
                                processing_time_us = processing_time.as_micros(),
                                "Fraud alert published"
                            );
                        }
                    } else {
                        debug!(
                            transaction_id = %tx_id,
                            fraud_probability = result.fraud_probability,
                            processing_time_us = processing_time.as_micros(),
                            "Transaction scored safe"
                        );
                    }

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                    // Log progress every 100 transactions
                    if count % 100 == 0 {
                        let throughput = metrics.get_throughput();
                        let processing_stats = metrics.get_processing_stats();
                        info!(
                            processed = count,
                            throughput = format!("{:.1} tx/s", throughput),
                            avg_latency_us = processing_stats.mean_us,
                            "Processing milestone"
                        );
                    }
                }
                Err(e) => {
                    // Covers malformed JSON and input-contract violations
                    // such as an unknown transaction type; the message is
                    // rejected, never scored.
                    warn!(error = %e, "Rejected transaction message");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
