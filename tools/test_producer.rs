//! Test Transaction Producer
//!
//! Generates and publishes UPI test transactions to NATS for pipeline
//! testing: a mix of ordinary transfers and known-bad patterns (self
//! transfers, throwaway identities, round high amounts, missing context).

use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};
use upi_fraud_engine::config::AppConfig;
use upi_fraud_engine::types::{Transaction, TransactionType};

const LOCAL_PARTS: [&str; 8] = [
    "alice.kumar",
    "rahul92",
    "priya.sharma",
    "vikram_s",
    "neha.r",
    "arjun.mehta",
    "sanya-p",
    "dev.patel",
];

const PROVIDERS: [&str; 5] = ["paytm", "okaxis", "ybl", "okhdfc", "upi"];

const CITY_COORDS: [(&str, f64, f64); 4] = [
    ("bengaluru", 12.9716, 77.5946),
    ("mumbai", 19.0760, 72.8777),
    ("delhi", 28.6139, 77.2090),
    ("chennai", 13.0827, 80.2707),
];

/// Transaction generator for testing
struct TransactionGenerator {
    rng: rand::rngs::ThreadRng,
    transaction_counter: u64,
}

impl TransactionGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            transaction_counter: 0,
        }
    }

    fn next_id(&mut self) -> String {
        self.transaction_counter += 1;
        format!("tx_{:08}", self.transaction_counter)
    }

    fn random_upi(&mut self) -> String {
        let local = LOCAL_PARTS[self.rng.gen_range(0..LOCAL_PARTS.len())];
        let provider = PROVIDERS[self.rng.gen_range(0..PROVIDERS.len())];
        format!("{local}@{provider}")
    }

    fn random_location(&mut self) -> String {
        let (_, lat, lon) = CITY_COORDS[self.rng.gen_range(0..CITY_COORDS.len())];
        // Jitter within the city
        let lat = lat + self.rng.gen_range(-0.05..0.05);
        let lon = lon + self.rng.gen_range(-0.05..0.05);
        format!("{lat:.4},{lon:.4}")
    }

    fn random_type(&mut self) -> TransactionType {
        match self.rng.gen_range(0..3) {
            0 => TransactionType::Send,
            1 => TransactionType::Receive,
            _ => TransactionType::Request,
        }
    }

    /// Generate an ordinary transfer with full context
    fn generate_legitimate(&mut self) -> Transaction {
        // Uneven amounts that dodge the round/small-pattern rules
        let amount = (self.rng.gen_range(550.0..9500.0_f64) * 100.0).round() / 100.0;
        let sender = self.random_upi();
        let mut receiver = self.random_upi();
        while receiver.eq_ignore_ascii_case(&sender) {
            receiver = self.random_upi();
        }

        let transaction_type = self.random_type();
        let mut tx = Transaction::new(self.next_id(), amount, sender, receiver, transaction_type);
        tx.timestamp = Utc::now();
        tx.location = Some(self.random_location());
        tx.device_id = Some(format!("device-{:06x}", self.rng.gen_range(0..0xffffff)));
        tx
    }

    /// Generate a transaction matching one of the known fraud patterns
    fn generate_fraudulent(&mut self) -> Transaction {
        let mut tx = self.generate_legitimate();

        match self.rng.gen_range(0..5) {
            0 => {
                // Round high amount, no context
                tx.amount = f64::from(self.rng.gen_range(60..250)) * 1000.0;
                tx.location = None;
                tx.device_id = None;
            }
            1 => {
                // Self transfer
                tx.receiver_upi = tx.sender_upi.clone();
            }
            2 => {
                // Throwaway identity
                tx.sender_upi = format!("test{}@paytm", self.rng.gen_range(10..99));
            }
            3 => {
                // Machine-generated identity, small probe amount
                tx.sender_upi = format!("{}@ybl", self.rng.gen_range(1_000_000_000u64..9_999_999_999));
                tx.amount = f64::from(self.rng.gen_range(100..500));
            }
            _ => {
                // Unparseable location from the capture layer
                tx.location = Some("Location unavailable".to_string());
                tx.amount = f64::from(self.rng.gen_range(51..99)) * 1000.0;
            }
        }

        tx
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Could not load config/config.toml, using defaults");
        AppConfig::default()
    });

    let count: u64 = env_or("TX_COUNT", 1000);
    let interval_ms: u64 = env_or("TX_INTERVAL_MS", 10);
    let fraud_ratio: f64 = env_or("FRAUD_RATIO", 0.1);

    info!(
        count,
        interval_ms,
        fraud_ratio,
        subject = %config.nats.transaction_subject,
        "Starting test transaction producer"
    );

    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let mut generator = TransactionGenerator::new();
    let mut fraud_sent = 0u64;

    for i in 0..count {
        let is_fraud_pattern = generator.rng.gen_bool(fraud_ratio);
        let tx = if is_fraud_pattern {
            fraud_sent += 1;
            generator.generate_fraudulent()
        } else {
            generator.generate_legitimate()
        };

        let payload = serde_json::to_vec(&tx)?;
        client
            .publish(config.nats.transaction_subject.clone(), payload.into())
            .await?;

        if (i + 1) % 100 == 0 {
            info!(sent = i + 1, fraud_patterns = fraud_sent, "Publishing progress");
        }

        tokio::time::sleep(Duration::from_millis(interval_ms)).await;
    }

    client.flush().await?;
    info!(
        sent = count,
        fraud_patterns = fraud_sent,
        "Test producer finished"
    );

    Ok(())
}
