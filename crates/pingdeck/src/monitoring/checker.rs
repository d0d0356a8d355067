use anyhow::{Result, anyhow};
use std::time::{Duration, Instant};

/// Default per-probe timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECONDS: u64 = 30;

/// Checker trait for performing a single probe against a target URL
///
/// A probe either yields the measured latency and HTTP status code, or fails
/// at the network level (connection refused, DNS failure, timeout). HTTP error
/// statuses are *not* failures here: a 500 is data the monitor layer compares
/// across ticks. No retries at this layer; a target is simply re-probed on the
/// next tick.
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Perform one GET and return latency in milliseconds (2 decimal places)
    /// and the response status code
    async fn check(&self, target: &str) -> Result<(f64, u16)>;
}

/// HTTP/HTTPS checker backed by a shared reqwest client
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str) -> Result<(f64, u16)> {
        let start = Instant::now();

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let latency = round_millis(start.elapsed().as_secs_f64() * 1000.0);
        Ok((latency, response.status().as_u16()))
    }
}

/// Round a latency to 2 decimal places
pub(crate) fn round_millis(millis: f64) -> f64 {
    (millis * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_rounds_to_two_decimals() {
        assert_eq!(round_millis(12.3456), 12.35);
        assert_eq!(round_millis(0.004), 0.0);
        assert_eq!(round_millis(1500.999), 1501.0);
    }
}
