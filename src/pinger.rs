use anyhow::{Context, Result};
use log::warn;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// Concurrent HTTP load generator: a pool of workers hammers one URL and
/// counts successes and errors.
///
/// Deliberately unbounded: no backoff on error, no retry budget, no
/// cancellation — workers loop until the process exits, and errors are
/// counted and immediately retried.
pub struct Pinger {
    remote_url: String,
    client: reqwest::Client,
    success_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    report_interval: Duration,
}

impl Pinger {
    pub fn new(
        remote_url: impl Into<String>,
        max_conns_per_host: usize,
        timeout: Duration,
        report_interval: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_conns_per_host)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            remote_url: remote_url.into(),
            client,
            success_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            report_interval,
        })
    }

    pub fn counts(&self) -> (u64, u64) {
        (
            self.success_count.load(Ordering::Relaxed),
            self.error_count.load(Ordering::Relaxed),
        )
    }

    /// Spawn `workers` request loops and report counters periodically.
    /// Never returns.
    pub async fn run(&self, workers: usize) {
        for _ in 0..workers.max(1) {
            let client = self.client.clone();
            let url = self.remote_url.clone();
            let success = self.success_count.clone();
            let errors = self.error_count.clone();
            tokio::spawn(async move {
                loop {
                    match fetch_once(&client, &url).await {
                        Ok(()) => {
                            success.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            errors.fetch_add(1, Ordering::Relaxed);
                            warn!("request to {url} failed: {e}");
                        }
                    }
                }
            });
        }

        let mut ticker = time::interval(self.report_interval);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            let (success, errors) = self.counts();
            println!("Errors: {errors}\tSuccess: {success}");
        }
    }
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> reqwest::Result<()> {
    let resp = client.get(url).send().await?;
    // Drain the body so the connection can be reused.
    resp.bytes().await?;
    Ok(())
}
