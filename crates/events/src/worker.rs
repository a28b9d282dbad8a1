//! Notification worker pool.
//!
//! A fixed number of tokio tasks poll the `notification_jobs` queue,
//! claiming one due job at a time (`FOR UPDATE SKIP LOCKED` in the
//! repository keeps claims disjoint). Each send is wrapped in a timeout;
//! failures reschedule the job with exponential backoff until the attempt
//! budget is exhausted, at which point the job is marked permanently failed
//! and logged. No database lock is ever held across the network call.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use rota_db::repositories::NotificationJobRepo;
use rota_db::DbPool;

use crate::sender::NotificationSender;

/// Upper bound on a single retry delay.
const MAX_BACKOFF_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Worker pool tuning knobs.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent drain tasks.
    pub worker_count: usize,
    /// Total delivery attempts per job before it is marked failed.
    pub max_attempts: i32,
    /// Per-attempt timeout around the sender call.
    pub send_timeout: Duration,
    /// How often an idle worker re-polls the queue.
    pub poll_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            max_attempts: 4,
            send_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `NOTIFY_WORKER_COUNT`      | `4`     |
    /// | `NOTIFY_MAX_ATTEMPTS`      | `4`     |
    /// | `NOTIFY_SEND_TIMEOUT_SECS` | `10`    |
    /// | `NOTIFY_POLL_INTERVAL_MS`  | `500`   |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let worker_count = std::env::var("NOTIFY_WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.worker_count);
        let max_attempts = std::env::var("NOTIFY_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_attempts);
        let send_timeout = std::env::var("NOTIFY_SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.send_timeout);
        let poll_interval = std::env::var("NOTIFY_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        Self {
            worker_count,
            max_attempts,
            send_timeout,
            poll_interval,
        }
    }
}

// ---------------------------------------------------------------------------
// Backoff
// ---------------------------------------------------------------------------

/// Exponential retry delay for the given attempt number (1-based):
/// 2 s, 4 s, 8 s, ... capped at [`MAX_BACKOFF_SECS`].
pub fn backoff_delay(attempt: i32) -> chrono::Duration {
    let secs = 2_i64
        .saturating_pow(attempt.clamp(1, 30) as u32)
        .min(MAX_BACKOFF_SECS);
    chrono::Duration::seconds(secs)
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// The queue-draining worker pool.
pub struct NotificationWorker {
    pool: DbPool,
    sender: Arc<dyn NotificationSender>,
    config: WorkerConfig,
}

impl NotificationWorker {
    pub fn new(pool: DbPool, sender: Arc<dyn NotificationSender>, config: WorkerConfig) -> Self {
        Self {
            pool,
            sender,
            config,
        }
    }

    /// Run the pool until the cancellation token is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            workers = self.config.worker_count,
            max_attempts = self.config.max_attempts,
            "Notification worker pool started"
        );

        let mut handles = Vec::with_capacity(self.config.worker_count);
        for index in 0..self.config.worker_count {
            let pool = self.pool.clone();
            let sender = Arc::clone(&self.sender);
            let config = self.config.clone();
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                Self::drain_loop(index, pool, sender, config, cancel).await;
            }));
        }

        futures::future::join_all(handles).await;
        tracing::info!("Notification worker pool stopped");
    }

    /// One worker task: poll, drain until empty, sleep, repeat.
    async fn drain_loop(
        index: usize,
        pool: DbPool,
        sender: Arc<dyn NotificationSender>,
        config: WorkerConfig,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(config.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(worker = index, "Notification worker shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    loop {
                        if cancel.is_cancelled() {
                            break;
                        }
                        match Self::process_next(&pool, sender.as_ref(), &config).await {
                            Ok(true) => continue,
                            Ok(false) => break,
                            Err(e) => {
                                tracing::error!(worker = index, error = %e, "Queue poll failed");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Claim and process at most one job.
    ///
    /// Returns `Ok(true)` if a job was processed (successfully or not),
    /// `Ok(false)` if the queue had nothing due.
    pub async fn process_next(
        pool: &DbPool,
        sender: &dyn NotificationSender,
        config: &WorkerConfig,
    ) -> Result<bool, sqlx::Error> {
        let Some(job) = NotificationJobRepo::claim_next(pool).await? else {
            return Ok(false);
        };

        let outcome = tokio::time::timeout(
            config.send_timeout,
            sender.send(&job.recipient_phone, &job.body),
        )
        .await;

        match outcome {
            Ok(Ok(())) => {
                NotificationJobRepo::mark_sent(pool, job.id).await?;
                tracing::debug!(job_id = job.id, phone = %job.recipient_phone, "Notification sent");
            }
            Ok(Err(e)) => {
                Self::handle_failure(pool, config, job.id, job.attempts, &e.to_string()).await?;
            }
            Err(_) => {
                Self::handle_failure(pool, config, job.id, job.attempts, "send timed out").await?;
            }
        }
        Ok(true)
    }

    /// Reschedule a failed job or, when out of attempts, retire it.
    async fn handle_failure(
        pool: &DbPool,
        config: &WorkerConfig,
        job_id: i64,
        prior_attempts: i32,
        error: &str,
    ) -> Result<(), sqlx::Error> {
        let attempts = prior_attempts + 1;

        if attempts >= config.max_attempts {
            NotificationJobRepo::mark_failed(pool, job_id, attempts, error).await?;
            tracing::error!(
                job_id,
                attempts,
                error,
                "Notification permanently failed, giving up"
            );
        } else {
            let next_attempt_at = chrono::Utc::now() + backoff_delay(attempts);
            NotificationJobRepo::schedule_retry(pool, job_id, attempts, next_attempt_at, error)
                .await?;
            tracing::warn!(job_id, attempts, error, "Notification failed, retry scheduled");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), chrono::Duration::seconds(2));
        assert_eq!(backoff_delay(2), chrono::Duration::seconds(4));
        assert_eq!(backoff_delay(3), chrono::Duration::seconds(8));
        assert_eq!(backoff_delay(10), chrono::Duration::seconds(MAX_BACKOFF_SECS));
    }

    #[test]
    fn backoff_tolerates_degenerate_attempt_numbers() {
        assert_eq!(backoff_delay(0), chrono::Duration::seconds(2));
        assert_eq!(backoff_delay(-3), chrono::Duration::seconds(2));
        assert_eq!(backoff_delay(i32::MAX), chrono::Duration::seconds(MAX_BACKOFF_SECS));
    }

    #[test]
    fn default_config_is_sane() {
        let config = WorkerConfig::default();
        assert!(config.worker_count >= 1);
        assert!(config.max_attempts >= 1);
        assert!(config.send_timeout > Duration::ZERO);
    }
}
