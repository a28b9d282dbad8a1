//! Integration tests for the notification path: event fan-out into queue
//! jobs, and worker delivery with retry/backoff and failure isolation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::PgPool;

use rota_db::models::notification_job::{NewNotificationJob, JOB_KIND_ANNOUNCEMENT};
use rota_db::models::resident::CreateResident;
use rota_db::models::site::CreateSite;
use rota_db::repositories::{NotificationJobRepo, ResidentRepo, SiteRepo};
use rota_events::worker::{NotificationWorker, WorkerConfig};
use rota_events::{NotificationDispatcher, NotificationSender, SendError, TaskEvent};

// ---------------------------------------------------------------------------
// Mock sender
// ---------------------------------------------------------------------------

/// Records every delivery and fails for a configured set of phones.
struct MockSender {
    sent: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl MockSender {
    fn new(failing: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            failing: failing.iter().map(|p| p.to_string()).collect(),
        })
    }

    fn sent_phones(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockSender {
    async fn send(&self, phone: &str, _body: &str) -> Result<(), SendError> {
        if self.failing.contains(phone) {
            return Err(SendError::HttpStatus(500));
        }
        self.sent.lock().unwrap().push(phone.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_site(pool: &PgPool) -> i64 {
    SiteRepo::create(
        pool,
        &CreateSite {
            name: "Palm Court".to_string(),
            address: None,
            longitude: 29.0253,
            latitude: 41.0422,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_resident(pool: &PgPool, site_id: i64, unit: &str, kind: &str, phone: &str) {
    ResidentRepo::create(
        pool,
        site_id,
        &CreateResident {
            first_name: Some("Resident".to_string()),
            last_name: None,
            unit_number: Some(unit.to_string()),
            resident_type: Some(kind.to_string()),
            phone: phone.to_string(),
        },
    )
    .await
    .unwrap();
}

fn started_event(site_id: i64) -> TaskEvent {
    TaskEvent::TaskStarted {
        assignment_id: 1,
        site_id,
        site_name: "Palm Court".to_string(),
        duty_type: "garbage".to_string(),
        staff_name: "Ali Demir".to_string(),
        started_at: chrono::Utc::now(),
        is_late: false,
    }
}

// ---------------------------------------------------------------------------
// Dispatch fan-out
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn one_job_per_selected_recipient(pool: PgPool) {
    let site_id = new_site(&pool).await;
    // Unit 1: owner only. Unit 2: owner and tenant; the tenant wins.
    new_resident(&pool, site_id, "1", "OWNER", "905551111111").await;
    new_resident(&pool, site_id, "2", "OWNER", "905552222222").await;
    new_resident(&pool, site_id, "2", "TENANT", "905553333333").await;

    let dispatcher = NotificationDispatcher::new(pool.clone());
    let enqueued = dispatcher.dispatch(&started_event(site_id)).await.unwrap();
    assert_eq!(enqueued, 2);

    let jobs = NotificationJobRepo::list_by_status(&pool, "QUEUED").await.unwrap();
    let mut phones: Vec<&str> = jobs.iter().map(|j| j.recipient_phone.as_str()).collect();
    phones.sort_unstable();
    assert_eq!(phones, vec!["905551111111", "905553333333"]);

    // The default template carries the staff name and duty type display name
    // ("garbage" is seeded as "Garbage Collection").
    assert!(jobs[0].body.contains("Ali Demir"));
    assert!(jobs[0].body.contains("Garbage Collection"));
    assert!(jobs[0].body.contains("Palm Court"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn site_without_residents_enqueues_nothing(pool: PgPool) {
    let site_id = new_site(&pool).await;

    let dispatcher = NotificationDispatcher::new(pool.clone());
    let enqueued = dispatcher.dispatch(&started_event(site_id)).await.unwrap();
    assert_eq!(enqueued, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_events_do_not_notify_residents(pool: PgPool) {
    let site_id = new_site(&pool).await;
    new_resident(&pool, site_id, "1", "OWNER", "905551111111").await;

    let dispatcher = NotificationDispatcher::new(pool.clone());
    let event = TaskEvent::TaskCompleted {
        assignment_id: 1,
        site_id,
        site_name: "Palm Court".to_string(),
        duty_type: "garbage".to_string(),
        staff_name: "Ali Demir".to_string(),
        completed_at: chrono::Utc::now(),
        completed_late: false,
    };
    assert_eq!(dispatcher.dispatch(&event).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Worker delivery
// ---------------------------------------------------------------------------

fn test_config() -> WorkerConfig {
    WorkerConfig {
        worker_count: 1,
        max_attempts: 2,
        ..WorkerConfig::default()
    }
}

async fn enqueue_announcement(pool: &PgPool, phone: &str) -> i64 {
    NotificationJobRepo::enqueue(
        pool,
        &NewNotificationJob {
            kind: JOB_KIND_ANNOUNCEMENT,
            recipient_phone: phone.to_string(),
            body: "hello".to_string(),
        },
    )
    .await
    .unwrap()
}

/// Make every queued retry immediately due.
async fn force_due(pool: &PgPool) {
    sqlx::query("UPDATE notification_jobs SET next_attempt_at = NOW() - INTERVAL '1 second'")
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn one_failing_job_does_not_affect_the_others(pool: PgPool) {
    let good = enqueue_announcement(&pool, "905551111111").await;
    let bad = enqueue_announcement(&pool, "905559999999").await;

    let sender = MockSender::new(&["905559999999"]);
    let config = test_config();

    // First drain pass touches both jobs.
    assert!(NotificationWorker::process_next(&pool, sender.as_ref(), &config).await.unwrap());
    assert!(NotificationWorker::process_next(&pool, sender.as_ref(), &config).await.unwrap());

    let good_job = NotificationJobRepo::get(&pool, good).await.unwrap().unwrap();
    assert_eq!(good_job.status, "SENT");
    assert_eq!(sender.sent_phones(), vec!["905551111111".to_string()]);

    // The failing job went back to the queue with backoff state, not FAILED.
    let bad_job = NotificationJobRepo::get(&pool, bad).await.unwrap().unwrap();
    assert_eq!(bad_job.status, "QUEUED");
    assert_eq!(bad_job.attempts, 1);
    assert!(bad_job.next_attempt_at > chrono::Utc::now());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn exhausted_retries_mark_the_job_failed(pool: PgPool) {
    let bad = enqueue_announcement(&pool, "905559999999").await;

    let sender = MockSender::new(&["905559999999"]);
    let config = test_config();

    // Attempt 1: rescheduled.
    assert!(NotificationWorker::process_next(&pool, sender.as_ref(), &config).await.unwrap());
    // The retry is not due yet.
    assert!(!NotificationWorker::process_next(&pool, sender.as_ref(), &config).await.unwrap());

    // Attempt 2 (the last allowed): retire the job.
    force_due(&pool).await;
    assert!(NotificationWorker::process_next(&pool, sender.as_ref(), &config).await.unwrap());

    let job = NotificationJobRepo::get(&pool, bad).await.unwrap().unwrap();
    assert_eq!(job.status, "FAILED");
    assert_eq!(job.attempts, 2);
    assert!(job.last_error.is_some());
    assert!(sender.sent_phones().is_empty());
}
