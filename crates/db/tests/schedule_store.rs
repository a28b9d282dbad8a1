//! Integration tests for the schedule store: assignment conflict checking,
//! deterministic ordering, explicit cascade deletes, execution-record
//! uniqueness, and the notification queue claim discipline.

use chrono::NaiveTime;
use sqlx::PgPool;

use rota_db::models::notification_job::{NewNotificationJob, JOB_KIND_ANNOUNCEMENT};
use rota_db::models::site::CreateSite;
use rota_db::models::staff::CreateStaff;
use rota_db::repositories::{
    AssignmentRepo, ExecutionRepo, NotificationJobRepo, ScheduleWriteError, SiteRepo, StaffRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn days(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

async fn new_site(pool: &PgPool, name: &str) -> i64 {
    SiteRepo::create(
        pool,
        &CreateSite {
            name: name.to_string(),
            address: None,
            longitude: 29.0253,
            latitude: 41.0422,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_staff(pool: &PgPool, name: &str, phone: &str) -> i64 {
    StaffRepo::create(
        pool,
        &CreateStaff {
            name: name.to_string(),
            phone: phone.to_string(),
            role: None,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Conflict checking
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn overlapping_window_on_shared_day_conflicts(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;

    let first = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    // MON 19:30-20:30 overlaps MON 19:00-20:00.
    let err = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "cleaning",
        &days(&["MON"]),
        t(19, 30),
        t(20, 30),
    )
    .await
    .unwrap_err();

    match err {
        ScheduleWriteError::Conflict(id) => assert_eq!(id, first.id),
        other => panic!("expected schedule conflict, got {other:?}"),
    }
}

#[sqlx::test]
async fn disjoint_day_or_window_does_not_conflict(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;

    AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garbage",
        &days(&["MON", "WED"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    // Same window, different day.
    AssignmentRepo::create(
        &pool,
        staff,
        site,
        "cleaning",
        &days(&["TUE"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    // Same day, windows only touch ([20:00, 21:00) after [19:00, 20:00)).
    AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garden",
        &days(&["MON"]),
        t(20, 0),
        t(21, 0),
    )
    .await
    .unwrap();
}

#[sqlx::test]
async fn conflict_is_scoped_to_the_staff_member(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff_a = new_staff(&pool, "Ali Demir", "905551111111").await;
    let staff_b = new_staff(&pool, "Veli Kaya", "905552222222").await;

    AssignmentRepo::create(
        &pool,
        staff_a,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    // Identical schedule, different staff member: allowed.
    AssignmentRepo::create(
        &pool,
        staff_b,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();
}

#[sqlx::test]
async fn update_excludes_itself_from_the_conflict_check(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;

    let a = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();
    let b = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "cleaning",
        &days(&["TUE"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    // Widening a's own window is fine; it only conflicts with itself.
    let updated = AssignmentRepo::update_schedule(&pool, a.id, staff, &days(&["MON"]), t(18, 30), t(20, 0))
        .await
        .unwrap()
        .expect("assignment exists");
    assert_eq!(updated.schedule_start, t(18, 30));

    // Moving b onto a's day and window is still rejected.
    let err =
        AssignmentRepo::update_schedule(&pool, b.id, staff, &days(&["MON"]), t(19, 0), t(19, 30))
            .await
            .unwrap_err();
    match err {
        ScheduleWriteError::Conflict(id) => assert_eq!(id, a.id),
        other => panic!("expected schedule conflict, got {other:?}"),
    }
}

#[sqlx::test]
async fn no_overlapping_pair_survives_a_create_sequence(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;

    let attempts = [
        (days(&["MON", "WED"]), t(8, 0), t(9, 0)),
        (days(&["MON"]), t(8, 30), t(9, 30)), // overlaps #1 on MON
        (days(&["WED"]), t(9, 0), t(10, 0)),  // touches #1, allowed
        (days(&["FRI"]), t(8, 0), t(9, 0)),
        (days(&["FRI", "MON"]), t(8, 45), t(9, 15)), // overlaps #1 and #4
    ];
    for (day_set, start, end) in attempts {
        let _ = AssignmentRepo::create(&pool, staff, site, "garbage", &day_set, start, end).await;
    }

    // Invariant: no persisted pair for this staff member shares a weekday
    // with overlapping windows.
    let overlapping: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM assignments a \
         JOIN assignments b ON b.staff_id = a.staff_id AND b.id > a.id \
         WHERE a.staff_id = $1 \
           AND a.scheduled_days && b.scheduled_days \
           AND a.schedule_start < b.schedule_end \
           AND b.schedule_start < a.schedule_end",
    )
    .bind(staff)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(overlapping, 0);
}

#[sqlx::test]
async fn check_conflict_probe_matches_create_behaviour(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;

    let existing = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    let hit = AssignmentRepo::check_conflict(&pool, staff, &days(&["MON"]), t(19, 30), t(20, 30), None)
        .await
        .unwrap();
    assert_eq!(hit, Some(existing.id));

    // Excluding the existing assignment clears the probe.
    let hit = AssignmentRepo::check_conflict(
        &pool,
        staff,
        &days(&["MON"]),
        t(19, 30),
        t(20, 30),
        Some(existing.id),
    )
    .await
    .unwrap();
    assert_eq!(hit, None);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn staff_listing_is_ordered_by_window_start(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;

    AssignmentRepo::create(&pool, staff, site, "cleaning", &days(&["TUE"]), t(14, 0), t(15, 0))
        .await
        .unwrap();
    AssignmentRepo::create(&pool, staff, site, "garbage", &days(&["MON"]), t(8, 0), t(9, 0))
        .await
        .unwrap();

    let listed = AssignmentRepo::list_details_for_staff(&pool, staff)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].duty_type, "garbage");
    assert_eq!(listed[1].duty_type, "cleaning");
    assert_eq!(listed[0].staff_name, "Ali Demir");
    assert_eq!(listed[0].site_name, "Palm Court");
}

// ---------------------------------------------------------------------------
// Execution records
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn duplicate_execution_record_for_a_date_is_rejected(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;
    let assignment = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let now = chrono::Utc::now();

    let mut conn = pool.acquire().await.unwrap();
    ExecutionRepo::insert_started_tx(&mut *conn, assignment.id, date, "IN_PROGRESS", false, now, 3.5)
        .await
        .unwrap();

    let err =
        ExecutionRepo::insert_started_tx(&mut *conn, assignment.id, date, "IN_PROGRESS", false, now, 3.5)
            .await
            .unwrap_err();
    let is_unique_violation = matches!(
        &err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    );
    assert!(is_unique_violation, "expected 23505, got {err:?}");
}

#[sqlx::test]
async fn deleting_an_assignment_removes_records_and_logs(pool: PgPool) {
    let site = new_site(&pool, "Palm Court").await;
    let staff = new_staff(&pool, "Ali Demir", "905551111111").await;
    let assignment = AssignmentRepo::create(
        &pool,
        staff,
        site,
        "garbage",
        &days(&["MON"]),
        t(19, 0),
        t(20, 0),
    )
    .await
    .unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let mut conn = pool.acquire().await.unwrap();
    ExecutionRepo::insert_started_tx(
        &mut *conn,
        assignment.id,
        date,
        "IN_PROGRESS",
        false,
        chrono::Utc::now(),
        3.5,
    )
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO action_logs (assignment_id, staff_id, action, distance_meters) \
         VALUES ($1, $2, 'START', 3.5)",
    )
    .bind(assignment.id)
    .bind(staff)
    .execute(&pool)
    .await
    .unwrap();
    drop(conn);

    assert!(AssignmentRepo::delete(&pool, assignment.id).await.unwrap());

    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM execution_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM action_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 0);
    assert_eq!(logs, 0);
}

// ---------------------------------------------------------------------------
// Notification queue
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn claim_moves_jobs_to_sending_without_double_claiming(pool: PgPool) {
    for phone in ["905551111111", "905552222222"] {
        NotificationJobRepo::enqueue(
            &pool,
            &NewNotificationJob {
                kind: JOB_KIND_ANNOUNCEMENT,
                recipient_phone: phone.to_string(),
                body: "hello".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let first = NotificationJobRepo::claim_next(&pool).await.unwrap().unwrap();
    let second = NotificationJobRepo::claim_next(&pool).await.unwrap().unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.status, "SENDING");

    // Queue is drained; nothing further to claim.
    assert!(NotificationJobRepo::claim_next(&pool).await.unwrap().is_none());

    NotificationJobRepo::mark_sent(&pool, first.id).await.unwrap();
    let done = NotificationJobRepo::get(&pool, first.id).await.unwrap().unwrap();
    assert_eq!(done.status, "SENT");
}

#[sqlx::test]
async fn retries_are_deferred_until_their_next_attempt_time(pool: PgPool) {
    let id = NotificationJobRepo::enqueue(
        &pool,
        &NewNotificationJob {
            kind: JOB_KIND_ANNOUNCEMENT,
            recipient_phone: "905551111111".to_string(),
            body: "hello".to_string(),
        },
    )
    .await
    .unwrap();

    let job = NotificationJobRepo::claim_next(&pool).await.unwrap().unwrap();
    assert_eq!(job.id, id);

    // Push the retry one hour out; it must not be claimable now.
    let later = chrono::Utc::now() + chrono::Duration::hours(1);
    NotificationJobRepo::schedule_retry(&pool, id, 1, later, "gateway timeout")
        .await
        .unwrap();
    assert!(NotificationJobRepo::claim_next(&pool).await.unwrap().is_none());

    let stored = NotificationJobRepo::get(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status, "QUEUED");
    assert_eq!(stored.attempts, 1);
    assert_eq!(stored.last_error.as_deref(), Some("gateway timeout"));
}
