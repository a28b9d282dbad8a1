//! Repository for the append-only `action_logs` table.

use rota_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::action_log::{ActionLog, NewActionLog, RecentActivity};

/// Column list for `action_logs` queries.
const COLUMNS: &str =
    "id, assignment_id, staff_id, action, longitude, latitude, distance_meters, created_at";

/// Append and read operations for the audit trail. There is deliberately no
/// update or standalone delete; entries go away only with their assignment.
pub struct ActionLogRepo;

impl ActionLogRepo {
    /// Append an audit entry inside the caller's transaction.
    pub async fn append_tx(
        conn: &mut PgConnection,
        entry: &NewActionLog,
    ) -> Result<ActionLog, sqlx::Error> {
        sqlx::query_as::<_, ActionLog>(&format!(
            "INSERT INTO action_logs \
                 (assignment_id, staff_id, action, longitude, latitude, distance_meters) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(entry.assignment_id)
        .bind(entry.staff_id)
        .bind(entry.action)
        .bind(entry.longitude)
        .bind(entry.latitude)
        .bind(entry.distance_meters)
        .fetch_one(conn)
        .await
    }

    /// An assignment's audit trail, newest first.
    pub async fn list_for_assignment(
        pool: &PgPool,
        assignment_id: DbId,
    ) -> Result<Vec<ActionLog>, sqlx::Error> {
        sqlx::query_as::<_, ActionLog>(&format!(
            "SELECT {COLUMNS} FROM action_logs \
             WHERE assignment_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(assignment_id)
        .fetch_all(pool)
        .await
    }

    /// The most recent entries across all assignments, with display names
    /// (dashboard activity feed).
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<RecentActivity>, sqlx::Error> {
        sqlx::query_as::<_, RecentActivity>(
            "SELECT l.id, l.assignment_id, l.action, s.name AS staff_name, \
                    p.name AS site_name, a.duty_type, l.created_at \
             FROM action_logs l \
             JOIN assignments a ON a.id = l.assignment_id \
             JOIN staff s ON s.id = l.staff_id \
             JOIN sites p ON p.id = a.site_id \
             ORDER BY l.created_at DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
