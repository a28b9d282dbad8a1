//! Event-to-notification fan-out.
//!
//! [`NotificationDispatcher`] subscribes to the event bus and, for each
//! started task, resolves the site's recipients, renders the duty type's
//! message template, and enqueues one durable queue job per recipient.
//! Enqueue problems are logged and swallowed: the lifecycle transition
//! that emitted the event has already committed and must never be affected
//! by the notification path.

use rota_core::template;
use rota_core::types::DbId;
use serde::Deserialize;
use tokio::sync::broadcast;

use rota_db::models::notification_job::{
    NewNotificationJob, JOB_KIND_ANNOUNCEMENT, JOB_KIND_TASK_STARTED,
};
use rota_db::models::resident::{Resident, RESIDENT_TYPE_TENANT};
use rota_db::repositories::{DutyTypeRepo, MessageTemplateRepo, NotificationJobRepo, ResidentRepo};
use rota_db::DbPool;

use crate::bus::TaskEvent;

/// Body used when a duty type has no template configured.
const DEFAULT_TASK_STARTED_TEMPLATE: &str =
    "Hello {first_name}, {duty_type} at {site_name} was started by {staff_name} at {start_time}.";

/// A caller-supplied bulk announcement recipient.
///
/// The list arrives already parsed (spreadsheet handling is an admin-UI
/// concern); each row becomes one queue job with its own rendered body.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementRecipient {
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub unit_number: Option<String>,
    pub balance: Option<String>,
}

/// Routes lifecycle events into notification queue jobs.
pub struct NotificationDispatcher {
    pool: DbPool,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the dispatch loop.
    ///
    /// Consumes events from `receiver` until the bus is dropped. A failure
    /// to dispatch one event never stops the loop.
    pub async fn run(self, mut receiver: broadcast::Receiver<TaskEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.dispatch(&event).await {
                        tracing::warn!(
                            error = %e,
                            event = event.name(),
                            "Failed to enqueue notifications for event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Enqueue the notification jobs for one event.
    ///
    /// Returns the number of jobs enqueued. Completions currently produce no
    /// resident notifications; residents are told when work begins.
    pub async fn dispatch(&self, event: &TaskEvent) -> Result<u64, sqlx::Error> {
        match event {
            TaskEvent::TaskStarted {
                site_id,
                site_name,
                duty_type,
                staff_name,
                started_at,
                ..
            } => {
                self.dispatch_task_started(*site_id, site_name, duty_type, staff_name, *started_at)
                    .await
            }
            TaskEvent::TaskCompleted { assignment_id, .. } => {
                tracing::debug!(assignment_id, "Task completed; no resident notification");
                Ok(0)
            }
        }
    }

    async fn dispatch_task_started(
        &self,
        site_id: DbId,
        site_name: &str,
        duty_type_code: &str,
        staff_name: &str,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, sqlx::Error> {
        let residents = ResidentRepo::list_for_site(&self.pool, site_id).await?;
        if residents.is_empty() {
            tracing::warn!(site_id, "No residents to notify for site");
            return Ok(0);
        }
        let recipients = select_recipients(&residents);

        // Resolve the duty type's display name and template; fall back to a
        // stock body when either is missing.
        let duty_type = DutyTypeRepo::find_by_code(&self.pool, duty_type_code).await?;
        let duty_display = duty_type
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| duty_type_code.to_string());
        let template_body = match duty_type.as_ref().and_then(|d| d.message_template_id) {
            Some(template_id) => MessageTemplateRepo::get(&self.pool, template_id)
                .await?
                .map(|t| t.content),
            None => None,
        };
        let template_body =
            template_body.unwrap_or_else(|| DEFAULT_TASK_STARTED_TEMPLATE.to_string());

        let start_time = started_at
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string();

        let mut enqueued = 0;
        for resident in recipients {
            let body = template::render(
                &template_body,
                &[
                    ("staff_name", staff_name),
                    ("duty_type", &duty_display),
                    ("start_time", &start_time),
                    ("site_name", site_name),
                    ("first_name", resident.first_name.as_deref().unwrap_or("")),
                    ("last_name", resident.last_name.as_deref().unwrap_or("")),
                    ("unit_number", resident.unit_number.as_deref().unwrap_or("")),
                ],
            );

            let job = NewNotificationJob {
                kind: JOB_KIND_TASK_STARTED,
                recipient_phone: resident.phone.clone(),
                body,
            };
            match NotificationJobRepo::enqueue(&self.pool, &job).await {
                Ok(_) => enqueued += 1,
                Err(e) => {
                    // One bad enqueue must not cost the other recipients
                    // their notification.
                    tracing::warn!(
                        error = %e,
                        phone = %resident.phone,
                        "Failed to enqueue notification job"
                    );
                }
            }
        }

        tracing::info!(site_id, enqueued, "Notification jobs enqueued for started task");
        Ok(enqueued)
    }

    /// Enqueue a bulk announcement: one job per recipient, each with its own
    /// rendered body.
    pub async fn enqueue_announcement(
        pool: &DbPool,
        recipients: &[AnnouncementRecipient],
        template_body: &str,
    ) -> Result<u64, sqlx::Error> {
        let mut enqueued = 0;
        for recipient in recipients {
            let body = template::render(
                template_body,
                &[
                    ("first_name", recipient.first_name.as_deref().unwrap_or("")),
                    ("last_name", recipient.last_name.as_deref().unwrap_or("")),
                    ("unit_number", recipient.unit_number.as_deref().unwrap_or("")),
                    ("phone", &recipient.phone),
                    ("balance", recipient.balance.as_deref().unwrap_or("0")),
                ],
            );

            let job = NewNotificationJob {
                kind: JOB_KIND_ANNOUNCEMENT,
                recipient_phone: recipient.phone.clone(),
                body,
            };
            NotificationJobRepo::enqueue(pool, &job).await?;
            enqueued += 1;
        }
        Ok(enqueued)
    }
}

/// Apply the recipient policy to a site's residents.
///
/// Per dwelling unit, a current tenant suppresses the owner-of-record;
/// residents without a unit number are individual recipients.
pub fn select_recipients(residents: &[Resident]) -> Vec<&Resident> {
    let mut selected: Vec<&Resident> = Vec::new();

    let mut units: Vec<&str> = residents
        .iter()
        .filter_map(|r| r.unit_number.as_deref())
        .collect();
    units.sort_unstable();
    units.dedup();

    for unit in units {
        let in_unit: Vec<&Resident> = residents
            .iter()
            .filter(|r| r.unit_number.as_deref() == Some(unit))
            .collect();
        match in_unit
            .iter()
            .find(|r| r.resident_type == RESIDENT_TYPE_TENANT)
        {
            Some(tenant) => selected.push(tenant),
            None => {
                if let Some(first) = in_unit.first() {
                    selected.push(first);
                }
            }
        }
    }

    selected.extend(residents.iter().filter(|r| r.unit_number.is_none()));
    selected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rota_db::models::resident::RESIDENT_TYPE_OWNER;

    fn resident(id: i64, unit: Option<&str>, kind: &str, phone: &str) -> Resident {
        Resident {
            id,
            site_id: 1,
            first_name: Some("Test".to_string()),
            last_name: None,
            unit_number: unit.map(|u| u.to_string()),
            resident_type: kind.to_string(),
            phone: phone.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn tenant_suppresses_owner_in_the_same_unit() {
        let residents = vec![
            resident(1, Some("4A"), RESIDENT_TYPE_OWNER, "905551111111"),
            resident(2, Some("4A"), RESIDENT_TYPE_TENANT, "905552222222"),
        ];
        let selected = select_recipients(&residents);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].phone, "905552222222");
    }

    #[test]
    fn owner_is_used_when_no_tenant_exists() {
        let residents = vec![resident(1, Some("4A"), RESIDENT_TYPE_OWNER, "905551111111")];
        let selected = select_recipients(&residents);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].phone, "905551111111");
    }

    #[test]
    fn units_are_independent_and_unitless_residents_are_kept() {
        let residents = vec![
            resident(1, Some("1"), RESIDENT_TYPE_OWNER, "905551111111"),
            resident(2, Some("2"), RESIDENT_TYPE_TENANT, "905552222222"),
            resident(3, Some("2"), RESIDENT_TYPE_OWNER, "905553333333"),
            resident(4, None, RESIDENT_TYPE_OWNER, "905554444444"),
        ];
        let mut phones: Vec<&str> = select_recipients(&residents)
            .iter()
            .map(|r| r.phone.as_str())
            .collect();
        phones.sort_unstable();
        assert_eq!(
            phones,
            vec!["905551111111", "905552222222", "905554444444"]
        );
    }
}
