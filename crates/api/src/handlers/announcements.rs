//! Handler for bulk announcements.
//!
//! Accepts an already-parsed recipient list plus a template body and
//! enqueues one notification job per recipient through the same queue the
//! lifecycle notifications use. Spreadsheet parsing is an admin-UI concern
//! and never reaches this service.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use rota_core::error::CoreError;
use rota_events::{AnnouncementRecipient, NotificationDispatcher};

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /announcements/send`.
#[derive(Debug, Deserialize)]
pub struct SendAnnouncement {
    pub recipients: Vec<AnnouncementRecipient>,
    /// Template body with the `{placeholder}` vocabulary.
    pub template: String,
}

/// Response for a queued announcement.
#[derive(Debug, Serialize)]
pub struct AnnouncementQueued {
    pub message: String,
    pub queued_count: u64,
}

/// POST /api/v1/announcements/send (admin)
pub async fn send(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<SendAnnouncement>,
) -> AppResult<Json<DataResponse<AnnouncementQueued>>> {
    actor.require_admin()?;

    if input.recipients.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Recipient list is empty".into(),
        )));
    }
    if input.template.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Announcement template is empty".into(),
        )));
    }

    let queued_count =
        NotificationDispatcher::enqueue_announcement(&state.pool, &input.recipients, &input.template)
            .await?;

    Ok(Json(DataResponse {
        data: AnnouncementQueued {
            message: format!("{queued_count} messages queued"),
            queued_count,
        },
    }))
}
