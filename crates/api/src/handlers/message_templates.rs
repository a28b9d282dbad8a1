//! Handlers for the `/message-templates` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rota_core::error::CoreError;
use rota_core::types::DbId;
use rota_db::models::message_template::{
    CreateMessageTemplate, MessageTemplate, UpdateMessageTemplate,
};
use rota_db::repositories::MessageTemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/message-templates (admin)
pub async fn list_templates(
    actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MessageTemplate>>>> {
    actor.require_admin()?;

    let templates = MessageTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/message-templates (admin)
pub async fn create_template(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CreateMessageTemplate>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;
    input.validate()?;

    let template = MessageTemplateRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/message-templates/{id} (admin)
pub async fn get_template(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MessageTemplate>>> {
    actor.require_admin()?;

    let template = MessageTemplateRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MessageTemplate",
            id,
        })?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/message-templates/{id} (admin)
pub async fn update_template(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMessageTemplate>,
) -> AppResult<Json<DataResponse<MessageTemplate>>> {
    actor.require_admin()?;
    input.validate()?;

    let template = MessageTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MessageTemplate",
            id,
        })?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/message-templates/{id} (admin)
pub async fn delete_template(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;

    if !MessageTemplateRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "MessageTemplate",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
