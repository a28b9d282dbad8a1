//! Handlers for the `/duty-types` catalogue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rota_core::error::CoreError;
use rota_core::types::DbId;
use rota_db::models::duty_type::{CreateDutyType, DutyType, UpdateDutyType};
use rota_db::repositories::DutyTypeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/duty-types
pub async fn list_duty_types(
    _actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DutyType>>>> {
    let duty_types = DutyTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: duty_types }))
}

/// POST /api/v1/duty-types (admin)
pub async fn create_duty_type(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CreateDutyType>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;
    input.validate()?;

    let duty_type = DutyTypeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: duty_type })))
}

/// GET /api/v1/duty-types/{id}
pub async fn get_duty_type(
    _actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DutyType>>> {
    let duty_type = DutyTypeRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DutyType",
            id,
        })?;
    Ok(Json(DataResponse { data: duty_type }))
}

/// PUT /api/v1/duty-types/{id} (admin)
pub async fn update_duty_type(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDutyType>,
) -> AppResult<Json<DataResponse<DutyType>>> {
    actor.require_admin()?;
    input.validate()?;

    let duty_type = DutyTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DutyType",
            id,
        })?;
    Ok(Json(DataResponse { data: duty_type }))
}

/// DELETE /api/v1/duty-types/{id} (admin)
pub async fn delete_duty_type(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;

    if !DutyTypeRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "DutyType",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
