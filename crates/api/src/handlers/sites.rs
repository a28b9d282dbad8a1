//! Handlers for the `/sites` resource and its residents sub-resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rota_core::error::CoreError;
use rota_core::types::DbId;
use rota_db::models::assignment::AssignmentDetail;
use rota_db::models::resident::{CreateResident, Resident};
use rota_db::models::site::{CreateSite, Site, UpdateSite};
use rota_db::repositories::{AssignmentRepo, ResidentRepo, SiteRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sites
pub async fn list_sites(
    _actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Site>>>> {
    let sites = SiteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: sites }))
}

/// POST /api/v1/sites (admin)
pub async fn create_site(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CreateSite>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;
    input.validate()?;

    let site = SiteRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: site })))
}

/// GET /api/v1/sites/{id}
pub async fn get_site(
    _actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Site>>> {
    let site = SiteRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;
    Ok(Json(DataResponse { data: site }))
}

/// PUT /api/v1/sites/{id} (admin)
pub async fn update_site(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSite>,
) -> AppResult<Json<DataResponse<Site>>> {
    actor.require_admin()?;
    input.validate()?;

    let site = SiteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;
    Ok(Json(DataResponse { data: site }))
}

/// DELETE /api/v1/sites/{id} (admin)
///
/// Removes the site together with its residents and assignments.
pub async fn delete_site(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;

    if !SiteRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Site", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sites/{id}/assignments (admin)
pub async fn list_site_assignments(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentDetail>>>> {
    actor.require_admin()?;

    SiteRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;

    let assignments = AssignmentRepo::list_details_for_site(&state.pool, id).await?;
    Ok(Json(DataResponse { data: assignments }))
}

// ---------------------------------------------------------------------------
// Residents
// ---------------------------------------------------------------------------

/// GET /api/v1/sites/{id}/residents
pub async fn list_residents(
    _actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Resident>>>> {
    // Surface an unknown site as 404 rather than an empty list.
    SiteRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;

    let residents = ResidentRepo::list_for_site(&state.pool, id).await?;
    Ok(Json(DataResponse { data: residents }))
}

/// POST /api/v1/sites/{id}/residents (admin)
pub async fn create_resident(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateResident>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;
    input.validate()?;

    SiteRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;

    let resident = ResidentRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: resident })))
}

/// DELETE /api/v1/sites/{id}/residents/{resident_id} (admin)
pub async fn delete_resident(
    actor: Actor,
    State(state): State<AppState>,
    Path((_site_id, resident_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;

    if !ResidentRepo::delete(&state.pool, resident_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Resident",
            id: resident_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
