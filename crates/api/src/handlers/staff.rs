//! Handlers for the `/staff` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rota_core::error::CoreError;
use rota_core::types::DbId;
use rota_db::models::staff::{CreateStaff, Staff, UpdateStaff};
use rota_db::repositories::StaffRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Strip formatting from a phone number, keeping digits only.
fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// GET /api/v1/staff (admin)
pub async fn list_staff(
    actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Staff>>>> {
    actor.require_admin()?;

    let staff = StaffRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: staff }))
}

/// POST /api/v1/staff (admin)
pub async fn create_staff(
    actor: Actor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateStaff>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;
    input.validate()?;
    input.phone = normalize_phone(&input.phone);

    if StaffRepo::find_by_phone(&state.pool, &input.phone)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "This phone number is already registered".into(),
        )));
    }

    let staff = StaffRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: staff })))
}

/// GET /api/v1/staff/{id} (admin)
pub async fn get_staff(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Staff>>> {
    actor.require_admin()?;

    let staff = StaffRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Staff", id })?;
    Ok(Json(DataResponse { data: staff }))
}

/// PUT /api/v1/staff/{id} (admin)
pub async fn update_staff(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateStaff>,
) -> AppResult<Json<DataResponse<Staff>>> {
    actor.require_admin()?;
    input.validate()?;
    if let Some(phone) = &input.phone {
        input.phone = Some(normalize_phone(phone));
    }

    let staff = StaffRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Staff", id })?;
    Ok(Json(DataResponse { data: staff }))
}

/// DELETE /api/v1/staff/{id} (admin)
///
/// Removes the staff member and their assignments; historical audit entries
/// go with the assignments.
pub async fn delete_staff(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;

    if !StaffRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Staff", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::normalize_phone;

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize_phone("+90 (555) 111-11-11"), "905551111111");
        assert_eq!(normalize_phone("905551111111"), "905551111111");
    }
}
