//! Pre-validated actor identity extractor.
//!
//! Authentication itself lives in the upstream gateway, which attaches the
//! verified staff identity to every proxied request as `x-actor-id` and
//! `x-actor-role` headers (and refuses requests from deactivated staff).
//! Handlers consume that identity through this extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rota_core::error::CoreError;
use rota_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Role name granted administrative access.
pub const ROLE_ADMIN: &str = "admin";

/// The authenticated actor for a request.
///
/// Use this as an extractor parameter in any handler that requires an
/// identity:
///
/// ```ignore
/// async fn my_handler(actor: Actor) -> AppResult<Json<()>> {
///     tracing::info!(staff_id = actor.staff_id, role = %actor.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Actor {
    /// The staff member's database id.
    pub staff_id: DbId,
    /// The staff member's role (`admin` or `field`).
    pub role: String,
}

impl Actor {
    /// Guard for admin-only operations.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == ROLE_ADMIN {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "This operation requires the admin role".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let staff_id = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing or invalid x-actor-id header".into(),
                ))
            })?;

        let role = parts
            .headers
            .get("x-actor-role")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing x-actor-role header".into(),
                ))
            })?
            .to_string();

        Ok(Actor { staff_id, role })
    }
}
