//! Route definitions for the `/staff` resource. All endpoints are
//! admin-only.

use axum::routing::get;
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Routes mounted at `/staff`.
///
/// ```text
/// GET    /        -> list_staff
/// POST   /        -> create_staff
/// GET    /{id}    -> get_staff
/// PUT    /{id}    -> update_staff
/// DELETE /{id}    -> delete_staff
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
}
