//! Route definitions for the `/assignments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// GET    /               -> list_assignments (admin)
/// POST   /               -> create_assignment (admin)
/// GET    /my             -> my_today
/// GET    /{id}           -> get_assignment
/// PUT    /{id}           -> update_assignment (admin)
/// DELETE /{id}           -> delete_assignment (admin)
/// POST   /{id}/start     -> start_task
/// POST   /{id}/complete  -> complete_task
/// GET    /{id}/logs      -> list_logs (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route("/my", get(assignments::my_today))
        .route(
            "/{id}",
            get(assignments::get_assignment)
                .put(assignments::update_assignment)
                .delete(assignments::delete_assignment),
        )
        .route("/{id}/start", post(assignments::start_task))
        .route("/{id}/complete", post(assignments::complete_task))
        .route("/{id}/logs", get(assignments::list_logs))
}
