//! Route definitions for the `/duty-types` catalogue.

use axum::routing::get;
use axum::Router;

use crate::handlers::duty_types;
use crate::state::AppState;

/// Routes mounted at `/duty-types`.
///
/// ```text
/// GET    /        -> list_duty_types
/// POST   /        -> create_duty_type (admin)
/// GET    /{id}    -> get_duty_type
/// PUT    /{id}    -> update_duty_type (admin)
/// DELETE /{id}    -> delete_duty_type (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(duty_types::list_duty_types).post(duty_types::create_duty_type),
        )
        .route(
            "/{id}",
            get(duty_types::get_duty_type)
                .put(duty_types::update_duty_type)
                .delete(duty_types::delete_duty_type),
        )
}
