//! Route definitions for the `/message-templates` resource. All endpoints
//! are admin-only.

use axum::routing::get;
use axum::Router;

use crate::handlers::message_templates;
use crate::state::AppState;

/// Routes mounted at `/message-templates`.
///
/// ```text
/// GET    /        -> list_templates
/// POST   /        -> create_template
/// GET    /{id}    -> get_template
/// PUT    /{id}    -> update_template
/// DELETE /{id}    -> delete_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(message_templates::list_templates).post(message_templates::create_template),
        )
        .route(
            "/{id}",
            get(message_templates::get_template)
                .put(message_templates::update_template)
                .delete(message_templates::delete_template),
        )
}
