//! Route definitions for the `/sites` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::sites;
use crate::state::AppState;

/// Routes mounted at `/sites`.
///
/// ```text
/// GET    /                                 -> list_sites
/// POST   /                                 -> create_site (admin)
/// GET    /{id}                             -> get_site
/// PUT    /{id}                             -> update_site (admin)
/// DELETE /{id}                             -> delete_site (admin)
/// GET    /{id}/assignments                 -> list_site_assignments (admin)
/// GET    /{id}/residents                   -> list_residents
/// POST   /{id}/residents                   -> create_resident (admin)
/// DELETE /{id}/residents/{resident_id}     -> delete_resident (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sites::list_sites).post(sites::create_site))
        .route(
            "/{id}",
            get(sites::get_site)
                .put(sites::update_site)
                .delete(sites::delete_site),
        )
        .route("/{id}/assignments", get(sites::list_site_assignments))
        .route(
            "/{id}/residents",
            get(sites::list_residents).post(sites::create_resident),
        )
        .route(
            "/{id}/residents/{resident_id}",
            delete(sites::delete_resident),
        )
}
