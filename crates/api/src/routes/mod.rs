pub mod announcements;
pub mod assignments;
pub mod dashboard;
pub mod duty_types;
pub mod health;
pub mod message_templates;
pub mod schedule;
pub mod sites;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sites                                   list, create (admin)
/// /sites/{id}                              get, update, delete (admin)
/// /sites/{id}/assignments                  find-by-site (admin)
/// /sites/{id}/residents                    list, create (admin)
/// /sites/{id}/residents/{resident_id}      delete (admin)
///
/// /staff                                   list, create (admin)
/// /staff/{id}                              get, update, delete (admin)
///
/// /duty-types                              list, create (admin)
/// /duty-types/{id}                         get, update, delete (admin)
///
/// /message-templates                       list, create (admin)
/// /message-templates/{id}                  get, update, delete (admin)
///
/// /assignments                             list (admin), create (admin)
/// /assignments/my                          calling staff member's today view
/// /assignments/{id}                        get, update (admin), delete (admin)
/// /assignments/{id}/start                  start today's occurrence
/// /assignments/{id}/complete               complete today's occurrence
/// /assignments/{id}/logs                   audit trail (admin)
///
/// /schedule/weekly                         week-by-staff grid
/// /dashboard/stats                         summary counts (admin)
/// /announcements/send                      bulk announcement (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sites", sites::router())
        .nest("/staff", staff::router())
        .nest("/duty-types", duty_types::router())
        .nest("/message-templates", message_templates::router())
        .nest("/assignments", assignments::router())
        .nest("/schedule", schedule::router())
        .nest("/dashboard", dashboard::router())
        .nest("/announcements", announcements::router())
}
