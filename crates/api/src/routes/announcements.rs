//! Route definitions for bulk announcements.

use axum::routing::post;
use axum::Router;

use crate::handlers::announcements;
use crate::state::AppState;

/// Routes mounted at `/announcements`.
///
/// ```text
/// POST /send -> send (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/send", post(announcements::send))
}
