//! Route definitions for the schedule projection.

use axum::routing::get;
use axum::Router;

use crate::handlers::schedule;
use crate::state::AppState;

/// Routes mounted at `/schedule`.
///
/// ```text
/// GET /weekly -> weekly
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/weekly", get(schedule::weekly))
}
