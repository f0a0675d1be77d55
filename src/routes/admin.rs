use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The management control panel. Gated by the `RequireManagement` extractor:
/// only role 3 is admitted, everyone else authenticated is redirected back
/// with a "not authorized" notice, and anonymous visitors are sent home.
///
/// Deliberately outside the member-gate middleware so the Management-level
/// decision table applies unmodified (an inactive account hitting the panel is
/// "not authorized", not the inactive page).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /secure/cp
        // Record counts across all six collections.
        .route("/secure/cp", get(handlers::control_panel))
}
