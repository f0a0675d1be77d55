use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Secure Router Module
///
/// Defines the routes accessible to any principal the member gate admits
/// (Player, Member or Management). Every handler takes the `RequireMember`
/// extractor, so anonymous visitors are redirected home with a notice and
/// unapproved accounts (role 0) get the blocking inactive page.
///
/// The news and users sections are full CRUD; the roster pages are read-only
/// listings.
pub fn secure_routes() -> Router<AppState> {
    Router::new()
        // GET /secure
        // Members-area dashboard.
        .route("/secure", get(handlers::secure_home))
        // --- News ---
        // GET lists every post newest-first; POST publishes a new one with
        // authorship stamped from the session principal.
        .route(
            "/secure/news",
            get(handlers::news_index).post(handlers::news_create),
        )
        // GET /secure/news/new
        // Blank post form.
        .route("/secure/news/new", get(handlers::news_new))
        // GET/PUT/DELETE /secure/news/{id}
        // Single-post view, update and delete. Misses redirect back to the
        // listing with a notice.
        .route(
            "/secure/news/{id}",
            get(handlers::news_show)
                .put(handlers::news_update)
                .delete(handlers::news_delete),
        )
        // GET /secure/news/{id}/edit
        .route("/secure/news/{id}/edit", get(handlers::news_edit))
        // --- Users ---
        // GET lists the member directory; POST is step 1 of the two-step
        // creation flow (username + password, role starts inactive).
        .route(
            "/secure/users",
            get(handlers::users_index).post(handlers::users_create),
        )
        // GET /secure/users/new
        // Step-1 form.
        .route("/secure/users/new", get(handlers::users_new))
        // GET /secure/users/new/step2/{id}
        // Step-2 profile-completion form for the freshly registered account.
        .route("/secure/users/new/step2/{id}", get(handlers::users_step2))
        // GET/PUT/DELETE /secure/users/{id}
        .route(
            "/secure/users/{id}",
            get(handlers::users_show)
                .put(handlers::users_update)
                .delete(handlers::users_delete),
        )
        // GET /secure/users/{id}/edit
        .route("/secure/users/{id}/edit", get(handlers::users_edit))
        // --- Rosters (read-only) ---
        .route("/secure/players", get(handlers::players))
        .route("/secure/teams", get(handlers::teams))
        .route("/secure/tournaments", get(handlers::tournaments))
}
