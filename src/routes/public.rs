use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// The landing page doubles as the login screen; an authenticated visitor is
/// redirected into the members area by the handler itself.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Landing page with the slider carousel and login form, or a redirect
        // to /secure when the visitor already holds a session.
        .route("/", get(handlers::landing))
        // POST /login
        // Credential check. Success establishes the session and redirects to
        // /secure; failure redirects home with an error notice.
        .route("/login", post(handlers::login))
        // GET /logout
        // Destroys the session and returns to the landing page.
        .route("/logout", get(handlers::logout))
}
