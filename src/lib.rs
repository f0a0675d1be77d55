use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, Method},
    middleware::{self, Next},
    response::Response,
};

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod credentials;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod views;

// Module for routing segregation (Public, Secure, Admin).
pub mod routes;
use auth::RequireMember;
use routes::{admin, public, secure};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::{AppConfig, Env};
pub use repository::{PostgresRepository, RepositoryState};

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and immutable
/// container holding all essential application services and configuration.
/// The application state is shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers to selectively pull components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// member_gate
///
/// A middleware function that enforces the member-level access gate for the
/// secure router as a whole.
///
/// *Mechanism*: It attempts to extract `RequireMember` from the request. If the
/// gate decides anything other than Admit, the extractor immediately rejects
/// the request with the corresponding render or redirect, preventing execution
/// of the handler. Handlers repeat the extraction for their own identity needs,
/// which is free once this layer has admitted the request.
async fn member_gate(_member: RequireMember, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// method_override
///
/// Browsers only submit GET and POST forms, so the update/delete forms POST
/// with a `_method` query parameter naming the intended verb. This middleware
/// rewrites the method before routing; only PUT and DELETE are honored.
async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        let intended = request
            .uri()
            .query()
            .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("_method=")));
        match intended {
            Some("PUT") => *request.method_mut() = Method::PUT,
            Some("DELETE") => *request.method_mut() = Method::DELETE,
            _ => {}
        }
    }
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. Session Layer (Session Store Collaborator)
    // In-process store; cookie settings follow the environment. Expiry is the
    // store's concern (inactivity window from configuration).
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name("club_session")
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(state.config.session_ttl_hours),
        ))
        .with_secure(state.config.env == Env::Production)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/");

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Public Routes: no gate applied.
        .merge(public::public_routes())
        // Secure Routes: protected by the member gate. This implements the
        // first layer of Defense-in-Depth; the handlers' own extractors are
        // the second.
        .merge(secure::secure_routes().route_layer(middleware::from_fn(member_gate)))
        // Control panel: gated at Management level inside its own handler
        // extractor, deliberately outside the member layer.
        .merge(admin::admin_routes())
        // Wildcard: plain not-found message for every unmatched path.
        .fallback(handlers::not_found)
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    let instrumented = base_router.layer(
        ServiceBuilder::new()
            // 3a. Request ID Generation: a unique UUID for every incoming request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 3b. Request Tracing: wraps the request/response lifecycle in a span
            // correlated by the generated request ID.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 3c. Request ID Propagation back to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id))
            // 3d. Sessions, available to every route below the trace stack.
            .layer(session_layer),
    );

    // 4. Method Override
    // Must run *before* routing (Router::layer middleware runs after the route
    // has been matched), so the instrumented router is wrapped as a fallback
    // service of an otherwise-empty outer router.
    Router::new().fallback_service(
        ServiceBuilder::new()
            .layer(middleware::from_fn(method_override))
            .service(instrumented),
    )
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI, so every log
/// line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
