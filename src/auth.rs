use axum::{
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    flash::{Flash, Level},
    views::{self, InactiveTemplate},
};

/// Session key under which the authenticated principal is stored.
pub const PRINCIPAL_KEY: &str = "auth.principal";

/// Notice text attached when an anonymous request hits a secured route.
pub const MUST_LOG_IN: &str = "must be logged in";
/// Notice text attached when an authenticated principal lacks the required role.
pub const NOT_AUTHORIZED: &str = "not authorized";

/// Role
///
/// Named enumeration replacing the integer role codes stored in the `users` table.
/// The mapping is fixed: 0 = Inactive (registered, not yet approved), 1 = Player,
/// 2 = Member, 3 = Management. Codes outside this set must never be admitted;
/// `from_code` returns `None` for them and the gate treats that as insufficient
/// privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Inactive,
    Player,
    Member,
    Management,
}

impl Role {
    /// Resolves a stored integer code into a known role.
    pub fn from_code(code: i16) -> Option<Role> {
        match code {
            0 => Some(Role::Inactive),
            1 => Some(Role::Player),
            2 => Some(Role::Member),
            3 => Some(Role::Management),
            _ => None,
        }
    }

    /// The integer code persisted for this role.
    pub fn code(self) -> i16 {
        match self {
            Role::Inactive => 0,
            Role::Player => 1,
            Role::Member => 2,
            Role::Management => 3,
        }
    }

    /// Whether this role satisfies the given access level.
    /// Member level admits every active role; Management level admits only Management.
    pub fn satisfies(self, level: AccessLevel) -> bool {
        match level {
            AccessLevel::Member => self != Role::Inactive,
            AccessLevel::Management => self == Role::Management,
        }
    }
}

/// Principal
///
/// The resolved identity of the currently authenticated actor, as stored in the
/// session on login. The gate only ever reads the role code from it; mutation of
/// the underlying user record is the repository's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Primary key of the backing user record.
    pub id: Uuid,
    /// Display identity, carried so handlers can stamp authorship without a lookup.
    pub username: String,
    /// Raw role code as persisted. Resolved through `Role::from_code` on every check
    /// so an unrecognized value can never satisfy a level.
    pub role_code: i16,
}

impl Principal {
    pub fn role(&self) -> Option<Role> {
        Role::from_code(self.role_code)
    }
}

/// AccessLevel
///
/// The two required-access levels defined by the gate. `Member` guards the whole
/// `/secure` area; `Management` guards only the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Member,
    Management,
}

/// Decision
///
/// The gate's four normal control outcomes. None of these are errors: the gate
/// performs no I/O and cannot fail independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Request may proceed to its handler.
    Admit,
    /// Principal absent. Redirect to the landing page with a notice.
    RedirectHome { reason: &'static str },
    /// Principal present but not yet approved (role 0). Render the blocking
    /// inactive page. This is the *only* terminal action for that branch: the
    /// principal stays logged in and no notice is queued.
    RenderInactive,
    /// Principal present but the role does not satisfy the level. Redirect back
    /// with a notice.
    RedirectBack { reason: &'static str },
}

/// evaluate_access
///
/// The single authorization decision point guarding every route under `/secure`.
/// A pure function of (principal, required level); side effects (notice push,
/// response construction) belong to the extractor layer below.
pub fn evaluate_access(principal: Option<&Principal>, level: AccessLevel) -> Decision {
    let Some(principal) = principal else {
        return Decision::RedirectHome {
            reason: MUST_LOG_IN,
        };
    };

    match principal.role() {
        // Member-level checks surface the dedicated inactive page for role 0.
        // At Management level an inactive principal is simply "not authorized".
        Some(Role::Inactive) if level == AccessLevel::Member => Decision::RenderInactive,
        Some(role) if role.satisfies(level) => Decision::Admit,
        // Known-but-insufficient roles and unrecognized codes land here alike.
        _ => Decision::RedirectBack {
            reason: NOT_AUTHORIZED,
        },
    }
}

// --- Session lifecycle helpers ---

/// Stores the principal in the session, establishing the authenticated state.
/// Called once after a successful credential check.
pub async fn establish(
    session: &Session,
    principal: &Principal,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(PRINCIPAL_KEY, principal).await
}

/// Destroys the session on explicit logout. Store-side expiry is handled by the
/// session store itself.
pub async fn terminate(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Reads the principal tied to the current request, if any.
async fn current_principal(parts: &Parts) -> Option<Principal> {
    let session = parts.extensions.get::<Session>()?;
    session.get::<Principal>(PRINCIPAL_KEY).await.ok().flatten()
}

// --- Extractors ---

/// CurrentUser
///
/// Optional principal extractor. Never rejects; used by the landing page to
/// decide between rendering and redirecting an already-authenticated visitor.
pub struct CurrentUser(pub Option<Principal>);

impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(current_principal(parts).await))
    }
}

/// GateRejection
///
/// The response form of a non-Admit decision. Constructed by the extractors
/// after any notice push has already happened, so converting to a response is
/// purely mechanical: one render OR one redirect, never both.
pub enum GateRejection {
    RedirectHome,
    RenderInactive,
    RedirectBack(String),
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            GateRejection::RedirectHome => Redirect::to("/").into_response(),
            GateRejection::RenderInactive => views::render(InactiveTemplate),
            GateRejection::RedirectBack(target) => Redirect::to(&target).into_response(),
        }
    }
}

/// Runs the gate for the given level and translates the decision, queueing the
/// flash notice for the redirect outcomes.
async fn run_gate(parts: &mut Parts, level: AccessLevel) -> Result<Principal, GateRejection> {
    let session = parts.extensions.get::<Session>().cloned();
    let principal = match &session {
        Some(session) => session
            .get::<Principal>(PRINCIPAL_KEY)
            .await
            .ok()
            .flatten(),
        None => None,
    };

    match evaluate_access(principal.as_ref(), level) {
        Decision::Admit => match principal {
            Some(principal) => Ok(principal),
            // Admit is only ever produced for a present principal.
            None => Err(GateRejection::RedirectHome),
        },
        Decision::RenderInactive => Err(GateRejection::RenderInactive),
        Decision::RedirectHome { reason } => {
            if let Some(session) = session {
                Flash::new(session).push(Level::Error, reason).await;
            }
            Err(GateRejection::RedirectHome)
        }
        Decision::RedirectBack { reason } => {
            if let Some(session) = session {
                Flash::new(session).push(Level::Error, reason).await;
            }
            Err(GateRejection::RedirectBack(back_target(parts)))
        }
    }
}

/// "Back" is the Referer when the browser sent one, else the secure home.
fn back_target(parts: &Parts) -> String {
    parts
        .headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("/secure")
        .to_string()
}

/// RequireMember
///
/// Extractor guarding every Member-level route. Handlers receive the resolved
/// principal; any non-Admit decision short-circuits the request with the
/// corresponding render or redirect.
pub struct RequireMember(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for RequireMember
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        run_gate(parts, AccessLevel::Member).await.map(RequireMember)
    }
}

/// RequireManagement
///
/// Stricter extractor for the control panel. Only role 3 is admitted.
pub struct RequireManagement(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for RequireManagement
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        run_gate(parts, AccessLevel::Management)
            .await
            .map(RequireManagement)
    }
}
