use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A club member record from the `users` table. Doubles as the credential
/// store: the argon2 password hash lives here but is never serialized out.
/// The `role` code drives the access gate (0 inactive, 1 player, 2 member,
/// 3 management).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2 PHC string. Excluded from every serialized payload.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created: DateTime<Utc>,
    pub avatar: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub job: Option<String>,
    pub team: Option<String>,
    pub game: Option<String>,
    /// Raw access-gate code. Interpreted through `auth::Role::from_code` only.
    pub role: i16,
}

/// Post
///
/// A news post from the `posts` table. Authorship is stamped from the session
/// principal at creation time, never taken from the form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub created: DateTime<Utc>,
    pub image: Option<String>,
    pub short_desc: String,
    pub long_desc: String,
    pub author_id: Uuid,
    pub author_username: String,
}

/// PlayerProfile
///
/// Competitive profile data from the `players` table: social handles and the
/// in-game identity shown on the roster pages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct PlayerProfile {
    pub id: Uuid,
    pub ingame_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_pic: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub twitter: Option<String>,
    pub twitch: Option<String>,
    pub facebook: Option<String>,
}

/// Team
///
/// A roster entry from the `teams` table, keyed by the game it competes in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Team {
    pub id: Uuid,
    pub game: String,
    pub pic: Option<String>,
    pub profile_pic: Option<String>,
    pub manager: Option<String>,
    pub coach: Option<String>,
    pub trainer: Option<String>,
}

/// Tournament
///
/// An event record from the `tournaments` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Tournament {
    pub id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub short_desc: String,
    pub long_desc: String,
    pub created: DateTime<Utc>,
    pub location: Option<String>,
    pub game: Option<String>,
    pub duration: Option<String>,
    pub author: Option<String>,
}

/// Slider
///
/// A landing-page carousel entry from the `sliders` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Slider {
    pub id: Uuid,
    pub title: String,
    pub image: String,
}

// --- Request Payloads (Form Schemas) ---

/// LoginForm
///
/// Credential pair for POST /login. The password is handed to the
/// authenticator for verification and never persisted or logged.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// PostForm
///
/// Payload for creating or updating a news post. The same form backs both
/// operations; authorship fields are deliberately absent.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PostForm {
    pub title: String,
    pub image: Option<String>,
    pub short_desc: String,
    pub long_desc: String,
}

/// RegisterUserForm
///
/// Step 1 of the two-step user creation flow: username and password only.
/// The resulting account starts at role 0 (inactive) until the step-2 form
/// completes the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserForm {
    pub username: String,
    pub password: String,
}

/// UpdateUserForm
///
/// Step 2 / edit payload: profile details plus the role code. All fields are
/// optional so partial edits leave untouched columns alone.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateUserForm {
    pub avatar: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub job: Option<String>,
    pub team: Option<String>,
    pub game: Option<String>,
    pub role: Option<i16>,
}

// --- Dashboard Schemas (Output) ---

/// ControlPanelStats
///
/// Record counts shown on the management control panel.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ControlPanelStats {
    pub total_users: i64,
    pub pending_users: i64,
    pub total_posts: i64,
    pub total_players: i64,
    pub total_teams: i64,
    pub total_tournaments: i64,
}
