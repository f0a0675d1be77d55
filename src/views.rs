use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    flash::Notice,
    models::{ControlPanelStats, PlayerProfile, Post, Slider, Team, Tournament, User},
};

/// render
///
/// Renders a template to a response, mapping render failures to a plain 500.
/// Template errors are a programming defect, not a user condition, so the body
/// stays generic and the detail goes to the log.
pub fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

// --- Public pages ---

/// Landing page: slider carousel plus the login form.
#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub sliders: Vec<Slider>,
    pub notices: Vec<Notice>,
}

/// Blocking page shown to authenticated-but-unapproved accounts (role 0).
#[derive(Template)]
#[template(path = "inactive.html")]
pub struct InactiveTemplate;

// --- Member area ---

#[derive(Template)]
#[template(path = "secure/home.html")]
pub struct SecureHomeTemplate {
    pub username: String,
    pub tournaments: Vec<Tournament>,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/news/index.html")]
pub struct NewsIndexTemplate {
    pub posts: Vec<Post>,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/news/new.html")]
pub struct NewsNewTemplate {
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/news/show.html")]
pub struct NewsShowTemplate {
    pub post: Post,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/news/edit.html")]
pub struct NewsEditTemplate {
    pub post: Post,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/users/index.html")]
pub struct UsersIndexTemplate {
    pub users: Vec<User>,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/users/new.html")]
pub struct UserNewTemplate {
    pub notices: Vec<Notice>,
}

/// Step 2 of the two-step user creation flow: profile completion for the
/// freshly registered (still inactive) account.
#[derive(Template)]
#[template(path = "secure/users/step2.html")]
pub struct UserStep2Template {
    pub user: User,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/users/show.html")]
pub struct UserShowTemplate {
    pub user: User,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/users/edit.html")]
pub struct UserEditTemplate {
    pub user: User,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/players.html")]
pub struct PlayersTemplate {
    pub players: Vec<PlayerProfile>,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/teams.html")]
pub struct TeamsTemplate {
    pub teams: Vec<Team>,
    pub notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "secure/tournaments.html")]
pub struct TournamentsTemplate {
    pub tournaments: Vec<Tournament>,
    pub notices: Vec<Notice>,
}

// --- Management area ---

#[derive(Template)]
#[template(path = "secure/cp.html")]
pub struct ControlPanelTemplate {
    pub stats: ControlPanelStats,
    pub notices: Vec<Notice>,
}
