use crate::{
    AppState,
    auth::{self, CurrentUser, RequireManagement, RequireMember},
    credentials::{self, Authenticator},
    flash::Flash,
    models::{LoginForm, PostForm, RegisterUserForm, UpdateUserForm},
    views::{
        self, ControlPanelTemplate, LandingTemplate, NewsEditTemplate, NewsIndexTemplate,
        NewsNewTemplate, NewsShowTemplate, PlayersTemplate, SecureHomeTemplate, TeamsTemplate,
        TournamentsTemplate, UserEditTemplate, UserNewTemplate, UserShowTemplate,
        UserStep2Template, UsersIndexTemplate,
    },
};
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

// --- Public Handlers ---

/// landing
///
/// [Public Route] The landing page: slider carousel plus the login form.
/// An already-authenticated visitor is sent straight to the members area.
pub async fn landing(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    if principal.is_some() {
        return Redirect::to("/secure").into_response();
    }
    let sliders = state.repo.list_sliders().await;
    views::render(LandingTemplate {
        sliders,
        notices: flash.drain_all().await,
    })
}

/// login
///
/// [Public Route] Verifies the credential pair and establishes the session.
/// Success redirects into the members area; failure redirects home with an
/// error notice and leaves no session behind.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    flash: Flash,
    Form(form): Form<LoginForm>,
) -> Response {
    let authenticator = Authenticator::new(state.repo.clone());
    match authenticator
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(principal) => {
            if let Err(e) = auth::establish(&session, &principal).await {
                tracing::error!("session establish error: {:?}", e);
                flash.error("Login failed, please try again.").await;
                return Redirect::to("/").into_response();
            }
            Redirect::to("/secure").into_response()
        }
        Err(_) => {
            flash.error("Invalid username or password.").await;
            Redirect::to("/").into_response()
        }
    }
}

/// logout
///
/// [Public Route] Destroys the session and returns to the landing page.
/// Safe to call anonymously; terminating an empty session is a no-op.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = auth::terminate(&session).await {
        tracing::error!("session terminate error: {:?}", e);
    }
    Redirect::to("/").into_response()
}

/// not_found
///
/// [Wildcard] Plain-text fallback for every unmatched path.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "This page does not exist! Please go back!",
    )
}

// --- Member Area ---

/// secure_home
///
/// [Member Route] Members-area dashboard with the upcoming tournaments.
pub async fn secure_home(
    RequireMember(principal): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let tournaments = state.repo.list_tournaments().await;
    views::render(SecureHomeTemplate {
        username: principal.username,
        tournaments,
        notices: flash.drain_all().await,
    })
}

/// news_index
///
/// [Member Route] Lists every news post, newest first.
pub async fn news_index(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let posts = state.repo.list_posts().await;
    views::render(NewsIndexTemplate {
        posts,
        notices: flash.drain_all().await,
    })
}

/// news_new
///
/// [Member Route] Blank form for a new post. Form pages drain the notice queue
/// like every other render; a rejection that redirected back here must surface
/// its notice now, not on some later page.
pub async fn news_new(RequireMember(_): RequireMember, flash: Flash) -> Response {
    views::render(NewsNewTemplate {
        notices: flash.drain_all().await,
    })
}

/// news_create
///
/// [Member Route] Creates a post. Authorship is stamped from the session
/// principal, never from the form.
pub async fn news_create(
    RequireMember(principal): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<PostForm>,
) -> Response {
    match state
        .repo
        .create_post(form, principal.id, principal.username)
        .await
    {
        Some(_) => flash.success("Post published.").await,
        None => flash.error("Could not save the post.").await,
    }
    Redirect::to("/secure/news").into_response()
}

/// news_show
///
/// [Member Route] Single-post view. A miss redirects back to the listing with
/// a notice rather than surfacing an error page.
pub async fn news_show(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    match state.repo.get_post(id).await {
        Some(post) => views::render(NewsShowTemplate {
            post,
            notices: flash.drain_all().await,
        }),
        None => {
            flash.error("That post does not exist.").await;
            Redirect::to("/secure/news").into_response()
        }
    }
}

/// news_edit
///
/// [Member Route] Pre-filled edit form for an existing post.
pub async fn news_edit(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    match state.repo.get_post(id).await {
        Some(post) => views::render(NewsEditTemplate {
            post,
            notices: flash.drain_all().await,
        }),
        None => {
            flash.error("That post does not exist.").await;
            Redirect::to("/secure/news").into_response()
        }
    }
}

/// news_update
///
/// [Member Route] Applies the edit form. A missing record and a store failure
/// both land on the not-found path; the store is never left half-updated.
pub async fn news_update(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
    Form(form): Form<PostForm>,
) -> Response {
    match state.repo.update_post(id, form).await {
        Some(post) => {
            flash.success("Post updated.").await;
            Redirect::to(&format!("/secure/news/{}", post.id)).into_response()
        }
        None => {
            flash.error("That post does not exist.").await;
            Redirect::to("/secure/news").into_response()
        }
    }
}

/// news_delete
///
/// [Member Route] Deletes a post. Deleting a nonexistent id leaves the store
/// unchanged and reports failure through the notice channel.
pub async fn news_delete(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    if state.repo.delete_post(id).await {
        flash.success("Post deleted.").await;
    } else {
        flash.error("That post does not exist.").await;
    }
    Redirect::to("/secure/news").into_response()
}

/// users_index
///
/// [Member Route] The member directory (player accounts are listed on the
/// roster pages instead).
pub async fn users_index(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let users = state.repo.list_users().await;
    views::render(UsersIndexTemplate {
        users,
        notices: flash.drain_all().await,
    })
}

/// users_new
///
/// [Member Route] Step 1 of user creation: username and password only.
pub async fn users_new(RequireMember(_): RequireMember, flash: Flash) -> Response {
    views::render(UserNewTemplate {
        notices: flash.drain_all().await,
    })
}

/// users_create
///
/// [Member Route] Registers the step-1 account at role 0 (inactive) and moves
/// on to the profile-completion form. The new account cannot pass the member
/// gate until someone raises its role.
pub async fn users_create(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<RegisterUserForm>,
) -> Response {
    let password_hash = match credentials::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("password hash error: {:?}", e);
            flash.error("Could not create the user.").await;
            return Redirect::to("/secure/users").into_response();
        }
    };

    match state.repo.create_user(form.username, password_hash).await {
        Some(user) => {
            Redirect::to(&format!("/secure/users/new/step2/{}", user.id)).into_response()
        }
        None => {
            flash.error("Could not create the user.").await;
            Redirect::to("/secure/users").into_response()
        }
    }
}

/// users_step2
///
/// [Member Route] Profile-completion form for a freshly registered account.
pub async fn users_step2(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    match state.repo.get_user(id).await {
        Some(user) => views::render(UserStep2Template {
            user,
            notices: flash.drain_all().await,
        }),
        None => {
            flash.error("That user does not exist.").await;
            Redirect::to("/secure/users").into_response()
        }
    }
}

/// users_show
///
/// [Member Route] A single user profile.
pub async fn users_show(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    match state.repo.get_user(id).await {
        Some(user) => views::render(UserShowTemplate {
            user,
            notices: flash.drain_all().await,
        }),
        None => {
            flash.error("That user does not exist.").await;
            Redirect::to("/secure/users").into_response()
        }
    }
}

/// users_edit
///
/// [Member Route] Pre-filled edit form for an existing user.
pub async fn users_edit(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    match state.repo.get_user(id).await {
        Some(user) => views::render(UserEditTemplate {
            user,
            notices: flash.drain_all().await,
        }),
        None => {
            flash.error("That user does not exist.").await;
            Redirect::to("/secure/users").into_response()
        }
    }
}

/// users_update
///
/// [Member Route] Applies the profile form (step 2 and later edits share it).
/// Raising the role code here is what activates an account.
pub async fn users_update(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
    Form(form): Form<UpdateUserForm>,
) -> Response {
    match state.repo.update_user(id, form).await {
        Some(user) => {
            flash.success("User updated.").await;
            Redirect::to(&format!("/secure/users/{}", user.id)).into_response()
        }
        None => {
            flash.error("That user does not exist.").await;
            Redirect::to("/secure/users").into_response()
        }
    }
}

/// users_delete
///
/// [Member Route] Removes an account. A miss reports failure through the
/// notice channel and leaves the store unchanged.
pub async fn users_delete(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
    Path(id): Path<Uuid>,
) -> Response {
    if state.repo.delete_user(id).await {
        flash.success("User deleted.").await;
    } else {
        flash.error("That user does not exist.").await;
    }
    Redirect::to("/secure/users").into_response()
}

/// players
///
/// [Member Route] Competitive roster listing.
pub async fn players(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let players = state.repo.list_players().await;
    views::render(PlayersTemplate {
        players,
        notices: flash.drain_all().await,
    })
}

/// teams
///
/// [Member Route] Team roster listing.
pub async fn teams(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let teams = state.repo.list_teams().await;
    views::render(TeamsTemplate {
        teams,
        notices: flash.drain_all().await,
    })
}

/// tournaments
///
/// [Member Route] Tournament listing.
pub async fn tournaments(
    RequireMember(_): RequireMember,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let tournaments = state.repo.list_tournaments().await;
    views::render(TournamentsTemplate {
        tournaments,
        notices: flash.drain_all().await,
    })
}

// --- Management Area ---

/// control_panel
///
/// [Management Route] Record counts for the club. The only route gated at
/// Management level; everyone below role 3 is redirected back with a notice.
pub async fn control_panel(
    RequireManagement(_): RequireManagement,
    State(state): State<AppState>,
    flash: Flash,
) -> Response {
    let stats = state.repo.get_stats().await;
    views::render(ControlPanelTemplate {
        stats,
        notices: flash.drain_all().await,
    })
}
