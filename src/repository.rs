use crate::models::{
    ControlPanelStats, PlayerProfile, Post, PostForm, Slider, Team, Tournament, UpdateUserForm,
    User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations over the six
/// record collections (users, posts, players, teams, tournaments, sliders).
/// Handlers interact with the data layer through this trait without knowing the
/// concrete implementation (Postgres, Mock, etc.).
///
/// Failure semantics: no method returns an error. Underlying store failures are
/// logged at the implementation and recovered to `None`/`false`/empty, so a
/// persistence outage degrades to a "not found" flow instead of crashing the
/// request handler.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users / Credentials ---
    // Credential lookup for the authenticator. Includes the password hash.
    async fn find_user_by_username(&self, username: &str) -> Option<User>;
    async fn get_user(&self, id: Uuid) -> Option<User>;
    // Member directory: every non-player account, newest first.
    async fn list_users(&self) -> Vec<User>;
    // Step 1 of user creation: username + hash only, role starts at 0 (inactive).
    async fn create_user(&self, username: String, password_hash: String) -> Option<User>;
    // Step 2 / edit: partial profile update via COALESCE semantics.
    async fn update_user(&self, id: Uuid, form: UpdateUserForm) -> Option<User>;
    async fn delete_user(&self, id: Uuid) -> bool;

    // --- News Posts ---
    async fn list_posts(&self) -> Vec<Post>;
    async fn get_post(&self, id: Uuid) -> Option<Post>;
    // Authorship is stamped from the session principal, never from the form.
    async fn create_post(
        &self,
        form: PostForm,
        author_id: Uuid,
        author_username: String,
    ) -> Option<Post>;
    async fn update_post(&self, id: Uuid, form: PostForm) -> Option<Post>;
    async fn delete_post(&self, id: Uuid) -> bool;

    // --- Rosters (read-only listings) ---
    async fn list_players(&self) -> Vec<PlayerProfile>;
    async fn list_teams(&self) -> Vec<Team>;
    async fn list_tournaments(&self) -> Vec<Tournament>;
    async fn list_sliders(&self) -> Vec<Slider>;

    // --- Control Panel ---
    async fn get_stats(&self) -> ControlPanelStats;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
/// Uses the runtime-checked query API throughout so the crate builds without a
/// live database connection.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, username, password_hash, created, avatar, first_name, last_name, \
                            email, department, job, team, game, role";

const POST_COLUMNS: &str = "id, title, created, image, short_desc, long_desc, author_id, author_username";

#[async_trait]
impl Repository for PostgresRepository {
    /// find_user_by_username
    ///
    /// Credential lookup used by the authenticator. The caller never learns
    /// whether the miss was "no such user" or a store failure; both degrade to
    /// the same failed-login flow.
    async fn find_user_by_username(&self, username: &str) -> Option<User> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("find_user_by_username error: {:?}", e);
                None
            })
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    /// list_users
    ///
    /// The member directory excludes player accounts (role 1); those appear on
    /// the roster pages instead. Newest accounts first.
    async fn list_users(&self) -> Vec<User> {
        let sql = format!(
            "SELECT {} FROM users WHERE role <> 1 ORDER BY created DESC",
            USER_COLUMNS
        );
        match sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("list_users error: {:?}", e);
                vec![]
            }
        }
    }

    /// create_user
    ///
    /// Inserts the step-1 registration record. New accounts always start at
    /// role 0 (inactive) and must be approved via the edit flow before the
    /// member gate admits them.
    async fn create_user(&self, username: String, password_hash: String) -> Option<User> {
        let sql = format!(
            "INSERT INTO users (id, username, password_hash, created, role) \
             VALUES ($1, $2, $3, NOW(), 0) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("create_user error: {:?}", e);
                None
            })
    }

    /// update_user
    ///
    /// Uses the PostgreSQL `COALESCE` function to handle `Option<T>` fields,
    /// only updating a column if the corresponding form field is `Some`.
    async fn update_user(&self, id: Uuid, form: UpdateUserForm) -> Option<User> {
        let sql = format!(
            "UPDATE users SET \
                avatar = COALESCE($2, avatar), \
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name), \
                email = COALESCE($5, email), \
                department = COALESCE($6, department), \
                job = COALESCE($7, job), \
                team = COALESCE($8, team), \
                game = COALESCE($9, game), \
                role = COALESCE($10, role) \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(form.avatar)
            .bind(form.first_name)
            .bind(form.last_name)
            .bind(form.email)
            .bind(form.department)
            .bind(form.job)
            .bind(form.team)
            .bind(form.game)
            .bind(form.role)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("update_user error: {:?}", e);
                None
            })
    }

    async fn delete_user(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_user error: {:?}", e);
                false
            }
        }
    }

    /// list_posts
    ///
    /// News feed, newest first.
    async fn list_posts(&self) -> Vec<Post> {
        let sql = format!("SELECT {} FROM posts ORDER BY created DESC", POST_COLUMNS);
        match sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("list_posts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_post(&self, id: Uuid) -> Option<Post> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_post error: {:?}", e);
                None
            })
    }

    async fn create_post(
        &self,
        form: PostForm,
        author_id: Uuid,
        author_username: String,
    ) -> Option<Post> {
        let sql = format!(
            "INSERT INTO posts (id, title, created, image, short_desc, long_desc, author_id, author_username) \
             VALUES ($1, $2, NOW(), $3, $4, $5, $6, $7) RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(form.title)
            .bind(form.image)
            .bind(form.short_desc)
            .bind(form.long_desc)
            .bind(author_id)
            .bind(author_username)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("create_post error: {:?}", e);
                None
            })
    }

    async fn update_post(&self, id: Uuid, form: PostForm) -> Option<Post> {
        let sql = format!(
            "UPDATE posts SET title = $2, image = $3, short_desc = $4, long_desc = $5 \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(form.title)
            .bind(form.image)
            .bind(form.short_desc)
            .bind(form.long_desc)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("update_post error: {:?}", e);
                None
            })
    }

    async fn delete_post(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_post error: {:?}", e);
                false
            }
        }
    }

    async fn list_players(&self) -> Vec<PlayerProfile> {
        match sqlx::query_as::<_, PlayerProfile>(
            "SELECT id, ingame_name, first_name, last_name, profile_pic, date_of_birth, \
                    twitter, twitch, facebook \
             FROM players ORDER BY ingame_name ASC",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(players) => players,
            Err(e) => {
                tracing::error!("list_players error: {:?}", e);
                vec![]
            }
        }
    }

    async fn list_teams(&self) -> Vec<Team> {
        match sqlx::query_as::<_, Team>(
            "SELECT id, game, pic, profile_pic, manager, coach, trainer \
             FROM teams ORDER BY game ASC",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(teams) => teams,
            Err(e) => {
                tracing::error!("list_teams error: {:?}", e);
                vec![]
            }
        }
    }

    async fn list_tournaments(&self) -> Vec<Tournament> {
        match sqlx::query_as::<_, Tournament>(
            "SELECT id, title, image, short_desc, long_desc, created, location, game, \
                    duration, author \
             FROM tournaments ORDER BY created DESC",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(tournaments) => tournaments,
            Err(e) => {
                tracing::error!("list_tournaments error: {:?}", e);
                vec![]
            }
        }
    }

    async fn list_sliders(&self) -> Vec<Slider> {
        match sqlx::query_as::<_, Slider>("SELECT id, title, image FROM sliders ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await
        {
            Ok(sliders) => sliders,
            Err(e) => {
                tracing::error!("list_sliders error: {:?}", e);
                vec![]
            }
        }
    }

    /// get_stats
    ///
    /// Compiles all necessary counters for the management control panel in a single call.
    async fn get_stats(&self) -> ControlPanelStats {
        let count = |sql: &'static str| {
            let pool = self.pool.clone();
            async move {
                sqlx::query_scalar::<_, i64>(sql)
                    .fetch_one(&pool)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!("get_stats error: {:?}", e);
                        0
                    })
            }
        };

        ControlPanelStats {
            total_users: count("SELECT COUNT(*) FROM users").await,
            pending_users: count("SELECT COUNT(*) FROM users WHERE role = 0").await,
            total_posts: count("SELECT COUNT(*) FROM posts").await,
            total_players: count("SELECT COUNT(*) FROM players").await,
            total_teams: count("SELECT COUNT(*) FROM teams").await,
            total_tournaments: count("SELECT COUNT(*) FROM tournaments").await,
        }
    }
}
