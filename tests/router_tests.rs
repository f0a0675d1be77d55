use async_trait::async_trait;
use chrono::Utc;
use club_portal::{
    AppConfig, AppState, create_router,
    credentials::hash_password,
    models::{
        ControlPanelStats, PlayerProfile, Post, PostForm, Slider, Team, Tournament,
        UpdateUserForm, User,
    },
    repository::{Repository, RepositoryState},
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use uuid::Uuid;

// --- Mock Repository ---

/// In-memory repository backing the router tests. Users and posts are real
/// collections so the CRUD flows behave; the roster listings stay static.
#[derive(Default)]
struct MockRepo {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
}

impl MockRepo {
    fn with_user(self, username: &str, password: &str, role: i16) -> Self {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(password).expect("test hash"),
            created: Utc::now(),
            role,
            ..Default::default()
        };
        self.users.lock().unwrap().push(user);
        self
    }

    fn with_post(self, title: &str) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.posts.lock().unwrap().push(Post {
            id,
            title: title.to_string(),
            created: Utc::now(),
            short_desc: "short".to_string(),
            long_desc: "long".to_string(),
            author_username: "seed".to_string(),
            ..Default::default()
        });
        (self, id)
    }

    fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    async fn list_users(&self) -> Vec<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role != 1)
            .cloned()
            .collect()
    }

    async fn create_user(&self, username: String, password_hash: String) -> Option<User> {
        let user = User {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created: Utc::now(),
            role: 0,
            ..Default::default()
        };
        self.users.lock().unwrap().push(user.clone());
        Some(user)
    }

    async fn update_user(&self, id: Uuid, form: UpdateUserForm) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id)?;
        if let Some(role) = form.role {
            user.role = role;
        }
        if form.first_name.is_some() {
            user.first_name = form.first_name;
        }
        if form.email.is_some() {
            user.email = form.email;
        }
        Some(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> bool {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() < before
    }

    async fn list_posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    async fn get_post(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    async fn create_post(
        &self,
        form: PostForm,
        author_id: Uuid,
        author_username: String,
    ) -> Option<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            title: form.title,
            created: Utc::now(),
            image: form.image,
            short_desc: form.short_desc,
            long_desc: form.long_desc,
            author_id,
            author_username,
        };
        self.posts.lock().unwrap().push(post.clone());
        Some(post)
    }

    async fn update_post(&self, id: Uuid, form: PostForm) -> Option<Post> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.iter_mut().find(|p| p.id == id)?;
        post.title = form.title;
        post.short_desc = form.short_desc;
        post.long_desc = form.long_desc;
        Some(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> bool {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        posts.len() < before
    }

    async fn list_players(&self) -> Vec<PlayerProfile> {
        vec![]
    }

    async fn list_teams(&self) -> Vec<Team> {
        vec![]
    }

    async fn list_tournaments(&self) -> Vec<Tournament> {
        vec![]
    }

    async fn list_sliders(&self) -> Vec<Slider> {
        vec![]
    }

    async fn get_stats(&self) -> ControlPanelStats {
        ControlPanelStats {
            total_users: self.users.lock().unwrap().len() as i64,
            total_posts: self.posts.lock().unwrap().len() as i64,
            ..Default::default()
        }
    }
}

// --- Test Harness ---

struct TestApp {
    address: String,
    repo: Arc<MockRepo>,
}

async fn spawn_app(repo: MockRepo) -> TestApp {
    let repo = Arc::new(repo);
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

/// Browser-like client: keeps the session cookie, never follows redirects so
/// each hop can be asserted.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client build")
}

async fn login(app: &TestApp, client: &reqwest::Client, username: &str, password: &str) {
    let resp = client
        .post(format!("{}/login", app.address))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("login request");
    assert!(resp.status().is_redirection());
}

// --- Tests ---

#[tokio::test]
async fn anonymous_secure_request_redirects_home_with_notice() {
    let app = spawn_app(MockRepo::default()).await;
    let client = client();

    let resp = client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/");

    // Exactly one queued notice, shown on the next render...
    let landing = client.get(format!("{}/", app.address)).send().await.unwrap();
    let body = landing.text().await.unwrap();
    assert_eq!(body.matches("must be logged in").count(), 1);

    // ...and gone after it (read-once).
    let landing = client.get(format!("{}/", app.address)).send().await.unwrap();
    let body = landing.text().await.unwrap();
    assert!(!body.contains("must be logged in"));
}

#[tokio::test]
async fn login_establishes_session_and_admits_member() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    let resp = client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Welcome back, alice"));
}

#[tokio::test]
async fn failed_login_leaves_no_session() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let client = client();

    let resp = client
        .post(format!("{}/login", app.address))
        .form(&[("username", "alice"), ("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/");

    let resp = client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection(), "no session should exist");
}

#[tokio::test]
async fn player_role_is_admitted_at_member_level() {
    let app = spawn_app(MockRepo::default().with_user("pro", "secret123", 1)).await;
    let client = client();

    login(&app, &client, "pro", "secret123").await;

    let resp = client
        .get(format!("{}/secure/news", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn inactive_account_gets_blocking_page_not_redirect() {
    let app = spawn_app(MockRepo::default().with_user("newbie", "secret123", 0)).await;
    let client = client();

    login(&app, &client, "newbie", "secret123").await;

    // One terminal action: a render, not a redirect, and the account stays
    // logged in.
    let resp = client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("not active yet"));
}

#[tokio::test]
async fn non_management_is_turned_away_from_control_panel() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    let resp = client
        .get(format!("{}/secure/cp", app.address))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    // No Referer was sent, so "back" falls to the secure home.
    assert_eq!(resp.headers().get("location").unwrap(), "/secure");

    let home = client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert!(home.text().await.unwrap().contains("not authorized"));
}

#[tokio::test]
async fn rejection_notice_surfaces_on_the_referring_form_page() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    // Rejected from a form page: "back" is the Referer, so the form page is
    // the next render and must drain the notice.
    let resp = client
        .get(format!("{}/secure/cp", app.address))
        .header("referer", "/secure/news/new")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/secure/news/new");

    let form_page = client
        .get(format!("{}/secure/news/new", app.address))
        .send()
        .await
        .unwrap();
    assert!(form_page.text().await.unwrap().contains("not authorized"));

    // Drained, so it cannot leak into a later unrelated render.
    let listing = client
        .get(format!("{}/secure/news", app.address))
        .send()
        .await
        .unwrap();
    assert!(!listing.text().await.unwrap().contains("not authorized"));
}

#[tokio::test]
async fn management_reaches_control_panel() {
    let app = spawn_app(MockRepo::default().with_user("boss", "secret123", 3)).await;
    let client = client();

    login(&app, &client, "boss", "secret123").await;

    let resp = client
        .get(format!("{}/secure/cp", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Control panel"));
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    let resp = client
        .get(format!("{}/logout", app.address))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let resp = client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection(), "session must be gone");
}

#[tokio::test]
async fn deleting_nonexistent_post_reports_failure_and_changes_nothing() {
    let (repo, _id) = MockRepo::default()
        .with_user("alice", "secret123", 2)
        .with_post("keep me");
    let app = spawn_app(repo).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    let resp = client
        .delete(format!("{}/secure/news/{}", app.address, Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/secure/news");
    assert_eq!(app.repo.post_count(), 1, "store must be unchanged");

    let listing = client
        .get(format!("{}/secure/news", app.address))
        .send()
        .await
        .unwrap();
    assert!(listing.text().await.unwrap().contains("does not exist"));
}

#[tokio::test]
async fn form_method_override_deletes_post() {
    let (repo, id) = MockRepo::default()
        .with_user("alice", "secret123", 2)
        .with_post("delete me");
    let app = spawn_app(repo).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    // Browser forms can only POST; the override query parameter carries the
    // intended verb.
    let resp = client
        .post(format!("{}/secure/news/{}?_method=DELETE", app.address, id))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(app.repo.post_count(), 0);
}

#[tokio::test]
async fn two_step_user_creation_starts_inactive() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let alice_client = client();

    login(&app, &alice_client, "alice", "secret123").await;

    // Step 1: register username + password; redirected to the step-2 form.
    let resp = alice_client
        .post(format!("{}/secure/users", app.address))
        .form(&[("username", "rookie"), ("password", "secret123")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/secure/users/new/step2/"));

    // The fresh account exists at role 0 and cannot pass the member gate.
    let rookie_client = client();
    login(&app, &rookie_client, "rookie", "secret123").await;
    let resp = rookie_client
        .get(format!("{}/secure", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("not active yet"));
}

#[tokio::test]
async fn wildcard_returns_plain_not_found_message() {
    let app = spawn_app(MockRepo::default()).await;
    let client = client();

    let resp = client
        .get(format!("{}/no/such/page", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.text().await.unwrap(),
        "This page does not exist! Please go back!"
    );
}

#[tokio::test]
async fn landing_redirects_authenticated_visitor_to_secure() {
    let app = spawn_app(MockRepo::default().with_user("alice", "secret123", 2)).await;
    let client = client();

    login(&app, &client, "alice", "secret123").await;

    let resp = client.get(format!("{}/", app.address)).send().await.unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/secure");
}
