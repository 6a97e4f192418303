//! Shared helpers for session integration tests: an in-process stand-in
//! for the remote API and a way to open a session against it.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;

use sitepad::session::{Session, SessionConfig, SessionStore};

pub const GOOD_TOKEN: &str = "good-token";
pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "hunter2";

/// Install a compact tracing subscriber once, honouring RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type Reply = (StatusCode, Json<Value>);

/// Recorded calls and canned answers of the stub remote.
#[derive(Default)]
pub struct Remote {
    pub verify_calls: AtomicUsize,
    pub scrape_calls: AtomicUsize,
    pub team_calls: AtomicUsize,
    pub join_calls: AtomicUsize,
    /// Forces /verify to answer with this status
    pub verify_status: Mutex<Option<StatusCode>>,
    /// Latency of /verify
    pub verify_delay: Mutex<Option<Duration>>,
    /// Latency of create_team, teams/all and join_team
    pub team_delay: Mutex<Option<Duration>>,
    /// Forces every team endpoint to answer with this status and body
    pub team_failure: Mutex<Option<Reply>>,
    /// url -> fragment (or `{error}`) the scraper returns
    pub pages: Mutex<HashMap<String, Value>>,
    /// Per-url latency of the scraper
    pub delays: Mutex<HashMap<String, Duration>>,
    /// Forces /scrape to answer with this status
    pub scrape_status: Mutex<Option<StatusCode>>,
    pub teams: Mutex<BTreeMap<String, (String, BTreeSet<String>)>>,
    /// Body of /teams/all
    pub listing: Mutex<Value>,
}

impl Remote {
    pub fn page(&self, url: &str, body: Value) {
        self.pages.lock().insert(url.to_string(), body);
    }

    pub fn delay(&self, url: &str, delay: Duration) {
        self.delays.lock().insert(url.to_string(), delay);
    }

    pub fn team(&self, id: &str, admin: &str, members: &[&str]) {
        self.teams.lock().insert(
            id.to_string(),
            (
                admin.to_string(),
                members.iter().map(|m| m.to_string()).collect(),
            ),
        );
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn scrape_calls(&self) -> usize {
        self.scrape_calls.load(Ordering::SeqCst)
    }

    pub fn team_calls(&self) -> usize {
        self.team_calls.load(Ordering::SeqCst)
    }

    pub fn join_calls(&self) -> usize {
        self.join_calls.load(Ordering::SeqCst)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", GOOD_TOKEN))
        .unwrap_or(false)
}

fn missing_token() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"msg": "Missing Authorization Header"})),
    )
}

fn team_json(id: &str, admin: &str, members: &BTreeSet<String>) -> Value {
    json!({"team": {"id": id, "admin": admin, "members": members}})
}

async fn lag(delay: &Mutex<Option<Duration>>) {
    let delay = *delay.lock();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

async fn verify(State(remote): State<Arc<Remote>>, headers: HeaderMap) -> Reply {
    remote.verify_calls.fetch_add(1, Ordering::SeqCst);
    lag(&remote.verify_delay).await;
    if let Some(status) = *remote.verify_status.lock() {
        return (status, Json(json!({})));
    }
    if !authorized(&headers) {
        return missing_token();
    }
    (StatusCode::OK, Json(json!({"valid": true, "email": EMAIL})))
}

async fn scrape(State(remote): State<Arc<Remote>>, Json(body): Json<Value>) -> Reply {
    remote.scrape_calls.fetch_add(1, Ordering::SeqCst);
    let url = body["url"].as_str().unwrap_or_default().to_string();

    let delay = remote.delays.lock().get(&url).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = *remote.scrape_status.lock() {
        return (status, Json(json!({})));
    }

    let page = remote.pages.lock().get(&url).cloned();
    match page {
        Some(page) => (StatusCode::OK, Json(page)),
        None => (
            StatusCode::OK,
            Json(json!({"error": format!("could not fetch {}", url)})),
        ),
    }
}

async fn create_team(
    State(remote): State<Arc<Remote>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    remote.team_calls.fetch_add(1, Ordering::SeqCst);
    lag(&remote.team_delay).await;
    if let Some(reply) = remote.team_failure.lock().clone() {
        return reply;
    }
    if !authorized(&headers) {
        return missing_token();
    }
    let id = body["team_id"].as_str().unwrap_or_default().to_string();
    let mut teams = remote.teams.lock();
    if teams.contains_key(&id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Team already exists"})),
        );
    }
    teams.insert(id, (EMAIL.to_string(), [EMAIL.to_string()].into()));
    (
        StatusCode::CREATED,
        Json(json!({"message": "Team created successfully"})),
    )
}

async fn get_team(
    State(remote): State<Arc<Remote>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    remote.team_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return missing_token();
    }
    match remote.teams.lock().get(&id) {
        Some((admin, members)) => (StatusCode::OK, Json(team_json(&id, admin, members))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Team not found"})),
        ),
    }
}

async fn all_teams(State(remote): State<Arc<Remote>>, headers: HeaderMap) -> Reply {
    remote.team_calls.fetch_add(1, Ordering::SeqCst);
    lag(&remote.team_delay).await;
    if let Some(reply) = remote.team_failure.lock().clone() {
        return reply;
    }
    if !authorized(&headers) {
        return missing_token();
    }
    (StatusCode::OK, Json(remote.listing.lock().clone()))
}

async fn join_team(
    State(remote): State<Arc<Remote>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    remote.team_calls.fetch_add(1, Ordering::SeqCst);
    remote.join_calls.fetch_add(1, Ordering::SeqCst);
    lag(&remote.team_delay).await;
    if let Some(reply) = remote.team_failure.lock().clone() {
        return reply;
    }
    if !authorized(&headers) {
        return missing_token();
    }
    let id = body["team_id"].as_str().unwrap_or_default().to_string();
    match remote.teams.lock().get_mut(&id) {
        Some((_, members)) => {
            members.insert(EMAIL.to_string());
            (StatusCode::OK, Json(json!({"message": "Joined team"})))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Team not found"})),
        ),
    }
}

async fn invite(
    State(remote): State<Arc<Remote>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    remote.team_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return missing_token();
    }
    let id = body["team_id"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    match remote.teams.lock().get_mut(&id) {
        Some((admin, members)) if admin == EMAIL => {
            members.insert(email);
            (StatusCode::OK, Json(json!({"message": "Invitation sent"})))
        }
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Only the admin can invite"})),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Team not found"})),
        ),
    }
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        (StatusCode::OK, Json(json!({"token": GOOD_TOKEN})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
    }
}

async fn signup(Json(body): Json<Value>) -> Reply {
    if body["email"] == EMAIL {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({"message": "User created successfully"})),
        )
    }
}

/// Serve the stub on an ephemeral localhost port.
pub async fn spawn_remote() -> (Arc<Remote>, Url) {
    let remote = Arc::new(Remote {
        listing: Mutex::new(json!({"team": []})),
        ..Remote::default()
    });

    let app = Router::new()
        .route("/verify", get(verify))
        .route("/scrape", post(scrape))
        .route("/create_team", post(create_team))
        .route("/team/:id", get(get_team))
        .route("/teams/all", get(all_teams))
        .route("/join_team", post(join_team))
        .route("/invite", post(invite))
        .route("/login", post(login))
        .route("/signup", post(signup))
        .with_state(remote.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub remote");
    let addr: SocketAddr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let url = Url::parse(&format!("http://{}", addr)).expect("stub url");
    (remote, url)
}

/// A session against `remote` with its state in a fresh temp dir.
pub struct Harness {
    pub remote: Arc<Remote>,
    pub session: Session,
    pub dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_token(None).await
    }

    /// Start with `token` already persisted, as if signed in earlier.
    pub async fn with_token(token: Option<&str>) -> Self {
        init_tracing();
        let (remote, url) = spawn_remote().await;
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(SessionStore::new(dir.path()));
        if let Some(token) = token {
            store.save(token).expect("seed token");
        }
        let config = SessionConfig {
            remote: url,
            request_timeout: Duration::from_secs(5),
            verify_timeout: Duration::from_secs(5),
        };
        let session = Session::new(store, &config).expect("session");
        Self {
            remote,
            session,
            dir,
        }
    }

    /// Harness that has already passed the gate.
    pub async fn signed_in() -> (Self, sitepad::session::Authorized) {
        let harness = Self::with_token(Some(GOOD_TOKEN)).await;
        let auth = harness.session.open().await.expect("gate should authorize");
        (harness, auth)
    }

    pub fn token_file(&self) -> std::path::PathBuf {
        self.dir.path().join(sitepad::session::TOKEN_KEY)
    }
}

/// A scrape result with one site holding the given (path, key, body) files.
pub fn page(entries: &[(&str, &str, &str)]) -> Value {
    let mut tree = json!({});
    let mut content = serde_json::Map::new();
    for (path, key, body) in entries {
        let mut node = &mut tree;
        let parts: Vec<&str> = path.split('/').collect();
        for part in &parts[..parts.len() - 1] {
            node = node
                .as_object_mut()
                .expect("directory")
                .entry(part.to_string())
                .or_insert_with(|| json!({}));
        }
        node[parts[parts.len() - 1]] = json!(key);
        content.insert(key.to_string(), json!(body));
    }
    json!({"file_tree": tree, "content": content})
}
