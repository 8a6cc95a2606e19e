//! Integration tests for the HTTP transport and remote-backed store.
//!
//! An in-process axum server plays the remote `/users` collection so the
//! full request path (reqwest, JSON, status handling, timeouts) is
//! exercised without leaving localhost.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use usersync::error::{FetchCause, Operation};
use usersync::models::StoreMode;
use usersync::remote::{HttpUserApi, UserApi};
use usersync::store::{StoreOptions, UserStore};
use usersync::{Gender, StoreError, UserDraft, UserId};

// ---------------------------------------------------------------------------
// fake remote collection
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Collection {
    users: Vec<Value>,
    next_id: u64,
    requests: Vec<String>,
}

type Db = Arc<Mutex<Collection>>;

async fn list_users(State(db): State<Db>) -> Json<Vec<Value>> {
    let mut db = db.lock().unwrap();
    db.requests.push("GET /users".into());
    Json(db.users.clone())
}

async fn create_user(State(db): State<Db>, Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut db = db.lock().unwrap();
    db.requests.push("POST /users".into());
    db.next_id += 1;
    body["id"] = json!(db.next_id);
    db.users.insert(0, body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut db = db.lock().unwrap();
    db.requests.push(format!("PUT /users/{id}"));
    let slot = db
        .users
        .iter_mut()
        .find(|u| u["id"] == json!(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = body.clone();
    Ok(Json(body))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut db = db.lock().unwrap();
    db.requests.push(format!("DELETE /users/{id}"));
    let before = db.users.len();
    db.users.retain(|u| u["id"] != json!(id));
    if db.users.len() < before {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Start a fake collection seeded like the placeholder API (no gender field).
async fn fake_remote() -> (String, Db) {
    let db: Db = Arc::new(Mutex::new(Collection {
        users: vec![
            json!({"id": 1, "name": "Leanne Graham", "username": "Bret",
                   "email": "Sincere@april.biz", "phone": "1-770-736-8031",
                   "website": "hildegard.org", "company": {"name": "Romaguera-Crona"}}),
            json!({"id": 2, "name": "Ervin Howell", "username": "Antonette",
                   "email": "Shanna@melissa.tv", "phone": "010-692-6593",
                   "website": "anastasia.net"}),
        ],
        next_id: 10,
        requests: Vec::new(),
    }));

    let router = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", axum::routing::put(update_user).delete(delete_user))
        .with_state(db.clone());

    (serve(router).await, db)
}

fn remote_store(base_url: &str) -> UserStore {
    let api = HttpUserApi::new(base_url, Duration::from_secs(5)).unwrap();
    UserStore::remote(Arc::new(api))
}

fn requests(db: &Db) -> Vec<String> {
    db.lock().unwrap().requests.clone()
}

// ---------------------------------------------------------------------------
// remote-backed store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_loads_listing_and_fills_gender() {
    let (url, _db) = fake_remote().await;
    let mut store = remote_store(&url);

    let users = store.refresh().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, UserId::Int(1));
    assert_eq!(users[0].username, "Bret");
    assert!(users.iter().all(|u| u.gender == Gender::Male));
    assert_eq!(store.mode(), StoreMode::Remote);
}

#[tokio::test]
async fn create_posts_and_adopts_server_id() {
    let (url, db) = fake_remote().await;
    let mut store = remote_store(&url);
    store.refresh().await.unwrap();

    let draft = UserDraft {
        gender: Gender::Female,
        ..UserDraft::new("Ann", "ann1", "ann@x.com")
    };
    let created = store.create(draft).await.unwrap();

    assert_eq!(created.id, UserId::Int(11));
    assert_eq!(created.gender, Gender::Female);
    assert_eq!(store.list()[0], created);
    assert_eq!(store.len(), 3);

    // The POST body carried the draft without an id.
    let stored = db.lock().unwrap().users[0].clone();
    assert_eq!(stored["name"], "Ann");
    assert_eq!(stored["gender"], "female");
    assert_eq!(requests(&db), vec!["GET /users", "POST /users"]);
}

#[tokio::test]
async fn update_puts_full_record() {
    let (url, db) = fake_remote().await;
    let mut store = remote_store(&url);
    store.refresh().await.unwrap();
    let untouched = store.list()[0].clone();

    let mut draft = store.edit(&UserId::Int(2)).unwrap();
    draft.name = "Bea".into();
    let updated = store.update(&UserId::Int(2), draft).await.unwrap();

    assert_eq!(updated.name, "Bea");
    assert_eq!(updated.id, UserId::Int(2));
    assert_eq!(store.list()[1], updated);
    assert_eq!(store.list()[0], untouched);

    let remote_copy = db.lock().unwrap().users[1].clone();
    assert_eq!(remote_copy["id"], 2);
    assert_eq!(remote_copy["name"], "Bea");
    assert_eq!(remote_copy["username"], "Antonette");
}

#[tokio::test]
async fn delete_removes_remotely_then_locally() {
    let (url, db) = fake_remote().await;
    let mut store = remote_store(&url);
    store.refresh().await.unwrap();

    store.delete(&UserId::Int(1)).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].id, UserId::Int(2));
    assert_eq!(db.lock().unwrap().users.len(), 1);
    assert_eq!(requests(&db), vec!["GET /users", "DELETE /users/1"]);
}

#[tokio::test]
async fn delete_of_remotely_missing_user_still_removes_locally() {
    let (url, db) = fake_remote().await;
    let mut store = remote_store(&url);
    store.refresh().await.unwrap();
    db.lock().unwrap().users.retain(|u| u["id"] != json!(2));

    store.delete(&UserId::Int(2)).await.unwrap();
    assert!(store.get(&UserId::Int(2)).is_none());
}

#[tokio::test]
async fn update_rejected_by_server_leaves_collection() {
    let (url, db) = fake_remote().await;
    let mut store = remote_store(&url);
    store.refresh().await.unwrap();
    let before = store.list().to_vec();
    db.lock().unwrap().users.clear();

    let err = store
        .update(&UserId::Int(1), UserDraft::new("X", "x", "x@x.com"))
        .await
        .unwrap_err();

    match err {
        StoreError::FetchFailed(e) => {
            assert_eq!(e.operation, Operation::Update);
            assert!(matches!(e.cause, FetchCause::Status { code: 404, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.list(), before.as_slice());
}

#[tokio::test]
async fn local_mode_reads_remote_but_never_writes() {
    let (url, db) = fake_remote().await;
    let api = HttpUserApi::new(&url, Duration::from_secs(5)).unwrap();
    let mut store = UserStore::local_with_source(Arc::new(api));

    store.refresh().await.unwrap();
    store.create(UserDraft::new("Ann", "ann1", "ann@x.com")).await.unwrap();
    store.delete(&UserId::Int(1)).await.unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(requests(&db), vec!["GET /users"]);
    assert_eq!(db.lock().unwrap().users.len(), 2);
}

// ---------------------------------------------------------------------------
// failure modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_status_is_fetch_failed() {
    let router = Router::new().route(
        "/users",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
    );
    let url = serve(router).await;
    let mut store = remote_store(&url).with_records([UserDraft::new("Ann", "a", "a@x.com")
        .into_record(UserId::Int(1))]);

    let err = store.refresh().await.unwrap_err();
    assert_eq!(
        err.fetch_cause(),
        Some(&FetchCause::Status {
            code: 500,
            body: "database unavailable".into()
        })
    );
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn malformed_body_is_decode_failure() {
    let router = Router::new().route("/users", get(|| async { "<html>not json</html>" }));
    let url = serve(router).await;
    let mut store = remote_store(&url);

    let err = store.refresh().await.unwrap_err();
    assert!(matches!(err.fetch_cause(), Some(FetchCause::Decode(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn slow_server_times_out() {
    let router = Router::new().route(
        "/users",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(Vec::<Value>::new())
        }),
    );
    let url = serve(router).await;
    let timeout = Duration::from_millis(200);
    let api = HttpUserApi::new(&url, timeout).unwrap();
    let options = StoreOptions {
        timeout,
        ..StoreOptions::default()
    };
    let mut store = UserStore::remote(Arc::new(api)).with_options(options);

    let err = store.refresh().await.unwrap_err();
    assert_eq!(err.fetch_cause(), Some(&FetchCause::Timeout(timeout)));
}

#[tokio::test]
async fn connection_refused_is_transport_failure() {
    // Bind and drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpUserApi::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = api.list().await.unwrap_err();
    assert_eq!(err.operation, Operation::List);
    assert!(matches!(err.cause, FetchCause::Transport(_)));
}
