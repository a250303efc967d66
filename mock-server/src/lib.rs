//! In-memory stand-in for the social API.
//!
//! Covers the endpoints the client core is exercised against: posts (with
//! pagination and search), likes, follows, the current user, and the
//! presigned media upload flow. Action endpoints (`like`, `follow`) extract a
//! `Json<Map>` body, so a request without a well-formed JSON object body is
//! rejected exactly like the real gateway would.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use url::Url;
use uuid::Uuid;

/// Id of the user every request is authenticated as.
pub const CURRENT_USER_ID: u64 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    pub content: String,
    pub like_count: u64,
}

#[derive(Deserialize)]
pub struct PostCreate {
    pub content: String,
}

#[derive(Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub following: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadRequest {
    pub file_name: String,
    pub content_type: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadResponse {
    pub upload_url: String,
    pub object_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedConfirmRequest {
    pub object_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    pub id: u64,
    pub object_key: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub q: Option<String>,
}

fn default_size() -> u32 {
    20
}

#[derive(Debug, Clone)]
struct StoredUpload {
    content_type: String,
    size: u64,
}

#[derive(Debug)]
pub struct Store {
    origin: String,
    next_id: u64,
    posts: HashMap<u64, Post>,
    likes: HashSet<u64>,
    follows: HashSet<u64>,
    uploads: HashMap<String, StoredUpload>,
}

impl Store {
    fn new(origin: String) -> Self {
        Self {
            origin,
            next_id: 1,
            posts: HashMap::new(),
            likes: HashSet::new(),
            follows: HashSet::new(),
            uploads: HashMap::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Router whose presigned upload URLs point at `origin`
/// (e.g. `http://127.0.0.1:4000`).
pub fn app_with_origin(origin: impl Into<String>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::new(origin.into())));
    Router::new()
        .route("/v1/posts", get(list_posts).post(create_post))
        .route("/v1/posts/search", get(search_posts))
        .route("/v1/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/v1/posts/{id}/like", post(like_post).delete(unlike_post))
        .route("/v1/posts/{id}/like/check", get(has_liked_post))
        .route("/v1/users/me", get(current_user))
        .route("/v1/users/{id}/follow", post(follow_user).delete(unfollow_user))
        .route("/v1/users/{id}/follow/check", get(is_following))
        .route("/v1/media/presigned/upload", post(presign_upload))
        .route("/v1/media/presigned/confirm", post(confirm_upload))
        .route("/uploads/{key}", put(receive_upload))
        .with_state(db)
}

pub fn app() -> Router {
    app_with_origin("http://localhost:3000")
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let origin = format!("http://{}", listener.local_addr()?);
    axum::serve(listener, app_with_origin(origin)).await
}

fn paginate(mut posts: Vec<Post>, page: u32, size: u32) -> Page<Post> {
    posts.sort_by_key(|p| std::cmp::Reverse(p.id));
    let total_elements = posts.len() as u64;
    let size = size.max(1);
    let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
    let content = posts
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();
    Page {
        content,
        number: page,
        size,
        total_elements,
        total_pages,
    }
}

async fn list_posts(State(db): State<Db>, Query(q): Query<PageQuery>) -> Json<Page<Post>> {
    let store = db.read().await;
    Json(paginate(store.posts.values().cloned().collect(), q.page, q.size))
}

async fn search_posts(State(db): State<Db>, Query(q): Query<PageQuery>) -> Json<Page<Post>> {
    let store = db.read().await;
    let needle = q.q.unwrap_or_default().to_lowercase();
    let hits = store
        .posts
        .values()
        .filter(|p| p.content.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(paginate(hits, q.page, q.size))
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<PostCreate>,
) -> (StatusCode, Json<Post>) {
    let mut store = db.write().await;
    let post = Post {
        id: store.allocate_id(),
        author_id: CURRENT_USER_ID,
        content: input.content,
        like_count: 0,
    };
    store.posts.insert(post.id, post.clone());
    (StatusCode::CREATED, Json(post))
}

async fn get_post(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Post>, StatusCode> {
    let store = db.read().await;
    store.posts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<PostUpdate>,
) -> Result<Json<Post>, StatusCode> {
    let mut store = db.write().await;
    let post = store.posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(content) = input.content {
        post.content = content;
    }
    Ok(Json(post.clone()))
}

async fn delete_post(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut store = db.write().await;
    store.likes.remove(&id);
    store
        .posts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .unwrap_or(StatusCode::NOT_FOUND)
}

async fn like_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(_body): Json<Map<String, Value>>,
) -> StatusCode {
    let mut store = db.write().await;
    if !store.posts.contains_key(&id) {
        return StatusCode::NOT_FOUND;
    }
    if !store.likes.insert(id) {
        return StatusCode::CONFLICT;
    }
    if let Some(post) = store.posts.get_mut(&id) {
        post.like_count += 1;
    }
    StatusCode::OK
}

async fn unlike_post(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut store = db.write().await;
    if !store.likes.remove(&id) {
        return StatusCode::NOT_FOUND;
    }
    if let Some(post) = store.posts.get_mut(&id) {
        post.like_count = post.like_count.saturating_sub(1);
    }
    StatusCode::NO_CONTENT
}

async fn has_liked_post(State(db): State<Db>, Path(id): Path<u64>) -> Json<bool> {
    Json(db.read().await.likes.contains(&id))
}

async fn current_user() -> Json<User> {
    Json(User {
        id: CURRENT_USER_ID,
        username: "jane_doe".to_string(),
        email: "jane@example.com".to_string(),
    })
}

async fn follow_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(_body): Json<Map<String, Value>>,
) -> StatusCode {
    if id == CURRENT_USER_ID {
        return StatusCode::BAD_REQUEST;
    }
    let mut store = db.write().await;
    if store.follows.insert(id) {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    }
}

async fn unfollow_user(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut store = db.write().await;
    if store.follows.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn is_following(State(db): State<Db>, Path(id): Path<u64>) -> Json<FollowResponse> {
    Json(FollowResponse {
        following: db.read().await.follows.contains(&id),
    })
}

async fn presign_upload(
    State(db): State<Db>,
    Json(input): Json<PresignedUploadRequest>,
) -> Result<Json<PresignedUploadResponse>, StatusCode> {
    let store = db.read().await;
    let object_key = format!("{}-{}", Uuid::new_v4(), input.file_name);
    Ok(Json(PresignedUploadResponse {
        upload_url: upload_url(&store.origin, &object_key)?,
        object_key,
    }))
}

/// `{origin}/uploads/{key}` with the key percent-encoded as one segment, so
/// file names containing `/` still hit the single-segment upload route.
fn upload_url(origin: &str, object_key: &str) -> Result<String, StatusCode> {
    let mut url = Url::parse(origin).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    url.path_segments_mut()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .pop_if_empty()
        .push("uploads")
        .push(object_key);
    Ok(url.into())
}

async fn receive_upload(
    State(db): State<Db>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = match headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(ct) => ct.to_string(),
        None => return StatusCode::BAD_REQUEST,
    };
    let mut store = db.write().await;
    store.uploads.insert(
        key,
        StoredUpload {
            content_type,
            size: body.len() as u64,
        },
    );
    StatusCode::OK
}

async fn confirm_upload(
    State(db): State<Db>,
    Json(input): Json<PresignedConfirmRequest>,
) -> Result<(StatusCode, Json<MediaUploadResponse>), StatusCode> {
    let mut store = db.write().await;
    let upload = store
        .uploads
        .get(&input.object_key)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    let media = MediaUploadResponse {
        id: store.allocate_id(),
        object_key: input.object_key,
        content_type: upload.content_type,
        size: upload.size,
    };
    Ok((StatusCode::CREATED, Json(media)))
}
