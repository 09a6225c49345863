//! In-memory posts backend.
//!
//! Speaks the same REST dialect as the real service: writes are wrapped in a
//! `{"post": {...}}` envelope, a missing post answers `{"error": "..."}` and a
//! validation failure answers `{"errors": [...]}`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct Envelope<T> {
    pub post: T,
}

#[derive(Deserialize)]
pub struct CreatePost {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Post not found")]
    NotFound,
    #[error("validation failed: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ServerError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ServerError::Invalid(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
            }
        }
    }
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    posts: BTreeMap<i64, Post>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).patch(update_post).delete(delete_post))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn validate_title(title: &str) -> Result<(), ServerError> {
    if title.trim().is_empty() {
        return Err(ServerError::Invalid(vec!["Title can't be blank".to_string()]));
    }
    Ok(())
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    let store = db.read().await;
    Json(store.posts.values().cloned().collect())
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<Envelope<CreatePost>>,
) -> Result<(StatusCode, Json<Post>), ServerError> {
    let input = input.post;
    validate_title(&input.title)?;
    let mut store = db.write().await;
    store.next_id += 1;
    let timestamp = now();
    let post = Post {
        id: store.next_id,
        title: input.title,
        content: input.content,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.posts.insert(post.id, post.clone());
    tracing::debug!(id = post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn get_post(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Post>, ServerError> {
    let store = db.read().await;
    store.posts.get(&id).cloned().map(Json).ok_or(ServerError::NotFound)
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Envelope<UpdatePost>>,
) -> Result<Json<Post>, ServerError> {
    let input = input.post;
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    let mut store = db.write().await;
    let post = store.posts.get_mut(&id).ok_or(ServerError::NotFound)?;
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(content) = input.content {
        post.content = Some(content);
    }
    post.updated_at = now();
    Ok(Json(post.clone()))
}

async fn delete_post(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ServerError> {
    let mut store = db.write().await;
    store
        .posts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ServerError::NotFound)
}
