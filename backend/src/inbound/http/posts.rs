//! Blog post API handlers.
//!
//! ```text
//! GET    /api/v1/posts
//! POST   /api/v1/posts            {"title":"Launch","content":"We are live","tags":["news"]}
//! GET    /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/like
//! DELETE /api/v1/posts/{id}
//! ```
//!
//! Posts follow the same ownership rules as notes, with the author as owner.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PostSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/posts`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Case-insensitive; duplicates are dropped.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreatePostRequest> for PostDraft {
    fn from(value: CreatePostRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            tags: value.tags,
        }
    }
}

/// Listing body for `GET /api/v1/posts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostList {
    pub count: usize,
    #[schema(value_type = Vec<PostSchema>)]
    pub posts: Vec<Post>,
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Visible posts, newest first", body = PostList),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PostList>> {
    let caller = session.require_caller(&state.accounts).await?;
    let posts = state.posts.list_visible(&caller).await?;
    Ok(web::Json(PostList {
        count: posts.len(),
        posts,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post published", body = PostSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    let draft = PostDraft::from(payload.into_inner());
    let post = state.posts.create(&caller, &draft).await?;
    Ok(HttpResponse::Created().json(post))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Post>> {
    let caller = session.require_caller(&state.accounts).await?;
    let post = state
        .posts
        .get(&caller, &PostId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(post))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post with the new like count", body = PostSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "likePost"
)]
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Post>> {
    let caller = session.require_caller(&state.accounts).await?;
    let post = state
        .posts
        .like(&caller, &PostId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(post))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    state
        .posts
        .delete(&caller, &PostId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
