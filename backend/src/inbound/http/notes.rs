//! Notes API handlers.
//!
//! ```text
//! GET    /api/v1/notes
//! POST   /api/v1/notes       {"title":"Groceries","content":"milk"}
//! GET    /api/v1/notes/{id}
//! PUT    /api/v1/notes/{id}  {"content":"milk, eggs"}
//! DELETE /api/v1/notes/{id}
//! ```
//!
//! Standard accounts only ever see their own notes. Administrators see and
//! manage every note.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Note, NoteDraft, NoteId, NotePatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, NoteSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/notes`. Missing fields fail validation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Body for `PUT /api/v1/notes/{id}`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Listing body for `GET /api/v1/notes`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoteList {
    pub count: usize,
    #[schema(value_type = Vec<NoteSchema>)]
    pub notes: Vec<Note>,
}

#[utoipa::path(
    get,
    path = "/api/v1/notes",
    responses(
        (status = 200, description = "Visible notes, newest first", body = NoteList),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "listNotes"
)]
#[get("/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<NoteList>> {
    let caller = session.require_caller(&state.accounts).await?;
    let notes = state.notes.list_visible(&caller).await?;
    Ok(web::Json(NoteList {
        count: notes.len(),
        notes,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "createNote"
)]
#[post("/notes")]
pub async fn create_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateNoteRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    let CreateNoteRequest { title, content } = payload.into_inner();
    let note = state
        .notes
        .create(&caller, &NoteDraft { title, content })
        .await?;
    Ok(HttpResponse::Created().json(note))
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    params(("id" = Uuid, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "Note", body = NoteSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "getNote"
)]
#[get("/notes/{id}")]
pub async fn get_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Note>> {
    let caller = session.require_caller(&state.accounts).await?;
    let note = state
        .notes
        .get(&caller, &NoteId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(note))
}

#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    params(("id" = Uuid, Path, description = "Note identifier")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = NoteSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "updateNote"
)]
#[put("/notes/{id}")]
pub async fn update_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateNoteRequest>,
) -> ApiResult<web::Json<Note>> {
    let caller = session.require_caller(&state.accounts).await?;
    let UpdateNoteRequest { title, content } = payload.into_inner();
    let note = state
        .notes
        .update(
            &caller,
            &NoteId::from_uuid(path.into_inner()),
            &NotePatch { title, content },
        )
        .await?;
    Ok(web::Json(note))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    params(("id" = Uuid, Path, description = "Note identifier")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "deleteNote"
)]
#[delete("/notes/{id}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(&state.accounts).await?;
    state
        .notes
        .delete(&caller, &NoteId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
