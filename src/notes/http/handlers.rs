use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    database::PostgresConnection,
    http_err::{ApiError, ApiResponse},
    notes::{
        commands::NoteCommands,
        domain::{NewNote, NoteCategory},
        queries::{NoteQueries, NoteQuery},
    },
    server::AppState,
    session::AccountContext,
};

use super::reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", post(create_note))
        .route(
            "/notes/:note_id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/notes/:note_id/pin", patch(toggle_note_pin))
        .route("/clients/:client_id/notes", get(get_client_notes))
}

#[derive(Deserialize)]
struct ListNotesParams {
    category: Option<String>,
    #[serde(default)]
    pinned: bool,
    search: Option<String>,
}

async fn get_client_notes(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Path(client_id): Path<i64>,
    Query(params): Query<ListNotesParams>,
) -> ApiResponse<Json<Vec<reps::NoteRep>>> {
    let category = match params.category.as_deref() {
        None => None,
        Some(raw) => match NoteCategory::parse(raw) {
            Some(category) => Some(category),
            None => {
                return Err(ApiError::BadRequest(format!(
                    "Unrecognized note category: {raw}",
                )))
            }
        },
    };

    let notes = db
        .list_notes(NoteQuery {
            user_id: ctx.user_id(),
            client_id,
            category,
            pinned_only: params.pinned,
            search: params.search,
        })
        .await?;

    Ok(Json(notes.iter().map(reps::NoteRep::from).collect()))
}

async fn get_note(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Path(note_id): Path<i64>,
) -> ApiResponse<Json<reps::NoteRep>> {
    let note = db
        .get_note(ctx.user_id(), note_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found.".to_owned()))?;

    Ok(Json((&note).into()))
}

async fn create_note(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Json(payload): Json<reps::NotePayload>,
) -> ApiResponse<(StatusCode, Json<reps::NoteRep>)> {
    let note = NewNote::new(payload.into())?;

    let saved = db.create_note(ctx.user_id(), note).await?;

    Ok((StatusCode::CREATED, Json((&saved).into())))
}

async fn update_note(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Path(note_id): Path<i64>,
    Json(payload): Json<reps::NotePayload>,
) -> ApiResponse<Json<reps::NoteRep>> {
    let update = NewNote::new(payload.into())?;

    let saved = db.update_note(ctx.user_id(), note_id, update).await?;

    Ok(Json((&saved).into()))
}

async fn toggle_note_pin(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Path(note_id): Path<i64>,
) -> ApiResponse<Json<reps::NoteRep>> {
    let note = db.toggle_note_pinned(ctx.user_id(), note_id).await?;

    Ok(Json((&note).into()))
}

async fn delete_note(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Path(note_id): Path<i64>,
) -> ApiResponse<StatusCode> {
    debug!(user_id = ctx.user_id(), note_id, "Deleting note.");

    db.delete_note(ctx.user_id(), note_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
