use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use quill_types::api::{Claims, CreatePostRequest, UpdatePostRequest};
use quill_types::models::Post;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    // Run blocking DB reads off the async runtime
    let db = state.clone();
    let limit = query.limit.min(200);

    let rows = tokio::task::spawn_blocking(move || db.db.list_posts(limit))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!(e))
        })??;

    let posts: Vec<Post> = rows
        .into_iter()
        .map(convert::post)
        .collect::<anyhow::Result<_>>()?;

    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_post(&id.to_string())?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(convert::post(row)?))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_title(&req.title)?;
    validate_body(&req.body)?;

    let post_id = Uuid::new_v4();

    let db = state.clone();
    let author_id = claims.sub.to_string();
    let row = tokio::task::spawn_blocking(move || {
        db.db
            .insert_post(
                &post_id.to_string(),
                &author_id,
                &req.category_id.to_string(),
                &req.title,
                &req.body,
            )
            .map_err(|e| {
                if quill_db::is_constraint_violation(&e) {
                    ApiError::Unprocessable("category does not exist".into())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        let row = db
            .db
            .get_post(&post_id.to_string())?
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("post missing after insert")))?;
        Ok::<_, ApiError>(row)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow::anyhow!(e))
    })??;

    Ok((StatusCode::CREATED, Json(convert::post(row)?)))
}

/// Partial update; only the author may touch their post.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    if let Some(body) = &req.body {
        validate_body(body)?;
    }

    let row = state
        .db
        .get_post(&id.to_string())?
        .ok_or(ApiError::NotFound)?;
    if row.user_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    let title = req.title.unwrap_or(row.title);
    let body = req.body.unwrap_or(row.body);
    let category_id = req
        .category_id
        .map(|c| c.to_string())
        .unwrap_or(row.category_id);

    state
        .db
        .update_post(&id.to_string(), &title, &body, &category_id)
        .map_err(|e| {
            if quill_db::is_constraint_violation(&e) {
                ApiError::Unprocessable("category does not exist".into())
            } else {
                ApiError::Internal(e)
            }
        })?;

    let row = state
        .db
        .get_post(&id.to_string())?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("post missing after update")))?;

    Ok(Json(convert::post(row)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_post(&id.to_string())?
        .ok_or(ApiError::NotFound)?;
    if row.user_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    state.db.delete_post(&id.to_string())?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() || title.chars().count() > 200 {
        return Err(ApiError::BadRequest("title must be 1-200 characters".into()));
    }
    Ok(())
}

fn validate_body(body: &str) -> Result<(), ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("body must not be empty".into()));
    }
    Ok(())
}
