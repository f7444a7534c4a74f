use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use quill_types::api::{Claims, CreateCategoryRequest, UpdateCategoryRequest};
use quill_types::models::Category;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let categories: Vec<Category> = state
        .db
        .list_categories()?
        .into_iter()
        .map(convert::category)
        .collect::<anyhow::Result<_>>()?;

    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_category(&id.to_string())?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(convert::category(row)?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let category_id = Uuid::new_v4();
    state
        .db
        .insert_category(&category_id.to_string(), &req.name, &req.description)?;

    let row = state
        .db
        .get_category(&category_id.to_string())?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("category missing after insert")))?;

    Ok((StatusCode::CREATED, Json(convert::category(row)?)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = &req.name {
        validate_name(name)?;
    }

    let row = state
        .db
        .get_category(&id.to_string())?
        .ok_or(ApiError::NotFound)?;

    let name = req.name.unwrap_or(row.name);
    let description = req.description.unwrap_or(row.description);

    state.db.update_category(&id.to_string(), &name, &description)?;

    let row = state
        .db
        .get_category(&id.to_string())?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("category missing after update")))?;

    Ok(Json(convert::category(row)?))
}

/// Refused while posts still reference the category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.db.delete_category(&id.to_string()).map_err(|e| {
        if quill_db::is_constraint_violation(&e) {
            ApiError::Conflict("category still has posts".into())
        } else {
            ApiError::Internal(e)
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() || name.chars().count() > 100 {
        return Err(ApiError::BadRequest("name must be 1-100 characters".into()));
    }
    Ok(())
}
