use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use clubly_core::{
    errors::ClubError,
    models::{
        club::{Club, CreateClubRequest, NewClub},
        non_blank,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_club(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<Club>), AppError> {
    let (Some(name), Some(owner_id)) = (non_blank(&payload.name), non_blank(&payload.owner_id))
    else {
        return Err(ClubError::required("name and owner_id").into());
    };

    let club = state
        .clubs
        .create(NewClub {
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            description: non_blank(&payload.description).map(str::to_string),
        })
        .await
        .map_err(ClubError::Database)?;

    Ok((StatusCode::CREATED, Json(club)))
}

#[axum::debug_handler]
pub async fn get_club(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Club>, AppError> {
    let club = state
        .clubs
        .get_by_id(id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound(format!("Club with ID {} not found", id)))?;

    Ok(Json(club))
}
