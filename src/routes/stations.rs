//! Hyrox station entries. Entries can only hang off HYROX workouts.

use axum::{
  extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
  },
  http::StatusCode,
  routing::{get, put},
  Json, Router,
};
use tracing::{debug, info};

use super::AppState;
use crate::error::AppError;
use crate::models::{HyroxStationEntry, NewStationEntry, StationPatch, Workout, WorkoutType};
use crate::store::WorkoutStore;

type IdParam = Result<Path<i64>, PathRejection>;

pub struct StationRoutes;

impl StationRoutes {
  pub fn routes(state: AppState) -> Router {
    Router::new()
      .route(
        "/api/workouts/:id/stations",
        get(Self::handle_list_stations).post(Self::handle_create_station),
      )
      .route(
        "/api/stations/:id",
        put(Self::handle_update_station).delete(Self::handle_delete_station),
      )
      .with_state(state)
  }

  async fn handle_list_stations(
    State(state): State<AppState>,
    id: IdParam,
  ) -> Result<Json<Vec<HyroxStationEntry>>, AppError> {
    let Path(workout_id) = id?;
    ensure_hyrox_workout(&state, workout_id).await?;
    Ok(Json(state.store.list_station_entries(workout_id).await?))
  }

  async fn handle_create_station(
    State(state): State<AppState>,
    id: IdParam,
    body: Result<Json<NewStationEntry>, JsonRejection>,
  ) -> Result<(StatusCode, Json<HyroxStationEntry>), AppError> {
    let Path(workout_id) = id?;
    let Json(request) = body?;
    ensure_hyrox_workout(&state, workout_id).await?;

    let entry = request.validated()?;
    let created = state.store.insert_station_entry(workout_id, &entry).await?;

    info!(
      entry_id = created.id,
      workout_id,
      station = %created.station,
      "Station entry created"
    );

    Ok((StatusCode::CREATED, Json(created)))
  }

  async fn handle_update_station(
    State(state): State<AppState>,
    id: IdParam,
    body: Result<Json<StationPatch>, JsonRejection>,
  ) -> Result<Json<HyroxStationEntry>, AppError> {
    let Path(entry_id) = id?;
    let Json(patch) = body?;
    let patch = patch.validated()?;

    if patch.is_empty() {
      debug!(entry_id, "Empty station patch; nothing to update");
    }

    state
      .store
      .update_station_entry(entry_id, &patch)
      .await?
      .map(Json)
      .ok_or_else(|| AppError::not_found(format!("Station entry {}", entry_id)))
  }

  async fn handle_delete_station(
    State(state): State<AppState>,
    id: IdParam,
  ) -> Result<StatusCode, AppError> {
    let Path(entry_id) = id?;

    if state.store.delete_station_entry(entry_id).await? {
      info!(entry_id, "Station entry deleted");
      Ok(StatusCode::NO_CONTENT)
    } else {
      Err(AppError::not_found(format!("Station entry {}", entry_id)))
    }
  }
}

/// Load a workout and require it to be of type HYROX
async fn ensure_hyrox_workout(state: &AppState, workout_id: i64) -> Result<Workout, AppError> {
  let workout = state
    .store
    .get_workout(workout_id)
    .await?
    .ok_or_else(|| AppError::not_found(format!("Workout {}", workout_id)))?;

  if workout.workout_type != WorkoutType::Hyrox {
    return Err(AppError::NotHyroxWorkout(workout_id));
  }
  Ok(workout)
}
