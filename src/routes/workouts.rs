use axum::{
  extract::{rejection::JsonRejection, State},
  http::StatusCode,
  routing::get,
  Json, Router,
};
use tracing::info;

use super::AppState;
use crate::error::AppError;
use crate::models::{NewWorkout, Workout};
use crate::store::WorkoutStore;

pub struct WorkoutRoutes;

impl WorkoutRoutes {
  pub fn routes(state: AppState) -> Router {
    Router::new()
      .route(
        "/api/workouts",
        get(Self::handle_list_workouts).post(Self::handle_create_workout),
      )
      .with_state(state)
  }

  async fn handle_create_workout(
    State(state): State<AppState>,
    body: Result<Json<NewWorkout>, JsonRejection>,
  ) -> Result<(StatusCode, Json<Workout>), AppError> {
    let Json(request) = body?;
    let workout = request.validated()?;
    let created = state.store.insert_workout(&workout).await?;

    info!(
      workout_id = created.id,
      workout_type = %created.workout_type,
      date = %created.date,
      "Workout created"
    );

    Ok((StatusCode::CREATED, Json(created)))
  }

  async fn handle_list_workouts(State(state): State<AppState>) -> Result<Json<Vec<Workout>>, AppError> {
    Ok(Json(state.store.list_workouts().await?))
  }
}
