//! Read-only statistics endpoints under `/api/stats`

use axum::{
  extract::{rejection::QueryRejection, Query, State},
  routing::get,
  Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::AppState;
use crate::error::AppError;
use crate::range::{self, RangeQuery};
use crate::stats::{
  self, BestRunStats, CalendarStats, DayWorkout, HyroxStationStats, PersonalBests, WeeklyStats,
};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
  pub date: NaiveDate,
}

type RangeParams = Result<Query<RangeQuery>, QueryRejection>;

pub struct StatsRoutes;

impl StatsRoutes {
  pub fn routes(state: AppState) -> Router {
    Router::new()
      .route("/api/stats/weekly", get(Self::handle_weekly))
      .route("/api/stats/best-run", get(Self::handle_best_run))
      .route("/api/stats/best-hyrox-stations", get(Self::handle_best_hyrox_stations))
      .route("/api/stats/calendar", get(Self::handle_calendar))
      .route("/api/stats/calendar/day", get(Self::handle_calendar_day))
      .route("/api/stats/personal-bests", get(Self::handle_personal_bests))
      .with_state(state)
  }

  async fn handle_weekly(
    State(state): State<AppState>,
    params: RangeParams,
  ) -> Result<Json<WeeklyStats>, AppError> {
    let Query(query) = params?;
    let stats = stats::weekly(state.store.as_ref(), query, range::today()).await?;
    debug!(from = %stats.from, to = %stats.to, weeks = stats.weeks.len(), "weekly stats");
    Ok(Json(stats))
  }

  async fn handle_best_run(
    State(state): State<AppState>,
    params: RangeParams,
  ) -> Result<Json<BestRunStats>, AppError> {
    let Query(query) = params?;
    let stats = stats::best_run(state.store.as_ref(), query, range::today()).await?;
    Ok(Json(stats))
  }

  async fn handle_best_hyrox_stations(
    State(state): State<AppState>,
    params: RangeParams,
  ) -> Result<Json<HyroxStationStats>, AppError> {
    let Query(query) = params?;
    let stats = stats::best_hyrox_stations(state.store.as_ref(), query, range::today()).await?;
    Ok(Json(stats))
  }

  async fn handle_calendar(
    State(state): State<AppState>,
    params: RangeParams,
  ) -> Result<Json<CalendarStats>, AppError> {
    let Query(query) = params?;
    let stats = stats::calendar(state.store.as_ref(), query, range::today()).await?;
    Ok(Json(stats))
  }

  async fn handle_calendar_day(
    State(state): State<AppState>,
    params: Result<Query<DayQuery>, QueryRejection>,
  ) -> Result<Json<Vec<DayWorkout>>, AppError> {
    let Query(DayQuery { date }) = params?;
    let workouts = stats::calendar_day(state.store.as_ref(), date).await?;
    debug!(%date, count = workouts.len(), "calendar day");
    Ok(Json(workouts))
  }

  async fn handle_personal_bests(
    State(state): State<AppState>,
    params: RangeParams,
  ) -> Result<Json<PersonalBests>, AppError> {
    let Query(query) = params?;
    let bests = stats::personal_bests(state.store.as_ref(), query, range::today()).await?;
    Ok(Json(bests))
  }
}
