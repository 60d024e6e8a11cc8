//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::models::{HyroxStation, NewStationEntry, NewWorkout, Workout, WorkoutType};
use chrono::{Days, NaiveDate, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert a workout row directly, bypassing request validation.
/// Used to reproduce legacy rows such as a zero distance.
pub async fn insert_raw_workout(
  pool: &SqlitePool,
  date: NaiveDate,
  workout_type: &str,
  duration_sec: i64,
  distance_km: Option<f64>,
) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO workouts (date, type, duration_sec, distance_km, rpe, created_at)
    VALUES (?1, ?2, ?3, ?4, 5, ?5)
    "#,
  )
  .bind(date)
  .bind(workout_type)
  .bind(duration_sec)
  .bind(distance_km)
  .bind(Utc::now())
  .execute(pool)
  .await
  .expect("Failed to insert raw workout");

  result.last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_new_workout(
  workout_type: WorkoutType,
  date: NaiveDate,
  duration_sec: i64,
  distance_km: Option<f64>,
) -> NewWorkout {
  NewWorkout {
    date,
    workout_type,
    duration_sec,
    distance_km,
    rpe: 6,
    avg_heart_rate: Some(145),
    avg_power_watts: None,
    notes: None,
  }
}

/// A stored workout with id 0; stores assign the real id
pub fn mock_workout(
  workout_type: WorkoutType,
  date: NaiveDate,
  duration_sec: i64,
  distance_km: Option<f64>,
) -> Workout {
  Workout {
    id: 0,
    date,
    workout_type,
    duration_sec,
    distance_km,
    rpe: 6,
    avg_heart_rate: None,
    avg_power_watts: None,
    notes: None,
    created_at: Utc::now(),
  }
}

pub fn mock_station_entry(station: HyroxStation, split_sec: Option<i64>) -> NewStationEntry {
  NewStationEntry {
    station,
    load_kg: Some(20.0),
    series: Some(1),
    reps: None,
    split_sec,
    distance_m: None,
    notes: None,
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Local calendar date N days ago
pub fn date_days_ago(days: u64) -> NaiveDate {
  let today = crate::range::today();
  today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'hyrox_station_entries')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let workout = mock_new_workout(WorkoutType::Run, day, 1800, Some(6.0));
    assert!(workout.validated().is_ok());

    let entry = mock_station_entry(HyroxStation::Row, Some(240));
    assert!(entry.validated().is_ok());

    let stored = mock_workout(WorkoutType::Swim, day, 1200, None);
    assert_eq!(stored.workout_type, WorkoutType::Swim);
  }

  #[test]
  fn test_date_helper_counts_back() {
    let today = crate::range::today();
    let past = date_days_ago(7);
    let diff = today - past;
    // Allow for the clock crossing midnight between the two calls
    assert!((6..=7).contains(&diff.num_days()), "Expected ~7 days, got {}", diff.num_days());
  }
}
