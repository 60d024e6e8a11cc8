use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::clean_notes;
use crate::error::AppError;

const MAX_WORKOUT_NOTES: usize = 500;

/// Longest accepted single session: 7 days
pub const MAX_DURATION_SEC: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutType {
  Run,
  Bike,
  Swim,
  Hyrox,
  Gym,
}

impl WorkoutType {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Run => "RUN",
      WorkoutType::Bike => "BIKE",
      WorkoutType::Swim => "SWIM",
      WorkoutType::Hyrox => "HYROX",
      WorkoutType::Gym => "GYM",
    }
  }
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
  pub id: i64,
  pub date: NaiveDate,
  #[serde(rename = "type")]
  #[sqlx(rename = "type")]
  pub workout_type: WorkoutType,
  pub duration_sec: i64,
  pub distance_km: Option<f64>,
  pub rpe: i64,
  pub avg_heart_rate: Option<i64>,
  pub avg_power_watts: Option<i64>,
  #[serde(rename = "notas")]
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// For inserting new workouts (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
  pub date: NaiveDate,
  #[serde(rename = "type")]
  pub workout_type: WorkoutType,
  pub duration_sec: i64,
  #[serde(default)]
  pub distance_km: Option<f64>,
  pub rpe: i64,
  #[serde(default)]
  pub avg_heart_rate: Option<i64>,
  #[serde(default)]
  pub avg_power_watts: Option<i64>,
  #[serde(default, rename = "notas")]
  pub notes: Option<String>,
}

impl NewWorkout {
  /// Check field bounds and normalize notes
  pub fn validated(mut self) -> Result<Self, AppError> {
    if self.duration_sec <= 0 {
      return Err(AppError::validation("durationSec must be positive"));
    }
    if self.duration_sec > MAX_DURATION_SEC {
      return Err(AppError::validation(format!(
        "durationSec must be at most {}",
        MAX_DURATION_SEC
      )));
    }
    if !(1..=10).contains(&self.rpe) {
      return Err(AppError::validation("rpe must be between 1 and 10"));
    }
    if let Some(km) = self.distance_km {
      if !km.is_finite() || km <= 0.0 {
        return Err(AppError::validation("distanceKm must be greater than 0"));
      }
    }
    if self.avg_heart_rate.is_some_and(|hr| hr < 0) {
      return Err(AppError::validation("avgHeartRate must not be negative"));
    }
    if self.avg_power_watts.is_some_and(|w| w < 0) {
      return Err(AppError::validation("avgPowerWatts must not be negative"));
    }
    self.notes = clean_notes(self.notes, MAX_WORKOUT_NOTES)?;

    Ok(self)
  }
}
