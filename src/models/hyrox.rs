//! Hyrox station splits recorded inside a HYROX workout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clean_notes;
use crate::error::AppError;

const MAX_STATION_NOTES: usize = 300;

/// The eight fixed Hyrox race stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HyroxStation {
  SkiErg,
  SledPush,
  SledPull,
  BurpeeBroadJumps,
  Row,
  FarmersCarry,
  SandbagLunges,
  WallBalls,
}

impl HyroxStation {
  pub const ALL: [HyroxStation; 8] = [
    HyroxStation::SkiErg,
    HyroxStation::SledPush,
    HyroxStation::SledPull,
    HyroxStation::BurpeeBroadJumps,
    HyroxStation::Row,
    HyroxStation::FarmersCarry,
    HyroxStation::SandbagLunges,
    HyroxStation::WallBalls,
  ];

  /// Stored key; stats order stations by this text
  pub fn as_str(&self) -> &'static str {
    match self {
      HyroxStation::SkiErg => "SKI_ERG",
      HyroxStation::SledPush => "SLED_PUSH",
      HyroxStation::SledPull => "SLED_PULL",
      HyroxStation::BurpeeBroadJumps => "BURPEE_BROAD_JUMPS",
      HyroxStation::Row => "ROW",
      HyroxStation::FarmersCarry => "FARMERS_CARRY",
      HyroxStation::SandbagLunges => "SANDBAG_LUNGES",
      HyroxStation::WallBalls => "WALL_BALLS",
    }
  }
}

impl std::fmt::Display for HyroxStation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HyroxStationEntry {
  pub id: i64,
  pub workout_id: i64,
  pub station: HyroxStation,
  pub load_kg: Option<f64>,
  pub series: Option<i64>,
  pub reps: Option<i64>,
  pub split_sec: Option<i64>,
  pub distance_m: Option<i64>,
  #[serde(rename = "notas")]
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// For inserting new station entries (workout id comes from the path)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStationEntry {
  pub station: HyroxStation,
  #[serde(default)]
  pub load_kg: Option<f64>,
  #[serde(default)]
  pub series: Option<i64>,
  #[serde(default)]
  pub reps: Option<i64>,
  #[serde(default)]
  pub split_sec: Option<i64>,
  #[serde(default)]
  pub distance_m: Option<i64>,
  #[serde(default, rename = "notas")]
  pub notes: Option<String>,
}

impl NewStationEntry {
  pub fn validated(mut self) -> Result<Self, AppError> {
    check_measurements(self.load_kg, self.series, self.reps, self.split_sec, self.distance_m)?;
    self.notes = clean_notes(self.notes, MAX_STATION_NOTES)?;
    Ok(self)
  }
}

/// Partial update for a station entry.
///
/// A `None` field means "not supplied" and leaves the stored value alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPatch {
  #[serde(default)]
  pub load_kg: Option<f64>,
  #[serde(default)]
  pub series: Option<i64>,
  #[serde(default)]
  pub reps: Option<i64>,
  #[serde(default)]
  pub split_sec: Option<i64>,
  #[serde(default)]
  pub distance_m: Option<i64>,
  #[serde(default, rename = "notas")]
  pub notes: Option<String>,
}

impl StationPatch {
  pub fn validated(mut self) -> Result<Self, AppError> {
    check_measurements(self.load_kg, self.series, self.reps, self.split_sec, self.distance_m)?;
    if let Some(notes) = self.notes.take() {
      // Blank notes in a patch clear nothing; they are treated as not supplied
      self.notes = clean_notes(Some(notes), MAX_STATION_NOTES)?;
    }
    Ok(self)
  }

  pub fn is_empty(&self) -> bool {
    self.load_kg.is_none()
      && self.series.is_none()
      && self.reps.is_none()
      && self.split_sec.is_none()
      && self.distance_m.is_none()
      && self.notes.is_none()
  }

  /// Merge supplied fields onto an existing entry
  pub fn apply(&self, entry: &mut HyroxStationEntry) {
    if let Some(load) = self.load_kg {
      entry.load_kg = Some(load);
    }
    if let Some(series) = self.series {
      entry.series = Some(series);
    }
    if let Some(reps) = self.reps {
      entry.reps = Some(reps);
    }
    if let Some(split) = self.split_sec {
      entry.split_sec = Some(split);
    }
    if let Some(distance) = self.distance_m {
      entry.distance_m = Some(distance);
    }
    if let Some(notes) = &self.notes {
      entry.notes = Some(notes.clone());
    }
  }
}

fn check_measurements(
  load_kg: Option<f64>,
  series: Option<i64>,
  reps: Option<i64>,
  split_sec: Option<i64>,
  distance_m: Option<i64>,
) -> Result<(), AppError> {
  if let Some(load) = load_kg {
    if !load.is_finite() || load <= 0.0 {
      return Err(AppError::validation("loadKg must be greater than 0"));
    }
  }
  for (name, value) in [
    ("series", series),
    ("reps", reps),
    ("splitSec", split_sec),
    ("distanceM", distance_m),
  ] {
    if value.is_some_and(|v| v < 0) {
      return Err(AppError::validation(format!("{} must not be negative", name)));
    }
  }
  Ok(())
}
