//! Persistence seams.
//!
//! `WorkoutStore` owns writes and plain reads of workouts and station
//! entries. `StatsStore` holds the read-only aggregation queries used by the
//! stats endpoints. Both are implemented by [`SqliteStore`] for the server
//! and by [`InMemoryStore`] for tests.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StoreResult;
use crate::models::{
  HyroxStation, HyroxStationEntry, NewStationEntry, NewWorkout, StationPatch, Workout,
};
use crate::range::DateRange;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// ---------------------------------------------------------------------------
/// Aggregation Rows
/// ---------------------------------------------------------------------------

/// One Monday-aligned training week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct WeekVolumeRow {
  pub week_start: NaiveDate,
  pub total_sec: i64,
  pub sessions: i64,
}

/// Raw inputs of a distance-based "best" result; the metric itself is
/// derived by the assembler
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DistanceEffortRow {
  pub workout_id: i64,
  pub date: NaiveDate,
  pub duration_sec: i64,
  pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StationBestRow {
  pub station: HyroxStation,
  pub best_sec: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CalendarDayRow {
  pub date: NaiveDate,
  pub sessions: i64,
  pub total_sec: i64,
}

/// ---------------------------------------------------------------------------
/// Store Traits
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait WorkoutStore: Send + Sync {
  async fn insert_workout(&self, workout: &NewWorkout) -> StoreResult<Workout>;

  /// All workouts, newest date first
  async fn list_workouts(&self) -> StoreResult<Vec<Workout>>;

  async fn get_workout(&self, id: i64) -> StoreResult<Option<Workout>>;

  /// Entries of one workout in creation order
  async fn list_station_entries(&self, workout_id: i64) -> StoreResult<Vec<HyroxStationEntry>>;

  async fn insert_station_entry(
    &self,
    workout_id: i64,
    entry: &NewStationEntry,
  ) -> StoreResult<HyroxStationEntry>;

  /// Merge a patch onto an entry; `None` when the entry does not exist
  async fn update_station_entry(
    &self,
    id: i64,
    patch: &StationPatch,
  ) -> StoreResult<Option<HyroxStationEntry>>;

  /// Returns whether an entry was removed
  async fn delete_station_entry(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait StatsStore: Send + Sync {
  /// Weekly totals, most recent week first
  async fn weekly_volume(&self, range: &DateRange) -> StoreResult<Vec<WeekVolumeRow>>;

  /// RUN with the lowest `duration / distance * 5`
  async fn best_run_5k(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>>;

  /// RUN with the lowest `duration / distance`
  async fn best_run_pace(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>>;

  /// SWIM with the lowest `duration / (distance * 10)`
  async fn best_swim_pace(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>>;

  /// Fastest split per station, filtered on the owning workout's date
  async fn best_hyrox_stations(&self, range: &DateRange) -> StoreResult<Vec<StationBestRow>>;

  async fn calendar_days(&self, range: &DateRange) -> StoreResult<Vec<CalendarDayRow>>;

  /// Workouts on one date in insertion order
  async fn workouts_on(&self, date: NaiveDate) -> StoreResult<Vec<Workout>>;
}

/// Everything the HTTP layer needs from persistence
pub trait Store: WorkoutStore + StatsStore {}

impl<T: WorkoutStore + StatsStore> Store for T {}
