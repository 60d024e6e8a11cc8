//! Stats assembler
//!
//! Resolves the request range, runs the aggregation queries and shapes the
//! response payloads. All minute and pace conversions happen here, once,
//! through [`crate::units`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StoreResult;
use crate::models::{HyroxStation, Workout, WorkoutType};
use crate::range::{DateRange, Lookback, RangeQuery};
use crate::store::{DistanceEffortRow, StatsStore};
use crate::units;

/// ---------------------------------------------------------------------------
/// Weekly Volume
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
  pub from: NaiveDate,
  pub to: NaiveDate,
  pub weeks: Vec<WeekVolume>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekVolume {
  pub week_start: NaiveDate,
  pub total_minutes: i64,
  pub sessions: i64,
}

pub async fn weekly<S: StatsStore + ?Sized>(
  store: &S,
  query: RangeQuery,
  today: NaiveDate,
) -> StoreResult<WeeklyStats> {
  let range = DateRange::from_query(query, Lookback::Training, today);
  let rows = store.weekly_volume(&range).await?;

  Ok(WeeklyStats {
    from: range.from,
    to: range.to,
    weeks: rows
      .into_iter()
      .map(|row| WeekVolume {
        week_start: row.week_start,
        total_minutes: units::minutes_ceil(row.total_sec),
        sessions: row.sessions,
      })
      .collect(),
  })
}

/// ---------------------------------------------------------------------------
/// Best Estimated 5K
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRunStats {
  pub from: NaiveDate,
  pub to: NaiveDate,
  pub has_data: bool,
  #[serde(flatten)]
  pub best: Option<BestRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRun {
  pub workout_id: i64,
  pub date: NaiveDate,
  pub duration_sec: i64,
  pub distance_km: f64,
  #[serde(rename = "estimated5kSec")]
  pub estimated_5k_sec: f64,
}

pub async fn best_run<S: StatsStore + ?Sized>(
  store: &S,
  query: RangeQuery,
  today: NaiveDate,
) -> StoreResult<BestRunStats> {
  let range = DateRange::from_query(query, Lookback::Training, today);
  let best = store.best_run_5k(&range).await?.map(|row| BestRun {
    workout_id: row.workout_id,
    date: row.date,
    duration_sec: row.duration_sec,
    distance_km: row.distance_km,
    estimated_5k_sec: units::estimated_5k_sec(row.duration_sec, row.distance_km),
  });

  Ok(BestRunStats {
    from: range.from,
    to: range.to,
    has_data: best.is_some(),
    best,
  })
}

/// ---------------------------------------------------------------------------
/// Best Hyrox Station Times
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyroxStationStats {
  pub from: NaiveDate,
  pub to: NaiveDate,
  pub items: Vec<StationBest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBest {
  pub station: HyroxStation,
  pub best_sec: i64,
}

pub async fn best_hyrox_stations<S: StatsStore + ?Sized>(
  store: &S,
  query: RangeQuery,
  today: NaiveDate,
) -> StoreResult<HyroxStationStats> {
  let range = DateRange::from_query(query, Lookback::Training, today);
  let rows = store.best_hyrox_stations(&range).await?;

  Ok(HyroxStationStats {
    from: range.from,
    to: range.to,
    items: rows
      .into_iter()
      .map(|row| StationBest {
        station: row.station,
        best_sec: row.best_sec,
      })
      .collect(),
  })
}

/// ---------------------------------------------------------------------------
/// Calendar
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarStats {
  pub from: NaiveDate,
  pub to: NaiveDate,
  pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
  pub date: NaiveDate,
  pub sessions: i64,
  pub total_sec: i64,
}

pub async fn calendar<S: StatsStore + ?Sized>(
  store: &S,
  query: RangeQuery,
  today: NaiveDate,
) -> StoreResult<CalendarStats> {
  let range = DateRange::from_query(query, Lookback::Training, today);
  let rows = store.calendar_days(&range).await?;

  Ok(CalendarStats {
    from: range.from,
    to: range.to,
    days: rows
      .into_iter()
      .map(|row| CalendarDay {
        date: row.date,
        sessions: row.sessions,
        total_sec: row.total_sec,
      })
      .collect(),
  })
}

/// One row of the single-day listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWorkout {
  pub id: i64,
  #[serde(rename = "type")]
  pub workout_type: WorkoutType,
  pub duration_sec: i64,
  pub distance_km: Option<f64>,
  pub rpe: i64,
  #[serde(rename = "notas")]
  pub notes: Option<String>,
}

impl From<Workout> for DayWorkout {
  fn from(w: Workout) -> Self {
    Self {
      id: w.id,
      workout_type: w.workout_type,
      duration_sec: w.duration_sec,
      distance_km: w.distance_km,
      rpe: w.rpe,
      notes: w.notes,
    }
  }
}

pub async fn calendar_day<S: StatsStore + ?Sized>(store: &S, date: NaiveDate) -> StoreResult<Vec<DayWorkout>> {
  let workouts = store.workouts_on(date).await?;
  Ok(workouts.into_iter().map(DayWorkout::from).collect())
}

/// ---------------------------------------------------------------------------
/// Personal Bests
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBests {
  pub from: NaiveDate,
  pub to: NaiveDate,
  pub best_run_pace: Option<RunPaceBest>,
  pub best_run_5k: Option<Run5kBest>,
  pub best_swim_pace: Option<SwimPaceBest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPaceBest {
  pub workout_id: i64,
  pub date: NaiveDate,
  pub pace_min_per_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run5kBest {
  pub workout_id: i64,
  pub date: NaiveDate,
  #[serde(rename = "estimated5kSec")]
  pub estimated_5k_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimPaceBest {
  pub workout_id: i64,
  pub date: NaiveDate,
  #[serde(rename = "paceMinPer100m")]
  pub pace_min_per_100m: f64,
}

pub async fn personal_bests<S: StatsStore + ?Sized>(
  store: &S,
  query: RangeQuery,
  today: NaiveDate,
) -> StoreResult<PersonalBests> {
  let range = DateRange::from_query(query, Lookback::PersonalBests, today);

  let best_run_pace = store
    .best_run_pace(&range)
    .await?
    .map(|row: DistanceEffortRow| RunPaceBest {
      workout_id: row.workout_id,
      date: row.date,
      pace_min_per_km: units::pace_min_per_km(row.duration_sec, row.distance_km),
    });

  let best_run_5k = store.best_run_5k(&range).await?.map(|row| Run5kBest {
    workout_id: row.workout_id,
    date: row.date,
    estimated_5k_sec: units::estimated_5k_sec(row.duration_sec, row.distance_km),
  });

  let best_swim_pace = store.best_swim_pace(&range).await?.map(|row| SwimPaceBest {
    workout_id: row.workout_id,
    date: row.date,
    pace_min_per_100m: units::pace_min_per_100m(row.duration_sec, row.distance_km),
  });

  Ok(PersonalBests {
    from: range.from,
    to: range.to,
    best_run_pace,
    best_run_5k,
    best_swim_pace,
  })
}
