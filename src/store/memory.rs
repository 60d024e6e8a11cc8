//! In-memory store with the same query semantics as the SQLite store

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{
  CalendarDayRow, DistanceEffortRow, StationBestRow, StatsStore, WeekVolumeRow, WorkoutStore,
};
use crate::error::StoreResult;
use crate::models::{
  HyroxStation, HyroxStationEntry, NewStationEntry, NewWorkout, StationPatch, Workout,
  WorkoutType,
};
use crate::range::DateRange;
use crate::units;

#[derive(Debug, Default)]
struct Tables {
  workouts: Vec<Workout>,
  entries: Vec<HyroxStationEntry>,
  next_workout_id: i64,
  next_entry_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
  tables: RwLock<Tables>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a workout as-is, skipping validation (for seeding legacy rows)
  pub async fn push_workout(&self, mut workout: Workout) -> Workout {
    let mut tables = self.tables.write().await;
    tables.next_workout_id += 1;
    workout.id = tables.next_workout_id;
    tables.workouts.push(workout.clone());
    workout
  }

  async fn best_distance_effort(
    &self,
    workout_type: WorkoutType,
    metric: fn(i64, f64) -> f64,
    range: &DateRange,
  ) -> Option<DistanceEffortRow> {
    let tables = self.tables.read().await;
    tables
      .workouts
      .iter()
      .filter(|w| w.workout_type == workout_type && range.contains(w.date))
      .filter_map(|w| match w.distance_km {
        Some(km) if km > 0.0 => Some((w, km, metric(w.duration_sec, km))),
        _ => None,
      })
      .min_by(|(a, _, a_metric), (b, _, b_metric)| {
        a_metric
          .partial_cmp(b_metric)
          .unwrap_or(Ordering::Equal)
          .then(a.date.cmp(&b.date))
          .then(a.id.cmp(&b.id))
      })
      .map(|(w, km, _)| DistanceEffortRow {
        workout_id: w.id,
        date: w.date,
        duration_sec: w.duration_sec,
        distance_km: km,
      })
  }
}

fn week_start(date: NaiveDate) -> NaiveDate {
  let back = u64::from(date.weekday().num_days_from_monday());
  date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

#[async_trait]
impl WorkoutStore for InMemoryStore {
  async fn insert_workout(&self, workout: &NewWorkout) -> StoreResult<Workout> {
    let created = Workout {
      id: 0,
      date: workout.date,
      workout_type: workout.workout_type,
      duration_sec: workout.duration_sec,
      distance_km: workout.distance_km,
      rpe: workout.rpe,
      avg_heart_rate: workout.avg_heart_rate,
      avg_power_watts: workout.avg_power_watts,
      notes: workout.notes.clone(),
      created_at: Utc::now(),
    };
    Ok(self.push_workout(created).await)
  }

  async fn list_workouts(&self) -> StoreResult<Vec<Workout>> {
    let tables = self.tables.read().await;
    let mut workouts = tables.workouts.clone();
    workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    Ok(workouts)
  }

  async fn get_workout(&self, id: i64) -> StoreResult<Option<Workout>> {
    let tables = self.tables.read().await;
    Ok(tables.workouts.iter().find(|w| w.id == id).cloned())
  }

  async fn list_station_entries(&self, workout_id: i64) -> StoreResult<Vec<HyroxStationEntry>> {
    let tables = self.tables.read().await;
    let mut entries: Vec<_> = tables
      .entries
      .iter()
      .filter(|e| e.workout_id == workout_id)
      .cloned()
      .collect();
    entries.sort_by_key(|e| e.id);
    Ok(entries)
  }

  async fn insert_station_entry(
    &self,
    workout_id: i64,
    entry: &NewStationEntry,
  ) -> StoreResult<HyroxStationEntry> {
    let mut tables = self.tables.write().await;
    tables.next_entry_id += 1;
    let created = HyroxStationEntry {
      id: tables.next_entry_id,
      workout_id,
      station: entry.station,
      load_kg: entry.load_kg,
      series: entry.series,
      reps: entry.reps,
      split_sec: entry.split_sec,
      distance_m: entry.distance_m,
      notes: entry.notes.clone(),
      created_at: Utc::now(),
    };
    tables.entries.push(created.clone());
    Ok(created)
  }

  async fn update_station_entry(
    &self,
    id: i64,
    patch: &StationPatch,
  ) -> StoreResult<Option<HyroxStationEntry>> {
    let mut tables = self.tables.write().await;
    Ok(tables.entries.iter_mut().find(|e| e.id == id).map(|entry| {
      patch.apply(entry);
      entry.clone()
    }))
  }

  async fn delete_station_entry(&self, id: i64) -> StoreResult<bool> {
    let mut tables = self.tables.write().await;
    let before = tables.entries.len();
    tables.entries.retain(|e| e.id != id);
    Ok(tables.entries.len() != before)
  }
}

#[async_trait]
impl StatsStore for InMemoryStore {
  async fn weekly_volume(&self, range: &DateRange) -> StoreResult<Vec<WeekVolumeRow>> {
    let tables = self.tables.read().await;
    let mut weeks: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for w in tables.workouts.iter().filter(|w| range.contains(w.date)) {
      let slot = weeks.entry(week_start(w.date)).or_default();
      slot.0 = slot.0.saturating_add(w.duration_sec);
      slot.1 += 1;
    }
    Ok(
      weeks
        .into_iter()
        .rev()
        .map(|(week_start, (total_sec, sessions))| WeekVolumeRow {
          week_start,
          total_sec,
          sessions,
        })
        .collect(),
    )
  }

  async fn best_run_5k(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>> {
    Ok(
      self
        .best_distance_effort(WorkoutType::Run, units::estimated_5k_sec, range)
        .await,
    )
  }

  async fn best_run_pace(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>> {
    Ok(
      self
        .best_distance_effort(WorkoutType::Run, units::pace_min_per_km, range)
        .await,
    )
  }

  async fn best_swim_pace(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>> {
    Ok(
      self
        .best_distance_effort(WorkoutType::Swim, units::pace_min_per_100m, range)
        .await,
    )
  }

  async fn best_hyrox_stations(&self, range: &DateRange) -> StoreResult<Vec<StationBestRow>> {
    let tables = self.tables.read().await;
    let mut best: BTreeMap<&'static str, (HyroxStation, i64)> = BTreeMap::new();

    for entry in &tables.entries {
      let Some(split) = entry.split_sec else {
        continue;
      };
      let owner_in_range = tables
        .workouts
        .iter()
        .any(|w| w.id == entry.workout_id && range.contains(w.date));
      if !owner_in_range {
        continue;
      }
      best
        .entry(entry.station.as_str())
        .and_modify(|(_, sec)| *sec = (*sec).min(split))
        .or_insert((entry.station, split));
    }

    // Keyed by station text so the order matches ORDER BY station in SQL
    Ok(
      best
        .into_values()
        .map(|(station, best_sec)| StationBestRow { station, best_sec })
        .collect(),
    )
  }

  async fn calendar_days(&self, range: &DateRange) -> StoreResult<Vec<CalendarDayRow>> {
    let tables = self.tables.read().await;
    let mut days: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for w in tables.workouts.iter().filter(|w| range.contains(w.date)) {
      let slot = days.entry(w.date).or_default();
      slot.0 += 1;
      slot.1 = slot.1.saturating_add(w.duration_sec);
    }
    Ok(
      days
        .into_iter()
        .map(|(date, (sessions, total_sec))| CalendarDayRow {
          date,
          sessions,
          total_sec,
        })
        .collect(),
    )
  }

  async fn workouts_on(&self, date: NaiveDate) -> StoreResult<Vec<Workout>> {
    let tables = self.tables.read().await;
    let mut workouts: Vec<_> = tables.workouts.iter().filter(|w| w.date == date).cloned().collect();
    workouts.sort_by_key(|w| w.id);
    Ok(workouts)
  }
}
