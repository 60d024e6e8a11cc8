//! SQLite-backed store.
//!
//! Aggregations are composed with `QueryBuilder`; every value that comes from
//! a request (dates, ids, workout types) goes through `push_bind`.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::{
  CalendarDayRow, DistanceEffortRow, StationBestRow, StatsStore, WeekVolumeRow, WorkoutStore,
};
use crate::error::StoreResult;
use crate::models::{
  HyroxStationEntry, NewStationEntry, NewWorkout, StationPatch, Workout, WorkoutType,
};
use crate::range::DateRange;

/// Monday of the week containing `w.date` (strftime %w: Sunday = 0)
const WEEK_START_SQL: &str =
  "date(w.date, '-' || ((CAST(strftime('%w', w.date) AS INTEGER) + 6) % 7) || ' days')";

const ESTIMATED_5K_SQL: &str = "(CAST(w.duration_sec AS REAL) / w.distance_km) * 5.0";
const PACE_PER_KM_SQL: &str = "(CAST(w.duration_sec AS REAL) / w.distance_km) / 60.0";
const PACE_PER_100M_SQL: &str = "(CAST(w.duration_sec AS REAL) / (w.distance_km * 10.0)) / 60.0";

#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Lowest `metric_sql` among workouts of one type with a positive distance.
  /// Ties go to the earlier date, then the earlier insert.
  async fn best_distance_effort(
    &self,
    workout_type: WorkoutType,
    metric_sql: &'static str,
    range: &DateRange,
  ) -> StoreResult<Option<DistanceEffortRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
      "SELECT w.id AS workout_id, w.date AS date, w.duration_sec AS duration_sec, \
       w.distance_km AS distance_km FROM workouts w WHERE w.type = ",
    );
    qb.push_bind(workout_type);
    qb.push(" AND w.distance_km IS NOT NULL AND w.distance_km > 0 AND ");
    push_date_range(&mut qb, "w.date", range);
    qb.push(" ORDER BY ");
    qb.push(metric_sql);
    qb.push(" ASC, w.date ASC, w.id ASC LIMIT 1");

    let row = qb
      .build_query_as::<DistanceEffortRow>()
      .fetch_optional(&self.pool)
      .await?;

    debug!(
      workout_type = %workout_type,
      from = %range.from,
      to = %range.to,
      found = row.is_some(),
      "best distance effort query"
    );

    Ok(row)
  }
}

/// Appends `column >= from AND column <= to` with both bounds bound
fn push_date_range(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, range: &DateRange) {
  qb.push(column);
  qb.push(" >= ");
  qb.push_bind(range.from);
  qb.push(" AND ");
  qb.push(column);
  qb.push(" <= ");
  qb.push_bind(range.to);
}

/// ---------------------------------------------------------------------------
/// Workout / Station Persistence
/// ---------------------------------------------------------------------------

#[async_trait]
impl WorkoutStore for SqliteStore {
  async fn insert_workout(&self, workout: &NewWorkout) -> StoreResult<Workout> {
    let result = sqlx::query(
      r#"
      INSERT INTO workouts (
        date, type, duration_sec, distance_km, rpe,
        avg_heart_rate, avg_power_watts, notes, created_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
      "#,
    )
    .bind(workout.date)
    .bind(workout.workout_type)
    .bind(workout.duration_sec)
    .bind(workout.distance_km)
    .bind(workout.rpe)
    .bind(workout.avg_heart_rate)
    .bind(workout.avg_power_watts)
    .bind(workout.notes.as_deref())
    .bind(Utc::now())
    .execute(&self.pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!(workout_id = id, workout_type = %workout.workout_type, "inserted workout");

    let created = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?1")
      .bind(id)
      .fetch_one(&self.pool)
      .await?;

    Ok(created)
  }

  async fn list_workouts(&self) -> StoreResult<Vec<Workout>> {
    let workouts =
      sqlx::query_as::<_, Workout>("SELECT * FROM workouts ORDER BY date DESC, id DESC")
        .fetch_all(&self.pool)
        .await?;
    Ok(workouts)
  }

  async fn get_workout(&self, id: i64) -> StoreResult<Option<Workout>> {
    let workout = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(workout)
  }

  async fn list_station_entries(&self, workout_id: i64) -> StoreResult<Vec<HyroxStationEntry>> {
    let entries = sqlx::query_as::<_, HyroxStationEntry>(
      "SELECT * FROM hyrox_station_entries WHERE workout_id = ?1 ORDER BY id ASC",
    )
    .bind(workout_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(entries)
  }

  async fn insert_station_entry(
    &self,
    workout_id: i64,
    entry: &NewStationEntry,
  ) -> StoreResult<HyroxStationEntry> {
    let result = sqlx::query(
      r#"
      INSERT INTO hyrox_station_entries (
        workout_id, station, load_kg, series, reps,
        split_sec, distance_m, notes, created_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
      "#,
    )
    .bind(workout_id)
    .bind(entry.station)
    .bind(entry.load_kg)
    .bind(entry.series)
    .bind(entry.reps)
    .bind(entry.split_sec)
    .bind(entry.distance_m)
    .bind(entry.notes.as_deref())
    .bind(Utc::now())
    .execute(&self.pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!(entry_id = id, workout_id, station = %entry.station, "inserted station entry");

    let created =
      sqlx::query_as::<_, HyroxStationEntry>("SELECT * FROM hyrox_station_entries WHERE id = ?1")
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

    Ok(created)
  }

  async fn update_station_entry(
    &self,
    id: i64,
    patch: &StationPatch,
  ) -> StoreResult<Option<HyroxStationEntry>> {
    let mut tx = self.pool.begin().await?;

    let existing =
      sqlx::query_as::<_, HyroxStationEntry>("SELECT * FROM hyrox_station_entries WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(mut entry) = existing else {
      return Ok(None);
    };

    patch.apply(&mut entry);

    sqlx::query(
      r#"
      UPDATE hyrox_station_entries SET
        load_kg = ?1,
        series = ?2,
        reps = ?3,
        split_sec = ?4,
        distance_m = ?5,
        notes = ?6
      WHERE id = ?7
      "#,
    )
    .bind(entry.load_kg)
    .bind(entry.series)
    .bind(entry.reps)
    .bind(entry.split_sec)
    .bind(entry.distance_m)
    .bind(entry.notes.as_deref())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!(entry_id = id, "updated station entry");

    Ok(Some(entry))
  }

  async fn delete_station_entry(&self, id: i64) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM hyrox_station_entries WHERE id = ?1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation Queries
/// ---------------------------------------------------------------------------

#[async_trait]
impl StatsStore for SqliteStore {
  async fn weekly_volume(&self, range: &DateRange) -> StoreResult<Vec<WeekVolumeRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
    qb.push(WEEK_START_SQL);
    qb.push(
      " AS week_start, SUM(w.duration_sec) AS total_sec, COUNT(*) AS sessions \
       FROM workouts w WHERE ",
    );
    push_date_range(&mut qb, "w.date", range);
    qb.push(" GROUP BY week_start ORDER BY week_start DESC");

    let rows = qb
      .build_query_as::<WeekVolumeRow>()
      .fetch_all(&self.pool)
      .await?;

    debug!(from = %range.from, to = %range.to, weeks = rows.len(), "weekly volume query");
    Ok(rows)
  }

  async fn best_run_5k(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>> {
    self
      .best_distance_effort(WorkoutType::Run, ESTIMATED_5K_SQL, range)
      .await
  }

  async fn best_run_pace(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>> {
    self
      .best_distance_effort(WorkoutType::Run, PACE_PER_KM_SQL, range)
      .await
  }

  async fn best_swim_pace(&self, range: &DateRange) -> StoreResult<Option<DistanceEffortRow>> {
    self
      .best_distance_effort(WorkoutType::Swim, PACE_PER_100M_SQL, range)
      .await
  }

  async fn best_hyrox_stations(&self, range: &DateRange) -> StoreResult<Vec<StationBestRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
      "SELECT e.station AS station, MIN(e.split_sec) AS best_sec \
       FROM hyrox_station_entries e \
       JOIN workouts w ON w.id = e.workout_id \
       WHERE e.split_sec IS NOT NULL AND ",
    );
    push_date_range(&mut qb, "w.date", range);
    qb.push(" GROUP BY e.station ORDER BY e.station ASC");

    let rows = qb
      .build_query_as::<StationBestRow>()
      .fetch_all(&self.pool)
      .await?;

    debug!(from = %range.from, to = %range.to, stations = rows.len(), "best hyrox stations query");
    Ok(rows)
  }

  async fn calendar_days(&self, range: &DateRange) -> StoreResult<Vec<CalendarDayRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
      "SELECT w.date AS date, COUNT(*) AS sessions, SUM(w.duration_sec) AS total_sec \
       FROM workouts w WHERE ",
    );
    push_date_range(&mut qb, "w.date", range);
    qb.push(" GROUP BY w.date ORDER BY w.date ASC");

    let rows = qb
      .build_query_as::<CalendarDayRow>()
      .fetch_all(&self.pool)
      .await?;
    Ok(rows)
  }

  async fn workouts_on(&self, date: NaiveDate) -> StoreResult<Vec<Workout>> {
    let workouts = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE date = ?1 ORDER BY id ASC")
      .bind(date)
      .fetch_all(&self.pool)
      .await?;
    Ok(workouts)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::models::HyroxStation;
  use crate::test_utils::{
    insert_raw_workout, mock_new_workout, mock_station_entry, setup_test_db, teardown_test_db,
  };
  use crate::units;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
    DateRange { from, to }
  }

  #[tokio::test]
  async fn test_insert_and_read_back_workout() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let created = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 1), 1800, Some(6.0)))
      .await
      .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.workout_type, WorkoutType::Run);
    assert_eq!(created.duration_sec, 1800);
    assert_eq!(created.distance_km, Some(6.0));

    let fetched = store.get_workout(created.id).await.unwrap();
    assert_eq!(fetched, Some(created));
    assert_eq!(store.get_workout(9999).await.unwrap(), None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_weekly_volume_groups_by_monday() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    // 2024-01-01 is a Monday, 2024-01-07 a Sunday, 2024-01-08 the next Monday
    for (date, secs) in [(d(2024, 1, 1), 61), (d(2024, 1, 7), 600), (d(2024, 1, 8), 1800)] {
      store
        .insert_workout(&mock_new_workout(WorkoutType::Gym, date, secs, None))
        .await
        .unwrap();
    }

    let rows = store
      .weekly_volume(&range(d(2024, 1, 1), d(2024, 1, 14)))
      .await
      .unwrap();

    assert_eq!(
      rows,
      vec![
        WeekVolumeRow { week_start: d(2024, 1, 8), total_sec: 1800, sessions: 1 },
        WeekVolumeRow { week_start: d(2024, 1, 1), total_sec: 661, sessions: 2 },
      ]
    );

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_weekly_volume_week_start_can_precede_range() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    // Wednesday; its week starts on Monday 2024-01-01, before the range start
    store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 3), 900, Some(2.0)))
      .await
      .unwrap();

    let rows = store
      .weekly_volume(&range(d(2024, 1, 3), d(2024, 1, 3)))
      .await
      .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].week_start, d(2024, 1, 1));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_best_run_5k_example() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let run = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 1), 1800, Some(6.0)))
      .await
      .unwrap();

    let best = store
      .best_run_5k(&range(d(2024, 1, 1), d(2024, 1, 1)))
      .await
      .unwrap()
      .expect("a qualifying run");
    assert_eq!(best.workout_id, run.id);
    assert_approx_eq!(units::estimated_5k_sec(best.duration_sec, best.distance_km), 1500.0, 1e-9);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_best_run_5k_picks_fastest_and_breaks_ties_stably() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let slow = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 2), 2000, Some(5.0)))
      .await
      .unwrap();
    let tie_late = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 4), 1200, Some(4.0)))
      .await
      .unwrap();
    let tie_early = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 3), 1500, Some(5.0)))
      .await
      .unwrap();

    let r = range(d(2024, 1, 1), d(2024, 1, 31));
    let best = store.best_run_5k(&r).await.unwrap().unwrap();
    assert_ne!(best.workout_id, slow.id);
    assert_eq!(best.workout_id, tie_early.id);

    // Same answer on repeat
    let again = store.best_run_5k(&r).await.unwrap().unwrap();
    assert_eq!(again.workout_id, best.workout_id);
    assert_ne!(again.workout_id, tie_late.id);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_zero_and_missing_distance_are_excluded() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    insert_raw_workout(&pool, d(2024, 1, 1), "RUN", 600, Some(0.0)).await;
    insert_raw_workout(&pool, d(2024, 1, 1), "RUN", 600, None).await;
    insert_raw_workout(&pool, d(2024, 1, 1), "SWIM", 600, Some(0.0)).await;

    let r = range(d(2024, 1, 1), d(2024, 1, 1));
    assert_eq!(store.best_run_5k(&r).await.unwrap(), None);
    assert_eq!(store.best_run_pace(&r).await.unwrap(), None);
    assert_eq!(store.best_swim_pace(&r).await.unwrap(), None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_best_paces_respect_type_and_range() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    // Fast swim outside the range must not win
    store
      .insert_workout(&mock_new_workout(WorkoutType::Swim, d(2023, 12, 1), 1000, Some(1.0)))
      .await
      .unwrap();
    let swim = store
      .insert_workout(&mock_new_workout(WorkoutType::Swim, d(2024, 1, 5), 2400, Some(2.0)))
      .await
      .unwrap();
    // A bike ride never counts as a run
    store
      .insert_workout(&mock_new_workout(WorkoutType::Bike, d(2024, 1, 5), 600, Some(10.0)))
      .await
      .unwrap();
    let run = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 1, 6), 2640, Some(6.0)))
      .await
      .unwrap();

    let r = range(d(2024, 1, 1), d(2024, 1, 31));
    let best_swim = store.best_swim_pace(&r).await.unwrap().unwrap();
    assert_eq!(best_swim.workout_id, swim.id);
    assert_approx_eq!(
      units::pace_min_per_100m(best_swim.duration_sec, best_swim.distance_km),
      2.0,
      1e-9
    );

    let best_run = store.best_run_pace(&r).await.unwrap().unwrap();
    assert_eq!(best_run.workout_id, run.id);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_best_hyrox_stations_filter_on_workout_date() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let inside = store
      .insert_workout(&mock_new_workout(WorkoutType::Hyrox, d(2024, 2, 10), 4200, None))
      .await
      .unwrap();
    let outside = store
      .insert_workout(&mock_new_workout(WorkoutType::Hyrox, d(2023, 6, 1), 4200, None))
      .await
      .unwrap();

    for (workout_id, station, split) in [
      (inside.id, HyroxStation::WallBalls, Some(320)),
      (inside.id, HyroxStation::WallBalls, Some(290)),
      (inside.id, HyroxStation::SkiErg, Some(250)),
      (inside.id, HyroxStation::Row, None),
      (inside.id, HyroxStation::Row, Some(275)),
      (outside.id, HyroxStation::SkiErg, Some(200)),
    ] {
      store
        .insert_station_entry(workout_id, &mock_station_entry(station, split))
        .await
        .unwrap();
    }

    // Entries were all created today, yet only the owning workout date matters.
    // Key text order puts ROW ahead of SKI_ERG despite declaration order.
    let rows = store
      .best_hyrox_stations(&range(d(2024, 2, 1), d(2024, 2, 28)))
      .await
      .unwrap();

    assert_eq!(
      rows,
      vec![
        StationBestRow { station: HyroxStation::Row, best_sec: 275 },
        StationBestRow { station: HyroxStation::SkiErg, best_sec: 250 },
        StationBestRow { station: HyroxStation::WallBalls, best_sec: 290 },
      ]
    );

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_calendar_and_day_listing() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let long = store
      .insert_workout(&mock_new_workout(WorkoutType::Run, d(2024, 3, 2), 5400, Some(15.0)))
      .await
      .unwrap();
    let short = store
      .insert_workout(&mock_new_workout(WorkoutType::Gym, d(2024, 3, 2), 600, None))
      .await
      .unwrap();
    store
      .insert_workout(&mock_new_workout(WorkoutType::Bike, d(2024, 3, 1), 3600, Some(30.0)))
      .await
      .unwrap();

    let days = store
      .calendar_days(&range(d(2024, 3, 1), d(2024, 3, 31)))
      .await
      .unwrap();
    assert_eq!(
      days,
      vec![
        CalendarDayRow { date: d(2024, 3, 1), sessions: 1, total_sec: 3600 },
        CalendarDayRow { date: d(2024, 3, 2), sessions: 2, total_sec: 6000 },
      ]
    );

    let on_day = store.workouts_on(d(2024, 3, 2)).await.unwrap();
    let ids: Vec<i64> = on_day.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![long.id, short.id]);
    assert!(store.workouts_on(d(2024, 3, 3)).await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_station_entry_lifecycle() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let workout = store
      .insert_workout(&mock_new_workout(WorkoutType::Hyrox, d(2024, 4, 1), 4000, None))
      .await
      .unwrap();
    let first = store
      .insert_station_entry(workout.id, &mock_station_entry(HyroxStation::SledPush, Some(180)))
      .await
      .unwrap();
    let second = store
      .insert_station_entry(workout.id, &mock_station_entry(HyroxStation::SledPull, Some(200)))
      .await
      .unwrap();

    let listed = store.list_station_entries(workout.id).await.unwrap();
    assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![first.id, second.id]);

    let patch = StationPatch {
      split_sec: Some(170),
      notes: Some("pb".to_string()),
      ..Default::default()
    };
    let updated = store
      .update_station_entry(first.id, &patch)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(updated.split_sec, Some(170));
    assert_eq!(updated.notes.as_deref(), Some("pb"));
    assert_eq!(updated.load_kg, first.load_kg);

    let reread = store.list_station_entries(workout.id).await.unwrap();
    assert_eq!(reread[0], updated);

    assert!(store.update_station_entry(9999, &patch).await.unwrap().is_none());
    assert!(store.delete_station_entry(second.id).await.unwrap());
    assert!(!store.delete_station_entry(second.id).await.unwrap());
    assert_eq!(store.list_station_entries(workout.id).await.unwrap().len(), 1);

    teardown_test_db(pool).await;
  }
}
