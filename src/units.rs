//! Unit conversions applied at the response boundary.
//!
//! Durations are stored and aggregated in seconds; distances in kilometers.
//! Callers must only pass positive distances (the queries filter on
//! `distance_km > 0` before anything reaches these functions).

const SECONDS_PER_MINUTE: i64 = 60;

/// Standard race distance used for the 5K estimate
pub const FIVE_K_KM: f64 = 5.0;

/// Seconds to whole minutes, rounding up so volume is never under-reported
pub fn minutes_ceil(seconds: i64) -> i64 {
  if seconds <= 0 {
    return 0;
  }
  seconds / SECONDS_PER_MINUTE + i64::from(seconds % SECONDS_PER_MINUTE != 0)
}

/// Linear pace extrapolation to 5 km, seconds in and seconds out
pub fn estimated_5k_sec(duration_sec: i64, distance_km: f64) -> f64 {
  duration_sec as f64 / distance_km * FIVE_K_KM
}

/// Running pace in min/km
pub fn pace_min_per_km(duration_sec: i64, distance_km: f64) -> f64 {
  (duration_sec as f64 / distance_km) / 60.0
}

/// Swimming pace in min/100m (distance stored in km, 1 km = 10 x 100m)
pub fn pace_min_per_100m(duration_sec: i64, distance_km: f64) -> f64 {
  (duration_sec as f64 / (distance_km * 10.0)) / 60.0
}
