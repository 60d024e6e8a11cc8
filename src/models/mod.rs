pub mod workout;
pub mod hyrox;

pub use hyrox::{HyroxStation, HyroxStationEntry, NewStationEntry, StationPatch};
pub use workout::{NewWorkout, Workout, WorkoutType};

use crate::error::AppError;

/// Trim free-text notes; blank becomes `None`
pub(crate) fn clean_notes(notes: Option<String>, max_len: usize) -> Result<Option<String>, AppError> {
  let Some(raw) = notes else {
    return Ok(None);
  };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  if trimmed.chars().count() > max_len {
    return Err(AppError::validation(format!(
      "notas must be at most {} characters",
      max_len
    )));
  }
  Ok(Some(trimmed.to_string()))
}
