use crate::error::{ModelError, ModelResult};
use crate::model::epidemic::Trajectory;

/// Daily detections implied by the trajectory: the day-over-day increase of the
/// removed-detected compartment, scaled by `dimension` and truncated toward zero,
/// for trajectory days `offset..offset + days`.
pub fn simulated_detections(
    trajectory: &Trajectory,
    dimension: f64,
    offset: usize,
    days: usize,
) -> ModelResult<Vec<i64>> {
    if days == 0 {
        return Ok(Vec::new());
    }
    if offset == 0 {
        return Err(ModelError::JoinBeforeStart);
    }
    let last = trajectory.last_day();
    let last_needed = offset
        .checked_add(days - 1)
        .ok_or(ModelError::TrajectoryOutOfRange { day: usize::MAX, last })?;
    if last_needed > last {
        return Err(ModelError::TrajectoryOutOfRange { day: last_needed, last });
    }

    let states = trajectory.states();
    Ok(states[offset - 1..=last_needed]
        .windows(2)
        .map(|w| ((w[1].r1 - w[0].r1) * dimension) as i64)
        .collect())
}

/// Historical series followed by `days` simulated detections starting at
/// trajectory day `offset` (the day after the last historical day).
pub fn join_inflow(
    historical: &[i64],
    trajectory: &Trajectory,
    dimension: f64,
    offset: usize,
    days: usize,
) -> ModelResult<Vec<i64>> {
    let simulated = simulated_detections(trajectory, dimension, offset, days)?;
    let mut joined = Vec::with_capacity(historical.len() + simulated.len());
    joined.extend_from_slice(historical);
    joined.extend(simulated);
    log::debug!(
        "joined inflow: {} historical + {} simulated days (trajectory days {}..{})",
        historical.len(),
        days,
        offset,
        offset + days
    );
    Ok(joined)
}
