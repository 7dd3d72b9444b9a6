use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors surfaced by the simulation core.
///
/// Numeric anomalies (probabilities outside [0, 1], negative rates) are not
/// errors: they propagate as implausible numbers. Only contract violations on
/// counts and indices are reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("initial backlog has {len} cohorts but the age buffer only holds {memory}")]
    BacklogTooLong { len: usize, memory: usize },

    #[error("negative backlog cohort {value} at age {age}")]
    NegativeBacklog { age: usize, value: i64 },

    #[error("negative inflow {value} on day {day}")]
    NegativeInflow { day: usize, value: i64 },

    #[error("join offset must be at least 1: day 0 has no previous day to difference against")]
    JoinBeforeStart,

    #[error("trajectory day {day} is out of range (trajectory covers days 0..={last})")]
    TrajectoryOutOfRange { day: usize, last: usize },

    #[error("cumulative deaths day {day} is out of range (series has {len} entries)")]
    DeathsOutOfRange { day: usize, len: usize },

    #[error("invalid cohort configuration: {0}")]
    InvalidCohortConfig(String),
}
