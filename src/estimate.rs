use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::epidemic::Trajectory;

/// Pairs a trajectory day with the cohort-model day that falls on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateTarget {
    pub trajectory_day: usize,
    pub deaths_day: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrevalenceEstimate {
    pub target: EstimateTarget,
    /// Truncated (I + R1 + R2) scaled by the model dimension.
    pub infected: i64,
    pub deaths: i64,
    pub prevalence: f64,
}

/// Turns simulated fractions and cumulative deaths into prevalence point estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimator {
    /// Scale applied to compartment fractions.
    pub dimension: f64,
    /// Denominator of the prevalence.
    pub population: f64,
}

impl Estimator {
    pub fn new(dimension: f64, population: f64) -> Self {
        Self { dimension, population }
    }

    pub fn infected_count(&self, trajectory: &Trajectory, day: usize) -> ModelResult<i64> {
        let state = trajectory.state(day)?;
        Ok((state.ever_infected() * self.dimension) as i64)
    }

    pub fn estimate(
        &self,
        trajectory: &Trajectory,
        cumulative_deaths: &[i64],
        target: EstimateTarget,
    ) -> ModelResult<PrevalenceEstimate> {
        let infected = self.infected_count(trajectory, target.trajectory_day)?;
        let deaths = *cumulative_deaths
            .get(target.deaths_day)
            .ok_or(ModelError::DeathsOutOfRange {
                day: target.deaths_day,
                len: cumulative_deaths.len(),
            })?;
        Ok(PrevalenceEstimate {
            target,
            infected,
            deaths,
            prevalence: (infected - deaths) as f64 / self.population,
        })
    }

    pub fn estimate_all(
        &self,
        trajectory: &Trajectory,
        cumulative_deaths: &[i64],
        targets: &[EstimateTarget],
    ) -> ModelResult<Vec<PrevalenceEstimate>> {
        targets
            .iter()
            .map(|&t| self.estimate(trajectory, cumulative_deaths, t))
            .collect()
    }
}
