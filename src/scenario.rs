use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::estimate::{EstimateTarget, Estimator, PrevalenceEstimate};
use crate::io::inflow_csv::{load_backlog_csv, load_daily_series_csv};
use crate::model::cohort::{CohortModel, CohortParams, CohortRun};
use crate::model::epidemic::{EpidemicModel, EpidemicParams, EpidemicState, Trajectory};
use crate::model::inflow::join_inflow;

pub const DEFAULT_HORIZON_DAYS: usize = 180;

// Upper bounds for scenarios arriving from untrusted input
pub const MAX_HORIZON_DAYS: usize = 20_000;
pub const MAX_MEMORY: usize = 20_000;
pub const MAX_SERIES_LEN: usize = 100_000;

fn default_horizon() -> usize {
    DEFAULT_HORIZON_DAYS
}

/// One full pipeline run: epidemic model, inflow join, cohort model, estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub epidemic: EpidemicParams,
    pub initial_state: EpidemicState,
    #[serde(default = "default_horizon")]
    pub horizon_days: usize,

    pub cohort: CohortParams,

    // Observed daily detections, inline or from a `day,count` CSV
    #[serde(default)]
    pub historical: Vec<i64>,
    #[serde(default)]
    pub historical_csv: Option<PathBuf>,

    /// Trajectory day following the last historical day.
    pub join_offset: usize,
    /// Simulated days appended after the historical series.
    pub simulated_days: usize,

    // Cases under follow-up at the start, inline or from an `age,count` CSV
    #[serde(default)]
    pub backlog: Vec<i64>,
    #[serde(default)]
    pub backlog_csv: Option<PathBuf>,

    pub dimension: f64,
    pub population: f64,
    #[serde(default)]
    pub targets: Vec<EstimateTarget>,
}

impl ScenarioConfig {
    /// Read a JSON scenario. Relative CSV paths are taken relative to the file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        let mut cfg: ScenarioConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for csv in [&mut cfg.historical_csv, &mut cfg.backlog_csv].into_iter().flatten() {
            if csv.is_relative() {
                *csv = base.join(&*csv);
            }
        }
        Ok(cfg)
    }

    /// Reject sizes that would make a single run allocate without bound.
    pub fn check_limits(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.horizon_days <= MAX_HORIZON_DAYS,
            "horizon_days {} exceeds the limit of {}",
            self.horizon_days,
            MAX_HORIZON_DAYS
        );
        anyhow::ensure!(
            self.simulated_days <= self.horizon_days,
            "simulated_days {} exceeds horizon_days {}",
            self.simulated_days,
            self.horizon_days
        );
        anyhow::ensure!(
            self.cohort.memory <= MAX_MEMORY,
            "cohort memory {} exceeds the limit of {}",
            self.cohort.memory,
            MAX_MEMORY
        );
        anyhow::ensure!(
            self.historical.len() <= MAX_SERIES_LEN && self.backlog.len() <= MAX_SERIES_LEN,
            "inline series longer than {} entries",
            MAX_SERIES_LEN
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub epidemic: EpidemicParams,
    pub trajectory: Trajectory,
    pub inflow: Vec<i64>,
    pub cohort: CohortRun,
    pub estimates: Vec<PrevalenceEstimate>,
}

/// A configuration with its input series loaded.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub config: ScenarioConfig,
    pub historical: Vec<i64>,
    pub backlog: Vec<i64>,
}

impl Scenario {
    pub fn resolve(config: ScenarioConfig) -> anyhow::Result<Self> {
        let historical = match &config.historical_csv {
            Some(path) => {
                anyhow::ensure!(
                    config.historical.is_empty(),
                    "give either `historical` or `historical_csv`, not both"
                );
                load_daily_series_csv(path)?
            }
            None => config.historical.clone(),
        };
        let backlog = match &config.backlog_csv {
            Some(path) => {
                anyhow::ensure!(
                    config.backlog.is_empty(),
                    "give either `backlog` or `backlog_csv`, not both"
                );
                load_backlog_csv(path)?
            }
            None => config.backlog.clone(),
        };
        Ok(Self { config, historical, backlog })
    }

    pub fn run(&self) -> ModelResult<ScenarioOutcome> {
        self.run_with(&self.config.epidemic)
    }

    /// Run the pipeline with `epidemic` in place of the configured parameters.
    pub fn run_with(&self, epidemic: &EpidemicParams) -> ModelResult<ScenarioOutcome> {
        let cfg = &self.config;
        let cohort_model = CohortModel::new(cfg.cohort.clone())?;

        let trajectory =
            EpidemicModel::new(epidemic.clone()).simulate(cfg.initial_state, cfg.horizon_days);
        let inflow = join_inflow(
            &self.historical,
            &trajectory,
            cfg.dimension,
            cfg.join_offset,
            cfg.simulated_days,
        )?;
        let cohort = cohort_model.run(&inflow, &self.backlog)?;
        let estimates = Estimator::new(cfg.dimension, cfg.population).estimate_all(
            &trajectory,
            &cohort.cumulative_deaths,
            &cfg.targets,
        )?;

        log::info!(
            "scenario run: beta={} beta_after={} switch_day={}, {} inflow days, {} estimates",
            epidemic.beta,
            epidemic.beta_after,
            epidemic.switch_day,
            inflow.len(),
            estimates.len()
        );

        Ok(ScenarioOutcome {
            epidemic: epidemic.clone(),
            trajectory,
            inflow,
            cohort,
            estimates,
        })
    }
}
