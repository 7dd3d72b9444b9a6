use rayon::prelude::*;

use crate::error::ModelResult;
use crate::model::epidemic::EpidemicParams;
use crate::scenario::{Scenario, ScenarioOutcome};

/// Run `scenario` once per parameter set. Runs share nothing mutable, so they
/// go wide on the rayon pool; results keep the order of `variants`.
pub fn sweep(scenario: &Scenario, variants: &[EpidemicParams]) -> Vec<ModelResult<ScenarioOutcome>> {
    log::info!("sweep: {} parameter sets", variants.len());
    variants.par_iter().map(|p| scenario.run_with(p)).collect()
}

pub fn vary_beta_after(base: &EpidemicParams, values: &[f64]) -> Vec<EpidemicParams> {
    values
        .iter()
        .map(|&beta_after| EpidemicParams { beta_after, ..base.clone() })
        .collect()
}

pub fn vary_switch_day(base: &EpidemicParams, days: &[i64]) -> Vec<EpidemicParams> {
    days.iter()
        .map(|&switch_day| EpidemicParams { switch_day, ..base.clone() })
        .collect()
}
