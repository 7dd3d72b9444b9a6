//! Parameter set of the published reference run.

use crate::math::ode::Rk4Scheme;
use crate::model::cohort::{CohortParams, DEFAULT_MEMORY};
use crate::model::epidemic::{EpidemicParams, EpidemicState};

/// Population scale applied to compartment fractions.
pub const DIMENSION: f64 = 1_995_898.0;
pub const HORIZON_DAYS: usize = 180;
pub const INITIAL_INFECTED: f64 = 5e-6;

/// Detected cases still under follow-up when the cohort run starts, newest first.
pub const BACKLOG: [i64; 5] = [46, 46, 46, 46, 45];

pub fn epidemic_params() -> EpidemicParams {
    EpidemicParams {
        beta: 0.27704,
        beta_after: 0.16632,
        switch_day: 51,
        d_detected: 5.2,
        d_undetected: 15.0,
        p_catch: 0.05375,
        scheme: Rk4Scheme::Reference,
    }
}

pub fn initial_state() -> EpidemicState {
    EpidemicState::seeded(INITIAL_INFECTED)
}

pub fn cohort_params() -> CohortParams {
    CohortParams {
        death_probs: [0.03557, 0.001298, 0.001566],
        heal_probs: [0.032750, 0.015831],
        time1: 4,
        time2: 9,
        memory: DEFAULT_MEMORY,
    }
}
