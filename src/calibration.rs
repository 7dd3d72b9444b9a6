use crate::model::epidemic::{EpidemicParams, EpidemicState};

/// Mean infectious exit rate: p/D1 + (1-p)/D2.
pub fn total_exit_rate(params: &EpidemicParams) -> f64 {
    params.detected_exit_rate() + params.undetected_exit_rate()
}

/// Basic reproduction number of one regime in a fully susceptible population.
/// R0 = beta / (p/D1 + (1-p)/D2)
pub fn basic_reproduction_number(params: &EpidemicParams, pre_switch: bool) -> f64 {
    params.rate(pre_switch) / total_exit_rate(params)
}

/// Effective reproduction number given the susceptible fraction of `state`.
pub fn effective_reproduction_number(
    params: &EpidemicParams,
    state: &EpidemicState,
    pre_switch: bool,
) -> f64 {
    basic_reproduction_number(params, pre_switch) * state.s
}
