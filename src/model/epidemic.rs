use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::math::ode::{rk4_step, rk4_step_ws, Rk4Scheme, Rk4Workspace};

/// Parameters of the detected/undetected removal model.
///
/// Rates are per day. Nothing here is validated: degenerate values (negative
/// durations, probabilities outside [0, 1]) produce degenerate trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpidemicParams {
    // Transmission
    pub beta: f64,       // before the intervention
    pub beta_after: f64, // after the intervention
    /// Last day index integrated with `beta`. Negative means `beta_after` from day 0.
    pub switch_day: i64,

    // Removal
    pub d_detected: f64,   // mean time to outcome, detected cases
    pub d_undetected: f64, // mean time to outcome, undetected cases
    pub p_catch: f64,      // probability that an infection is eventually detected

    #[serde(default)]
    pub scheme: Rk4Scheme,
}

impl EpidemicParams {
    pub fn rate(&self, pre_switch: bool) -> f64 {
        if pre_switch { self.beta } else { self.beta_after }
    }

    /// Regime of the step that starts on `day`.
    pub fn is_pre_switch(&self, day: usize) -> bool {
        i64::try_from(day).map_or(false, |d| d <= self.switch_day)
    }

    pub fn detected_exit_rate(&self) -> f64 {
        self.p_catch / self.d_detected
    }

    pub fn undetected_exit_rate(&self) -> f64 {
        (1.0 - self.p_catch) / self.d_undetected
    }
}

/// Population fractions: susceptible, infected, removed-detected, removed-undetected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EpidemicState {
    pub s: f64,
    pub i: f64,
    pub r1: f64,
    pub r2: f64,
}

impl EpidemicState {
    pub fn new(s: f64, i: f64, r1: f64, r2: f64) -> Self {
        Self { s, i, r1, r2 }
    }

    /// Fully susceptible population with a seeded infected fraction.
    pub fn seeded(infected: f64) -> Self {
        Self::new(1.0 - infected, infected, 0.0, 0.0)
    }

    pub fn total(&self) -> f64 {
        self.s + self.i + self.r1 + self.r2
    }

    /// Fraction currently or previously infected.
    pub fn ever_infected(&self) -> f64 {
        self.i + self.r1 + self.r2
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.s, self.i, self.r1, self.r2]
    }

    pub fn from_array(y: [f64; 4]) -> Self {
        Self::new(y[0], y[1], y[2], y[3])
    }
}

/// Day-indexed states of one run; index 0 is the initial condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    states: Vec<EpidemicState>,
}

impl Trajectory {
    pub fn from_states(initial: EpidemicState, rest: Vec<EpidemicState>) -> Self {
        let mut states = Vec::with_capacity(rest.len() + 1);
        states.push(initial);
        states.extend(rest);
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last_day(&self) -> usize {
        self.states.len() - 1
    }

    pub fn get(&self, day: usize) -> Option<&EpidemicState> {
        self.states.get(day)
    }

    pub fn state(&self, day: usize) -> ModelResult<&EpidemicState> {
        self.states.get(day).ok_or(ModelError::TrajectoryOutOfRange {
            day,
            last: self.last_day(),
        })
    }

    pub fn states(&self) -> &[EpidemicState] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &EpidemicState)> {
        self.states.iter().enumerate()
    }
}

pub struct EpidemicModel {
    pub params: EpidemicParams,
}

impl EpidemicModel {
    pub fn new(params: EpidemicParams) -> Self {
        Self { params }
    }

    pub fn deriv(&self, y: &[f64], pre_switch: bool, dy: &mut [f64]) {
        let p = &self.params;
        let (s, i) = (y[0], y[1]);

        let new_infections = s * i * p.rate(pre_switch);
        let to_detected = p.detected_exit_rate() * i;
        let to_undetected = p.undetected_exit_rate() * i;

        dy[0] = -new_infections;
        dy[1] = new_infections - to_detected - to_undetected;
        dy[2] = to_detected;
        dy[3] = to_undetected;
    }

    /// Instantaneous rate of change of each compartment.
    pub fn derivative(&self, state: &EpidemicState, pre_switch: bool) -> EpidemicState {
        let mut dy = [0.0; 4];
        self.deriv(&state.to_array(), pre_switch, &mut dy);
        EpidemicState::from_array(dy)
    }

    /// Advance one day with a unit RK4 step. No clamping to [0, 1].
    pub fn step(&self, state: &EpidemicState, pre_switch: bool) -> EpidemicState {
        let mut y = state.to_array();
        rk4_step(&mut y, 0.0, 1.0, self.params.scheme, |_, y, dy| {
            self.deriv(y, pre_switch, dy)
        });
        EpidemicState::from_array(y)
    }

    /// Integrate `num_days` days. The step leaving day `d` uses the pre-switch
    /// rate while `d <= switch_day`.
    pub fn simulate(&self, initial: EpidemicState, num_days: usize) -> Trajectory {
        if (initial.total() - 1.0).abs() > 1e-6 {
            log::warn!(
                "initial state sums to {:.9}, expected population fractions summing to 1",
                initial.total()
            );
        }

        let mut ws = Rk4Workspace::new(4);
        let mut y = initial.to_array();
        let mut out = Vec::with_capacity(num_days);
        for day in 0..num_days {
            let pre_switch = self.params.is_pre_switch(day);
            rk4_step_ws(&mut y, day as f64, 1.0, self.params.scheme, &mut ws, |_, y, dy| {
                self.deriv(y, pre_switch, dy)
            });
            out.push(EpidemicState::from_array(y));
        }

        let traj = Trajectory::from_states(initial, out);
        if let Some(last) = traj.states().last() {
            log::debug!(
                "epidemic run: {} days, scheme={:?}, final s={:.6} i={:.6} r1={:.6} r2={:.6}",
                num_days,
                self.params.scheme,
                last.s,
                last.i,
                last.r1,
                last.r2
            );
        }
        traj
    }
}
