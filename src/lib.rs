pub mod calibration;
pub mod error;
pub mod estimate;
pub mod io;
pub mod math;
pub mod model;
pub mod reference;
pub mod scenario;
pub mod sweep;

pub use error::{ModelError, ModelResult};
pub use estimate::{EstimateTarget, Estimator, PrevalenceEstimate};
pub use math::ode::Rk4Scheme;
pub use model::cohort::{CohortModel, CohortParams, CohortRun};
pub use model::epidemic::{EpidemicModel, EpidemicParams, EpidemicState, Trajectory};
pub use model::inflow::join_inflow;
pub use scenario::{Scenario, ScenarioConfig, ScenarioOutcome};
