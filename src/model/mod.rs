pub mod cohort;
pub mod epidemic;
pub mod inflow;
