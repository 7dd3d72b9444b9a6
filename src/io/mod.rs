pub mod inflow_csv;
pub mod run_log;
