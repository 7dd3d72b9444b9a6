use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use prevest::io::run_log::write_run_log;
use prevest::scenario::{Scenario, ScenarioConfig, ScenarioOutcome};
use prevest::sweep::{sweep, vary_beta_after};

#[derive(Parser, Debug)]
#[command(about = "Estimate prevalence from a scenario file")]
struct Args {
    /// Scenario JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Write a run log into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Run identifier used in the log file name
    #[arg(long, default_value = "cli")]
    run_id: String,

    /// Sweep the post-intervention transmission rate over these values
    #[arg(long, value_delimiter = ',')]
    sweep_beta_after: Vec<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let config = ScenarioConfig::load(&args.config)?;
    let scenario = Scenario::resolve(config)?;
    info!(
        "loaded {}: {} historical days, backlog of {} cohorts",
        args.config.display(),
        scenario.historical.len(),
        scenario.backlog.len()
    );

    if !args.sweep_beta_after.is_empty() {
        let variants = vary_beta_after(&scenario.config.epidemic, &args.sweep_beta_after);
        println!("beta_after,trajectory_day,deaths_day,infected,deaths,prevalence");
        for (params, result) in variants.iter().zip(sweep(&scenario, &variants)) {
            let outcome = result
                .with_context(|| format!("sweep run failed (beta_after={})", params.beta_after))?;
            for e in &outcome.estimates {
                println!(
                    "{},{},{},{},{},{:.7}",
                    params.beta_after,
                    e.target.trajectory_day,
                    e.target.deaths_day,
                    e.infected,
                    e.deaths,
                    e.prevalence
                );
            }
        }
        return Ok(());
    }

    let outcome = scenario.run().context("scenario run failed")?;
    print_estimates(&outcome);

    if let Some(dir) = &args.log_dir {
        let path = write_run_log(
            dir,
            &args.run_id,
            scenario.config.horizon_days,
            scenario.config.cohort.memory,
            &outcome.cohort,
            &outcome.estimates,
        )?;
        info!("run log written to {}", path.display());
    }
    Ok(())
}

fn print_estimates(outcome: &ScenarioOutcome) {
    println!("trajectory_day,deaths_day,infected,deaths,prevalence");
    for e in &outcome.estimates {
        println!(
            "{},{},{},{},{:.7}",
            e.target.trajectory_day, e.target.deaths_day, e.infected, e.deaths, e.prevalence
        );
    }
}
