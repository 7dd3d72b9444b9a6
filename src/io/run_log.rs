use anyhow::Context;

use crate::estimate::PrevalenceEstimate;
use crate::model::cohort::CohortRun;

pub fn write_run_log(
    out_dir: impl AsRef<std::path::Path>,
    run_id: &str,
    horizon_days: usize,
    memory: usize,
    cohort: &CohortRun,
    estimates: &[PrevalenceEstimate],
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(out_dir.as_ref()).context("create logs dir failed")?;
    let path = out_dir.as_ref().join(format!("run_{}.txt", run_id));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create run log file failed (path={:?})", path))?;

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "horizon_days={}", horizon_days)?;
    writeln!(f, "memory={}", memory)?;
    writeln!(f, "cohort_days={}", cohort.days.len())?;
    writeln!(f)?;
    writeln!(f, "day,inflow,early,middle,late,deaths,removed,cumulative_deaths")?;

    for d in &cohort.days {
        let p = &d.sub_populations;
        writeln!(
            f,
            "{},{},{},{},{},{},{},{}",
            d.day, d.inflow, p.early, p.middle, p.late, d.deaths, d.removed, d.cumulative_deaths
        )?;
    }

    writeln!(f)?;
    writeln!(f, "trajectory_day,deaths_day,infected,deaths,prevalence")?;
    for e in estimates {
        anyhow::ensure!(
            e.target.deaths_day < cohort.cumulative_deaths.len(),
            "estimate refers to deaths day {} outside the cohort run",
            e.target.deaths_day
        );
        writeln!(
            f,
            "{},{},{},{},{:.6}",
            e.target.trajectory_day, e.target.deaths_day, e.infected, e.deaths, e.prevalence
        )?;
    }

    Ok(path)
}
