use prevest::estimate::{EstimateTarget, Estimator};
use prevest::io::run_log::write_run_log;
use prevest::model::cohort::{CohortModel, CohortParams};
use prevest::model::epidemic::{EpidemicState, Trajectory};

#[test]
fn run_log_snapshot_small() {
    let params = CohortParams {
        death_probs: [0.5, 0.1, 0.2],
        heal_probs: [0.2, 0.3],
        time1: 1,
        time2: 3,
        memory: 4,
    };
    let model = CohortModel::new(params).expect("cohort config invalid");
    let cohort = model.run(&[10, 20, 0, 5], &[8, 6]).expect("cohort run");

    let trajectory = Trajectory::from_states(
        EpidemicState::new(1.0, 0.0, 0.0, 0.0),
        vec![
            EpidemicState::new(0.75, 0.125, 0.0625, 0.0625),
            EpidemicState::new(0.5, 0.125, 0.25, 0.125),
        ],
    );
    let estimates = Estimator::new(1000.0, 10_000.0)
        .estimate_all(
            &trajectory,
            &cohort.cumulative_deaths,
            &[
                EstimateTarget { trajectory_day: 1, deaths_day: 2 },
                EstimateTarget { trajectory_day: 2, deaths_day: 4 },
            ],
        )
        .expect("estimates");

    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_run_log(tmp.path(), "TEST-SMALL", 2, 4, &cohort, &estimates).expect("write run log");
    assert!(path.ends_with("run_TEST-SMALL.txt"));

    let s = std::fs::read_to_string(path).expect("read run log");
    insta::assert_snapshot!(s);
}
