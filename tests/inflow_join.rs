use prevest::model::epidemic::{EpidemicModel, EpidemicState, Trajectory};
use prevest::model::inflow::{join_inflow, simulated_detections};
use prevest::{reference, ModelError};

/// Removed-detected fractions chosen to be exact in binary.
fn toy_trajectory() -> Trajectory {
    let r1 = [0.25, 0.75, 0.875, 0.8125];
    let rest = r1.iter().map(|&r| EpidemicState::new(0.0, 0.0, r, 0.0)).collect();
    Trajectory::from_states(EpidemicState::default(), rest)
}

#[test]
fn appends_scaled_daily_increase_of_detected() {
    let traj = toy_trajectory();
    let joined = join_inflow(&[7, 9], &traj, 8.0, 1, 4).expect("join");
    // 0.25*8, 0.5*8, 0.125*8, then -0.0625*8 truncates toward zero
    assert_eq!(joined, vec![7, 9, 2, 4, 1, 0]);
}

#[test]
fn offset_selects_first_simulated_day() {
    let traj = toy_trajectory();
    assert_eq!(simulated_detections(&traj, 8.0, 2, 2).expect("join"), vec![4, 1]);
    assert_eq!(join_inflow(&[3], &traj, 8.0, 4, 0).expect("join"), vec![3]);
}

#[test]
fn rejects_ranges_outside_trajectory() {
    let traj = toy_trajectory();
    assert_eq!(
        join_inflow(&[], &traj, 8.0, 3, 3),
        Err(ModelError::TrajectoryOutOfRange { day: 5, last: 4 })
    );
    assert_eq!(join_inflow(&[], &traj, 8.0, 0, 2), Err(ModelError::JoinBeforeStart));
}

#[test]
fn huge_offset_is_rejected_not_wrapped() {
    let traj = toy_trajectory();
    assert_eq!(
        simulated_detections(&traj, 1.0, usize::MAX, 2),
        Err(ModelError::TrajectoryOutOfRange { day: usize::MAX, last: 4 })
    );
    assert_eq!(
        join_inflow(&[1], &traj, 1.0, usize::MAX - 1, 5),
        Err(ModelError::TrajectoryOutOfRange { day: usize::MAX, last: 4 })
    );
}

#[test]
fn joining_is_repeatable() {
    let traj = EpidemicModel::new(reference::epidemic_params()).simulate(reference::initial_state(), 180);
    let historical: Vec<i64> = (0..20).map(|d| 100 + 5 * d).collect();

    let a = join_inflow(&historical, &traj, reference::DIMENSION, 60, 100).expect("join");
    let b = join_inflow(&historical, &traj, reference::DIMENSION, 60, 100).expect("join");
    assert_eq!(a, b);
    assert_eq!(a.len(), 120);
    assert_eq!(&a[..20], historical.as_slice());
    assert_eq!(
        &a[20..30],
        &[4197, 4330, 4451, 4559, 4653, 4733, 4799, 4848, 4883, 4903]
    );
    assert!(a.iter().all(|&v| v >= 0));
}
