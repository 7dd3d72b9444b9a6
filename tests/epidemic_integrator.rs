use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use prevest::calibration::{basic_reproduction_number, effective_reproduction_number};
use prevest::math::ode::Rk4Scheme;
use prevest::model::epidemic::{EpidemicModel, EpidemicParams, EpidemicState};
use prevest::reference;

fn scaled_ever_infected(state: &EpidemicState) -> i64 {
    (state.ever_infected() * reference::DIMENSION) as i64
}

#[test]
fn reference_run_reproduces_published_counts() {
    let model = EpidemicModel::new(reference::epidemic_params());
    let traj = model.simulate(reference::initial_state(), reference::HORIZON_DAYS);

    assert_eq!(traj.len(), 181);
    assert_eq!(traj.get(0), Some(&reference::initial_state()));
    assert_eq!(scaled_ever_infected(&traj.states()[129]), 1_723_368);
    assert_eq!(scaled_ever_infected(&traj.states()[180]), 1_742_957);
}

#[test]
fn classic_scheme_moves_the_published_counts() {
    let params = EpidemicParams { scheme: Rk4Scheme::Classic, ..reference::epidemic_params() };
    let traj = EpidemicModel::new(params).simulate(reference::initial_state(), 180);

    assert_eq!(scaled_ever_infected(&traj.states()[129]), 1_723_483);
    assert_eq!(scaled_ever_infected(&traj.states()[180]), 1_743_033);
}

#[test]
fn reference_run_conserves_total_and_never_shrinks_removed() {
    let traj = EpidemicModel::new(reference::epidemic_params())
        .simulate(reference::initial_state(), 180);
    let total0 = traj.states()[0].total();

    for (_, state) in traj.iter() {
        assert_abs_diff_eq!(state.total(), total0, epsilon = 1e-9);
    }
    for w in traj.states().windows(2) {
        assert!(w[1].r1 >= w[0].r1);
        assert!(w[1].r2 >= w[0].r2);
    }
}

#[test]
fn switch_day_selects_the_regime() {
    let base = reference::epidemic_params();
    let always_after = EpidemicParams { switch_day: -1, ..base.clone() };
    let always_before = EpidemicParams { switch_day: 180, ..base.clone() };
    let init = reference::initial_state();

    let a = EpidemicModel::new(always_after).simulate(init, 180);
    let b = EpidemicModel::new(always_before).simulate(init, 180);
    assert_eq!(a.states()[0], b.states()[0]);
    for day in 1..=180 {
        assert_ne!(a.states()[day], b.states()[day], "day {day}");
    }

    let same_rate = EpidemicParams { beta_after: base.beta, ..base };
    let a = EpidemicModel::new(EpidemicParams { switch_day: -1, ..same_rate.clone() }).simulate(init, 180);
    let b = EpidemicModel::new(EpidemicParams { switch_day: 180, ..same_rate }).simulate(init, 180);
    assert_eq!(a, b);
}

#[test]
fn step_on_switch_day_still_uses_pre_switch_rate() {
    let params = EpidemicParams { switch_day: 2, ..reference::epidemic_params() };
    let model = EpidemicModel::new(params);
    let traj = model.simulate(reference::initial_state(), 4);

    let mut state = reference::initial_state();
    for (day, pre) in [true, true, true, false].into_iter().enumerate() {
        state = model.step(&state, pre);
        assert_eq!(traj.states()[day + 1], state, "day {}", day + 1);
    }
}

#[test]
fn derivative_splits_removal_between_detected_and_undetected() {
    let params = EpidemicParams {
        beta: 0.5,
        beta_after: 0.25,
        switch_day: 0,
        d_detected: 2.0,
        d_undetected: 4.0,
        p_catch: 0.5,
        scheme: Rk4Scheme::Reference,
    };
    let model = EpidemicModel::new(params);
    let state = EpidemicState::new(0.5, 0.5, 0.0, 0.0);

    let pre = model.derivative(&state, true);
    assert_abs_diff_eq!(pre.s, -0.125, epsilon = 1e-15);
    assert_abs_diff_eq!(pre.i, 0.125 - 0.125 - 0.0625, epsilon = 1e-15);
    assert_abs_diff_eq!(pre.r1, 0.125, epsilon = 1e-15);
    assert_abs_diff_eq!(pre.r2, 0.0625, epsilon = 1e-15);
    assert_abs_diff_eq!(pre.total(), 0.0, epsilon = 1e-15);

    let post = model.derivative(&state, false);
    assert_abs_diff_eq!(post.s, -0.0625, epsilon = 1e-15);
    assert_eq!(post.r1, pre.r1);
}

#[test]
fn degenerate_parameters_do_not_panic() {
    let params = EpidemicParams { d_detected: -5.2, p_catch: 1.7, ..reference::epidemic_params() };
    let traj = EpidemicModel::new(params).simulate(reference::initial_state(), 30);
    assert_eq!(traj.len(), 31);
}

#[test]
fn reproduction_numbers_follow_exit_rate() {
    let params = reference::epidemic_params();
    let exit = 0.05375 / 5.2 + (1.0 - 0.05375) / 15.0;
    assert_abs_diff_eq!(basic_reproduction_number(&params, true), 0.27704 / exit, epsilon = 1e-12);
    assert_abs_diff_eq!(basic_reproduction_number(&params, false), 0.16632 / exit, epsilon = 1e-12);

    let half = EpidemicState::new(0.5, 0.1, 0.2, 0.2);
    assert_abs_diff_eq!(
        effective_reproduction_number(&params, &half, true),
        0.5 * 0.27704 / exit,
        epsilon = 1e-12
    );
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_total_conserved_and_removed_monotone(
        beta in 0.0f64..1.0,
        beta_after in 0.0f64..1.0,
        switch_day in -1i64..200,
        d_detected in 2.0f64..30.0,
        d_undetected in 2.0f64..30.0,
        p_catch in 0.0f64..1.0,
        seed in 1e-7f64..0.1,
        classic in any::<bool>(),
    ) {
        let params = EpidemicParams {
            beta,
            beta_after,
            switch_day,
            d_detected,
            d_undetected,
            p_catch,
            scheme: if classic { Rk4Scheme::Classic } else { Rk4Scheme::Reference },
        };
        let traj = EpidemicModel::new(params).simulate(EpidemicState::seeded(seed), 180);
        let total0 = traj.states()[0].total();
        for (_, state) in traj.iter() {
            prop_assert!((state.total() - total0).abs() < 1e-9);
        }
        for w in traj.states().windows(2) {
            prop_assert!(w[1].r1 >= w[0].r1);
            prop_assert!(w[1].r2 >= w[0].r2);
        }
    }
}
