//! Integration tests for the multi-view shape optimizer.
//!
//! Covers the behavioral contract: cross-view shape reconciliation, scale
//! resolution precedence, determinism, and convergence within budget.

use bodyfit_core::{DepthSignal, ParamVector, Real, ShapePosePrediction, Vec3};
use bodyfit_optim::{optimize, OptimizeOptions};

fn prediction(shape: Vec<Real>, pose: Vec<Real>, confidence: Real) -> ShapePosePrediction {
    ShapePosePrediction {
        shape: ParamVector::from_vec(shape),
        pose: ParamVector::from_vec(pose),
        camera: Vec3::new(1.0, 0.0, 0.0),
        confidence,
    }
}

fn shape_with_first(first: Real) -> Vec<Real> {
    let mut shape = vec![0.0; 10];
    shape[0] = first;
    shape
}

fn mse(a: &ParamVector, b: &ParamVector) -> Real {
    (a - b).norm_squared() / a.len() as Real
}

#[test]
fn opposing_views_settle_on_their_average() {
    let front = prediction(shape_with_first(0.2), vec![0.0; 72], 0.9);
    let side = prediction(shape_with_first(-0.2), vec![0.0; 72], 0.9);

    let result = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();

    // The average initialization already balances both data terms, so the
    // first component stays at zero.
    assert!(
        result.shape[0].abs() < 1e-9,
        "first component should stay near the average 0.0, got {}",
        result.shape[0]
    );
    assert!(result.loss.is_finite());
    assert!(result.loss >= 0.0);
    assert_eq!(result.scale, 1.0);
}

#[test]
fn optimized_shape_is_closer_to_midpoint_than_either_view() {
    let s1: Vec<Real> = (0..10).map(|i| 0.3 * (i as Real / 9.0) - 0.1).collect();
    let s2: Vec<Real> = (0..10).map(|i| -0.2 * (i as Real / 9.0) + 0.25).collect();
    let front = prediction(s1.clone(), vec![0.0; 72], 0.8);
    let side = prediction(s2.clone(), vec![0.0; 72], 0.8);

    let result = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();

    let midpoint = (&front.shape + &side.shape) / 2.0;
    let to_mid = mse(&result.shape, &midpoint);
    let to_front = mse(&result.shape, &front.shape);
    let to_side = mse(&result.shape, &side.shape);

    assert!(to_mid < to_front, "to_mid={to_mid} to_front={to_front}");
    assert!(to_mid < to_side, "to_mid={to_mid} to_side={to_side}");
}

#[test]
fn identical_views_stay_near_input_without_crossing_zero() {
    let mut shape = vec![0.0; 10];
    shape[0] = 0.5;
    shape[1] = -0.3;
    let front = prediction(shape.clone(), vec![0.0; 72], 0.9);
    let side = prediction(shape.clone(), vec![0.0; 72], 0.9);

    let result = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();

    // The consistency term is satisfied at init; the prior pulls gently
    // toward zero. Components must keep their sign and not drift far.
    for (i, &init) in shape.iter().enumerate() {
        let opt = result.shape[i];
        if init != 0.0 {
            assert!(
                opt * init > 0.0,
                "component {i} crossed zero: init={init} opt={opt}"
            );
            assert!(
                opt.abs() <= init.abs() + 0.02,
                "component {i} drifted away from zero: init={init} opt={opt}"
            );
            assert!(
                (opt - init).abs() < 0.05,
                "component {i} moved too far: init={init} opt={opt}"
            );
        }
    }
}

#[test]
fn depth_constrained_solve_drives_the_loss_down() {
    // Depth demands a much larger body than either view predicted, so the
    // initial point carries a large depth-alignment loss for the solver to
    // burn down.
    let front = prediction(shape_with_first(0.3), vec![0.0; 72], 0.9);
    let side = prediction(shape_with_first(0.1), vec![0.0; 72], 0.9);
    let depth = DepthSignal {
        scale_factor: 1.05,
        point_count: 5000,
    };

    let initial = optimize(
        &front,
        &side,
        Some(&depth),
        None,
        &OptimizeOptions {
            max_iterations: 1,
            ..OptimizeOptions::default()
        },
    )
    .unwrap();
    let full = optimize(&front, &side, Some(&depth), None, &OptimizeOptions::default()).unwrap();

    // A single-iteration run reports the loss at the initial point.
    assert!(
        full.loss < initial.loss,
        "final loss {} should be well below initial loss {}",
        full.loss,
        initial.loss
    );
    // The depth term dominates at init (~5); most of it must be gone.
    assert!(full.loss < initial.loss / 2.0);
}

#[test]
fn front_depth_signal_wins_the_scale_tie_break() {
    let front = prediction(shape_with_first(0.1), vec![0.0; 72], 0.9);
    let side = prediction(shape_with_first(0.1), vec![0.0; 72], 0.9);
    let depth_front = DepthSignal {
        scale_factor: 1.02,
        point_count: 1000,
    };
    let depth_side = DepthSignal {
        scale_factor: 0.97,
        point_count: 1000,
    };

    let result = optimize(
        &front,
        &side,
        Some(&depth_front),
        Some(&depth_side),
        &OptimizeOptions::default(),
    )
    .unwrap();
    assert_eq!(result.scale, 1.02);
}

#[test]
fn side_depth_signal_used_when_front_absent() {
    let front = prediction(shape_with_first(0.1), vec![0.0; 72], 0.9);
    let side = prediction(shape_with_first(0.1), vec![0.0; 72], 0.9);
    let depth_side = DepthSignal {
        scale_factor: 1.05,
        point_count: 1000,
    };

    let result = optimize(
        &front,
        &side,
        None,
        Some(&depth_side),
        &OptimizeOptions::default(),
    )
    .unwrap();
    assert_eq!(result.scale, 1.05);
}

#[test]
fn no_depth_defaults_to_unit_scale() {
    let front = prediction(shape_with_first(0.1), vec![0.0; 72], 0.9);
    let side = prediction(shape_with_first(-0.1), vec![0.0; 72], 0.9);
    let result = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();
    assert_eq!(result.scale, 1.0);
}

#[test]
fn identical_inputs_produce_identical_results() {
    let front = prediction(
        (0..10).map(|i| (i as Real * 0.7).sin() * 0.3).collect(),
        (0..72).map(|i| (i as Real * 0.3).cos() * 0.05).collect(),
        0.85,
    );
    let side = prediction(
        (0..10).map(|i| (i as Real * 1.3).cos() * 0.2).collect(),
        (0..72).map(|i| (i as Real * 0.9).sin() * 0.04).collect(),
        0.75,
    );

    let a = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();
    let b = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();

    assert_eq!(a.shape, b.shape);
    assert_eq!(a.pose_front, b.pose_front);
    assert_eq!(a.pose_side, b.pose_side);
    assert_eq!(a.loss, b.loss);
    assert_eq!(a.iterations, b.iterations);
}

#[test]
fn poses_stay_near_their_own_views() {
    let pose_front: Vec<Real> = (0..72).map(|i| if i < 3 { 0.3 } else { 0.0 }).collect();
    let pose_side: Vec<Real> = (0..72).map(|i| if i < 3 { -0.3 } else { 0.0 }).collect();
    let front = prediction(shape_with_first(0.1), pose_front.clone(), 0.9);
    let side = prediction(shape_with_first(0.1), pose_side.clone(), 0.9);

    let result = optimize(&front, &side, None, None, &OptimizeOptions::default()).unwrap();

    // Poses are view-specific: each optimized pose must remain closer to
    // its own prediction than to the other view's.
    assert!(mse(&result.pose_front, &front.pose) < mse(&result.pose_front, &side.pose));
    assert!(mse(&result.pose_side, &side.pose) < mse(&result.pose_side, &front.pose));
}

#[test]
fn stays_within_iteration_budget() {
    let front = prediction(shape_with_first(2.0), vec![0.2; 72], 0.5);
    let side = prediction(shape_with_first(-2.0), vec![-0.2; 72], 0.5);
    let opts = OptimizeOptions::default();
    let result = optimize(&front, &side, None, None, &opts).unwrap();
    assert!(result.iterations <= opts.max_iterations);
    assert!(result.loss.is_finite());
}
