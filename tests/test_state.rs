//! Tests for lazy state allocation, persistence across steps and input validation.

mod common;

use common::{filled_grads, RecordingLayer};
use proptest::prelude::*;
use rtorch_optim::nn::{Layer, Linear};
use rtorch_optim::optim::{
    Adagrad, AdagradConfig, Optim, OptimError, Optimizer, OptimizerConfig, ParamKind, SgdConfig, SGD,
};
use rtorch_optim::tensor::{matrix_shape, vector_shape, Matrix, ParamShape, Vector};

fn both_variants() -> Vec<Optim> {
    vec![
        SGD::new(0.1, 0.9).unwrap().into(),
        Adagrad::new(0.1, 1e-8).unwrap().into(),
    ]
}

fn three_layers() -> Vec<RecordingLayer> {
    vec![
        RecordingLayer::new(4, 3),
        RecordingLayer::new(2, 4),
        RecordingLayer::new(1, 2),
    ]
}

#[test]
fn test_state_is_lazily_allocated() {
    for mut opt in both_variants() {
        assert!(!opt.is_initialized());
        assert_eq!(opt.num_layers(), None);
        assert!(opt.state().is_empty());

        let mut layers = three_layers();
        let (w, b) = filled_grads(&layers, 0.5);
        opt.step(&w, &b, &mut layers).unwrap();

        assert!(opt.is_initialized());
        assert_eq!(opt.num_layers(), Some(3));
    }
}

#[test]
fn test_state_shapes_match_seeding_gradients() {
    for mut opt in both_variants() {
        let mut layers = three_layers();
        let (w, b) = filled_grads(&layers, 1.0);
        for _ in 0..3 {
            opt.step(&w, &b, &mut layers).unwrap();
        }
        assert_eq!(opt.state().len(), layers.len());
        for (i, slot) in opt.state().iter().enumerate() {
            assert_eq!(slot.weight_shape(), matrix_shape(&w[i]), "{} layer {}", opt.name(), i);
            assert_eq!(slot.bias_shape(), vector_shape(&b[i]), "{} layer {}", opt.name(), i);
        }
    }
}

#[test]
fn test_state_persists_across_calls() {
    for mut opt in both_variants() {
        let mut layers = vec![RecordingLayer::new(1, 1)];
        let (w, b) = filled_grads(&layers, 1.0);

        opt.step(&w, &b, &mut layers).unwrap();
        let after_one = opt.state().slot(0).unwrap().weight[[0, 0]];
        opt.step(&w, &b, &mut layers).unwrap();
        let after_two = opt.state().slot(0).unwrap().weight[[0, 0]];

        assert_ne!(after_one, 0.0);
        // Accumulation, not re-initialization: the second value builds on the first.
        assert!(after_two.abs() > after_one.abs(), "{}: {} vs {}", opt.name(), after_one, after_two);
        assert_eq!(opt.steps(), 2);
    }
}

#[test]
fn test_layer_count_change_is_rejected_without_mutation() {
    for mut opt in both_variants() {
        let mut layers = three_layers();
        let (w, b) = filled_grads(&layers, 1.0);
        opt.step(&w, &b, &mut layers).unwrap();
        let state_before = opt.state().clone();

        let mut fewer = three_layers()[..2].to_vec();
        let (w2, b2) = filled_grads(&fewer, 1.0);
        let err = opt.step(&w2, &b2, &mut fewer).unwrap_err();

        assert_eq!(err, OptimError::LayerCountChanged { expected: 3, got: 2 });
        assert!(fewer.iter().all(|l| l.updates() == 0));
        assert_eq!(opt.state(), &state_before);
        assert_eq!(opt.steps(), 1);
    }
}

#[test]
fn test_gradient_count_mismatch_is_rejected_without_mutation() {
    for mut opt in both_variants() {
        let mut layers = three_layers();
        let (mut w, b) = filled_grads(&layers, 1.0);
        w.pop();

        let err = opt.step(&w, &b, &mut layers).unwrap_err();

        assert_eq!(
            err,
            OptimError::LengthMismatch { weight_grads: 2, bias_grads: 3, layers: 3 }
        );
        assert!(layers.iter().all(|l| l.updates() == 0));
        // A rejected first call does not fix the state.
        assert!(!opt.is_initialized());
        assert_eq!(opt.steps(), 0);
    }
}

#[test]
fn test_shape_change_in_last_layer_rejects_whole_step() {
    for mut opt in both_variants() {
        let mut layers = three_layers();
        let (w, mut b) = filled_grads(&layers, 1.0);
        opt.step(&w, &b, &mut layers).unwrap();

        // Only the last layer is wrong; the first two must not be touched either.
        b[2] = Vector::zeros(5);
        let err = opt.step(&w, &b, &mut layers).unwrap_err();

        assert_eq!(
            err,
            OptimError::ShapeMismatch {
                layer: 2,
                param: ParamKind::Bias,
                expected: ParamShape::new(1, 1),
                got: ParamShape::new(5, 1),
            }
        );
        assert!(layers.iter().all(|l| l.updates() == 1));
    }
}

#[test]
fn test_gradient_must_match_layer_on_first_step() {
    for mut opt in both_variants() {
        let mut layers = vec![RecordingLayer::new(2, 2)];
        let err = opt
            .step(&[Matrix::zeros((2, 3))], &[Vector::zeros(2)], &mut layers)
            .unwrap_err();
        assert!(matches!(err, OptimError::ShapeMismatch { layer: 0, param: ParamKind::Weight, .. }));
        assert!(!opt.is_initialized());
    }
}

#[test]
fn test_empty_network_fixes_zero_layers() {
    for mut opt in both_variants() {
        let mut none: Vec<RecordingLayer> = Vec::new();
        opt.step(&[], &[], &mut none).unwrap();
        assert_eq!(opt.num_layers(), Some(0));

        let mut one = vec![RecordingLayer::new(1, 1)];
        let (w, b) = filled_grads(&one, 1.0);
        assert_eq!(
            opt.step(&w, &b, &mut one),
            Err(OptimError::LayerCountChanged { expected: 0, got: 1 })
        );
    }
}

#[test]
fn test_heterogeneous_layers_through_trait_objects() {
    let mut layers: Vec<Box<dyn Layer>> = vec![
        Box::new(Linear::zeros(3, 2)),
        Box::new(RecordingLayer::new(1, 2)),
    ];
    let w = vec![Matrix::ones((2, 3)), Matrix::ones((1, 2))];
    let b = vec![Vector::ones(2), Vector::ones(1)];

    let mut opt = OptimizerConfig::from(SgdConfig { learning_rate: 0.2, momentum: 0.0 })
        .build()
        .unwrap();
    opt.step(&w, &b, &mut layers).unwrap();
    assert_eq!(opt.num_layers(), Some(2));
}

#[test]
fn test_training_reduces_quadratic_loss() {
    // Minimize 0.5 * ||W - T||^2 + 0.5 * ||b - t||^2 for a fixed target.
    let target_w = Matrix::from_shape_fn((3, 2), |(i, j)| (i as f32) - (j as f32));
    let target_b = Vector::from_vec(vec![1.0, -1.0, 0.5]);

    let configs = [
        OptimizerConfig::from(SgdConfig { learning_rate: 0.1, momentum: 0.9 }),
        OptimizerConfig::from(AdagradConfig { learning_rate: 0.5, epsilon: 1e-8 }),
    ];
    for cfg in configs {
        let mut opt = cfg.build().unwrap();
        let mut layers = vec![Linear::zeros(2, 3)];
        let loss = |l: &Linear| {
            let dw = l.weight() - &target_w;
            let db = l.bias() - &target_b;
            0.5 * (dw.mapv(|x| x * x).sum() + db.mapv(|x| x * x).sum())
        };
        let initial = loss(&layers[0]);
        for _ in 0..100 {
            let gw = layers[0].weight() - &target_w;
            let gb = layers[0].bias() - &target_b;
            opt.step(&[gw], &[gb], &mut layers).unwrap();
        }
        let fin = loss(&layers[0]);
        assert!(fin < initial * 0.01, "{}: {} -> {}", opt.name(), initial, fin);
    }
}

proptest! {
    #[test]
    fn prop_wrong_layer_count_never_mutates(
        extra in 1usize..4,
        use_adagrad in any::<bool>(),
    ) {
        let mut opt: Optim = if use_adagrad {
            Adagrad::with_lr(0.1).unwrap().into()
        } else {
            SGD::new(0.1, 0.5).unwrap().into()
        };
        let mut layers = vec![RecordingLayer::new(2, 2)];
        let (w, b) = filled_grads(&layers, 1.0);
        opt.step(&w, &b, &mut layers).unwrap();

        let mut more: Vec<RecordingLayer> = (0..1 + extra).map(|_| RecordingLayer::new(2, 2)).collect();
        let (w, b) = filled_grads(&more, 1.0);
        prop_assert!(opt.step(&w, &b, &mut more).is_err());
        prop_assert!(more.iter().all(|l| l.updates() == 0));
        prop_assert_eq!(opt.state().len(), 1);
    }
}
