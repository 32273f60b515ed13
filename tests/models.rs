// tests/models.rs
use bevy_prng::WyRand;
use rand_core::SeedableRng;
use fitting_puzzles::mechanics::{clamp_activation, horner, linspace, mean_squared, seeded};
use fitting_puzzles::{Model, ModelError, ParameterSet, ParameterSpec, PolynomialModel, PropagationModel, TopologyBuilder};

fn params_of(model: &dyn Model) -> ParameterSet {
    ParameterSet::from_specs(model.parameter_specs()).expect("valid specs")
}

/* ──────────────────────────────────────────────────────────────────────────
1) Numeric helpers
────────────────────────────────────────────────────────────────────────── */

#[test]
fn helpers_cover_their_edge_cases() {
    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(3.0, 5.0, 1), [3.0]);
    assert_eq!(linspace(-1.0, 1.0, 5), [-1.0, -0.5, 0.0, 0.5, 1.0]);

    // 1 + 2x + 3x^2 at x = 2.
    assert_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
    assert_eq!(horner(&[], 2.0), 0.0);

    assert_eq!(mean_squared([1.0, -3.0]), 5.0);
    assert_eq!(mean_squared(std::iter::empty()), 0.0);

    assert_eq!(clamp_activation(-4.0), 0.0);
    assert_eq!(clamp_activation(140.0), 100.0);
    assert_eq!(clamp_activation(42.0), 42.0);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Polynomial fits
────────────────────────────────────────────────────────────────────────── */

#[test]
fn polynomial_at_the_truth_has_zero_error() {
    let truth = [0.13, -0.8, 0.72, 0.79, -0.68];
    let model = PolynomialModel::sampled(&truth, -1.3, 1.3, 25, 1.0).unwrap();
    assert_eq!(model.degree(), 4);
    assert_eq!(model.points().len(), 25);

    let mut params = params_of(&model);
    for (k, a) in truth.iter().enumerate() {
        assert!(params.set_value(&PolynomialModel::coefficient_id(k), *a));
    }
    assert!(model.mean_squared_error(&params) < 1e-24);
    assert_eq!(params.descent_order(), ["a4", "a3", "a2", "a1", "a0"]);

    let curve = model.curve(&params, -1.0, 1.0, 3);
    assert_eq!(curve.len(), 3);
    assert!((curve[1].1 - 0.13).abs() < 1e-12);
    assert!((model.evaluate(&params, 1.0) - truth.iter().sum::<f64>()).abs() < 1e-12);
}

#[test]
fn noisy_samples_are_reproducible() {
    let a = PolynomialModel::sampled_noisy(&[2.0, -0.3], -9.0, 9.0, 20, 0.1, &mut seeded(7), 0.01).unwrap();
    let mut rng = WyRand::from_seed(7u64.to_le_bytes());
    let b = PolynomialModel::sampled_noisy(&[2.0, -0.3], -9.0, 9.0, 20, 0.1, &mut rng, 0.01).unwrap();
    let clean = PolynomialModel::sampled(&[2.0, -0.3], -9.0, 9.0, 20, 0.01).unwrap();
    assert_eq!(a.points(), b.points());
    assert_ne!(a.points(), clean.points());
    assert!(a.points().iter().zip(clean.points()).all(|(p, q)| p.0 == q.0));
}

#[test]
fn coefficient_bounds_can_be_widened() {
    let model = PolynomialModel::line(vec![(0.0, 5.0)], 1.0).unwrap();
    let a0 = model.parameter_specs().into_iter().find(|s| s.id == "a0").unwrap();
    assert_eq!((a0.min, a0.max, a0.default), (-7.0, 7.0, 0.0));
    assert_eq!(
        model.with_coefficient_bounds(3, 0.0, 1.0, 0.5).unwrap_err(),
        ModelError::UnsupportedDegree(3)
    );
}

/* ──────────────────────────────────────────────────────────────────────────
3) Propagation networks
────────────────────────────────────────────────────────────────────────── */

#[test]
fn propagation_sums_then_clamps_layer_by_layer() {
    let mut b = TopologyBuilder::new();
    let i0 = b.input(80.0);
    let i1 = b.input(40.0);
    let h = b.node(1);
    let o = b.node(2);
    b.connect(i0, h, "w0").connect(i1, h, "w1").connect(h, o, "w2").target(o, 30.0);
    let weights = PropagationModel::uniform_weights(["w0", "w1", "w2"], 0.0, 2.0, 1.0);
    let model = PropagationModel::new(b.build().unwrap(), weights, 1.0).unwrap();

    let mut params = params_of(&model);
    // h = clamp(80 + 40) = 100, o = 100.
    assert_eq!(model.activations(&params), [80.0, 40.0, 100.0, 100.0]);
    assert_eq!(model.mean_squared_error(&params), 70.0 * 70.0);

    params.set_value("w0", 0.5);
    params.set_value("w1", 0.0);
    params.set_value("w2", 0.75);
    assert_eq!(model.activations(&params), [80.0, 40.0, 40.0, 30.0]);
    assert_eq!(model.mean_squared_error(&params), 0.0);
}

#[test]
fn topology_rejects_malformed_graphs() {
    let mut b = TopologyBuilder::new();
    let i = b.input(1.0);
    let o = b.node(1);
    b.connect(o, i, "w").target(o, 1.0);
    assert_eq!(b.build().unwrap_err(), ModelError::EdgeIntoInput(i));

    let mut b = TopologyBuilder::new();
    let i = b.input(1.0);
    let h = b.node(1);
    let o = b.node(1);
    b.connect(i, h, "w").connect(h, o, "w").target(o, 1.0);
    assert_eq!(b.build().unwrap_err(), ModelError::BackwardEdge { from: h, to: o });

    let mut b = TopologyBuilder::new();
    let i = b.input(1.0);
    let stray = b.node(0);
    let o = b.node(1);
    b.connect(i, o, "w").target(o, 1.0);
    assert_eq!(b.build().unwrap_err(), ModelError::ComputedInputLayer(stray));

    let mut b = TopologyBuilder::new();
    let i = b.input(1.0);
    b.connect(i, 9, "w").target(9, 1.0);
    assert_eq!(b.build().unwrap_err(), ModelError::UnknownNode(9));

    let mut b = TopologyBuilder::new();
    let i = b.input(1.0);
    let o = b.node(1);
    b.connect(i, o, "w");
    assert_eq!(b.build().unwrap_err(), ModelError::EmptyDataset);
}

#[test]
fn every_edge_weight_must_be_declared() {
    let mut b = TopologyBuilder::new();
    let i = b.input(1.0);
    let o = b.node(1);
    b.connect(i, o, "w").target(o, 1.0);
    let err = PropagationModel::new(b.build().unwrap(), vec![ParameterSpec::new("v", 0.0, 1.0, 0.5)], 1.0).unwrap_err();
    assert_eq!(err, ModelError::UndeclaredWeight { from: i, to: o, weight: "w".into() });
}
