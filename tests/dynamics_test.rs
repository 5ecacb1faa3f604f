//! Tests for trajectories

use ndarray::array;
use netinf::dynamics::Dynamics;

#[test]
fn test_dynamics_creation() {
    let dynamics = Dynamics::new(3, 5);
    assert_eq!(dynamics.vars(), 3);
    assert_eq!(dynamics.tpoints(), 5);
    assert!(dynamics.labels().is_none());
    assert!(dynamics.as_array().iter().all(|&v| v == 0.0));
}

#[test]
fn test_values_and_views() {
    let mut dynamics = Dynamics::new(2, 3);
    dynamics.set_value(1, 2, 0.75);
    dynamics.set_value(0, 1, 0.25);

    assert_eq!(dynamics.value(1, 2), 0.75);
    assert_eq!(dynamics.row(1), array![0.25, 0.0]);
    assert_eq!(dynamics.column(1), array![0.0, 0.0, 0.75]);
}

#[test]
fn test_labels_must_match_vars() {
    assert!(Dynamics::with_labels(2, 3, vec!["a".into(), "b".into()]).is_ok());
    assert!(Dynamics::with_labels(2, 3, vec!["a".into()]).is_err());
}

#[test]
fn test_mse() {
    let a = Dynamics::from_array(array![[0.0, 1.0], [1.0, 1.0]]);
    let b = Dynamics::from_array(array![[0.0, 0.0], [1.0, 3.0]]);

    assert!((a.mse(&b).unwrap() - 1.25).abs() < 1e-12);
    assert!((a.mse_of_var(&b, 0).unwrap()).abs() < 1e-12);
    assert!((a.mse_of_var(&b, 1).unwrap() - 2.5).abs() < 1e-12);
    assert_eq!(a.mse_vector(&b).unwrap(), array![0.0, 2.5]);
    assert!(a.mse_of_var(&b, 2).is_err());
}

#[test]
fn test_mse_shape_mismatch() {
    let a = Dynamics::new(2, 4);
    assert!(a.mse(&Dynamics::new(3, 4)).is_err());
    assert!(a.mse(&Dynamics::new(2, 5)).is_err());
    assert!(a.mse_vector(&Dynamics::new(1, 4)).is_err());
}

#[test]
fn test_parse_tab_separated() {
    let text = "# expression of two genes\n0.1\t0.2\n0.3\t0.4\n";
    let dynamics = Dynamics::parse(text).unwrap();
    assert_eq!(dynamics.vars(), 2);
    assert_eq!(dynamics.tpoints(), 2);
    assert_eq!(dynamics.value(0, 1), 0.3);
    assert!(Dynamics::parse("0.1 abc\n").is_err());
}

#[test]
fn test_finiteness() {
    let mut dynamics = Dynamics::new(2, 2);
    assert!(dynamics.is_finite());
    dynamics.set_value(0, 1, f64::NAN);
    assert!(!dynamics.is_finite());
}

#[test]
fn test_json_round_trip() {
    let dynamics = Dynamics::with_labels(2, 2, vec!["x".into(), "y".into()]).unwrap();
    let text = serde_json::to_string(&dynamics).unwrap();
    let restored: Dynamics = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, dynamics);
}
