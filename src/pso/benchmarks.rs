//! Standard benchmark objectives. All have their global minimum `0` at the
//! origin, except Rosenbrock whose minimum `0` lies at `(1, ..., 1)`.

use std::f64::consts::PI;

pub fn sphere(vec: &[f64]) -> f64 {
    vec.iter().map(|x| x * x).sum()
}

pub fn rosenbrock(vec: &[f64]) -> f64 {
    vec.windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (w[0] - 1.0).powi(2))
        .sum()
}

pub fn griewank(vec: &[f64]) -> f64 {
    let sum: f64 = vec.iter().map(|x| x * x).sum::<f64>() / 4000.0;
    let prod: f64 = vec
        .iter()
        .enumerate()
        .map(|(i, x)| (x / ((i + 1) as f64).sqrt()).cos())
        .product();
    sum - prod + 1.0
}

pub fn rastrigin(vec: &[f64]) -> f64 {
    10.0 * vec.len() as f64
        + vec
            .iter()
            .map(|x| x * x - 10.0 * (2.0 * PI * x).cos())
            .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_minima() {
        let zeros = [0.0; 4];
        assert_eq!(sphere(&zeros), 0.0);
        assert!(griewank(&zeros).abs() < 1e-12);
        assert!(rastrigin(&zeros).abs() < 1e-12);
        assert_eq!(rosenbrock(&[1.0; 4]), 0.0);
        assert!(rosenbrock(&zeros) > 0.0);
    }
}
