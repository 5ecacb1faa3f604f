//! Sigmoidal activation functions used by the recurrent models.

use ndarray::{Array, Dimension};

/// Default steepness of the sigmoid curve.
pub const SIG_MU: f64 = 1.0;

/// Default scaling factor of the sigmoid curve.
pub const SIG_LAMDA: f64 = 1.0;

/// Logistic sigmoid with output in `(0, lamda)`.
///
/// Defined as:
/// `f(x) = lamda / (1 + exp(-mu * x))`
///
/// `mu` is the steepness of the curve and `lamda` the scaling factor. With
/// the defaults ([`SIG_MU`], [`SIG_LAMDA`]) this is the standard logistic
/// function and `sigmoid0(0) = 0.5`.
///
/// # Example
///
/// ```rust
/// use netinf::activation::{sigmoid0, SIG_LAMDA, SIG_MU};
///
/// let y = sigmoid0(0.0, SIG_MU, SIG_LAMDA);
/// assert!((y - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn sigmoid0(x: f64, mu: f64, lamda: f64) -> f64 {
    lamda / (1.0 + (-mu * x).exp())
}

/// Centred logistic sigmoid with output in `(-lamda/2, lamda/2)`.
#[inline]
pub fn sigmoid1(x: f64, mu: f64, lamda: f64) -> f64 {
    sigmoid0(x, mu, lamda) - lamda / 2.0
}

/// Logistic activation with fixed steepness and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sigmoid {
    pub mu: f64,
    pub lamda: f64,
}

impl Default for Sigmoid {
    fn default() -> Self {
        Self {
            mu: SIG_MU,
            lamda: SIG_LAMDA,
        }
    }
}

impl Sigmoid {
    /// Applies the sigmoid to a scalar.
    #[inline]
    pub fn forward(&self, x: f64) -> f64 {
        sigmoid0(x, self.mu, self.lamda)
    }

    /// Applies the sigmoid element-wise, returning a new array.
    pub fn forward_array<D: Dimension>(&self, x: &Array<f64, D>) -> Array<f64, D> {
        x.mapv(|v| self.forward(v))
    }
}

/// Applies the default logistic sigmoid directly on arrays.
///
/// This is a convenience trait extension mirroring [`Sigmoid::forward_array`].
pub trait SigmoidActivation {
    /// Applies the default sigmoid element-wise
    fn sigmoid(&self) -> Self;
}

impl<D: Dimension> SigmoidActivation for Array<f64, D> {
    fn sigmoid(&self) -> Self {
        Sigmoid::default().forward_array(self)
    }
}
