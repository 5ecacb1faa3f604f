//! Observed or simulated trajectories.
//!
//! A [`Dynamics`] is a `tpoints x vars` matrix: rows are time points,
//! columns are variables (genes / nodes). It is both the training target
//! and the output of simulation and prediction.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{NetInfError, Result};

/// A trajectory of `vars` variables over `tpoints` time points
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dynamics {
    data: Array2<f64>,
    labels: Option<Vec<String>>,
}

impl Dynamics {
    /// Creates a zero-filled trajectory
    pub fn new(vars: usize, tpoints: usize) -> Self {
        Self {
            data: Array2::zeros((tpoints, vars)),
            labels: None,
        }
    }

    /// Creates a zero-filled trajectory with variable labels
    pub fn with_labels(vars: usize, tpoints: usize, labels: Vec<String>) -> Result<Self> {
        let mut dynamics = Self::new(vars, tpoints);
        dynamics.set_labels(labels)?;
        Ok(dynamics)
    }

    /// Wraps an existing `tpoints x vars` matrix
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data, labels: None }
    }

    /// Parses whitespace separated text, one time point per line.
    ///
    /// A first line made only of non-numeric tokens is taken as the
    /// variable labels. Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut labels = None;
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if rows.is_empty()
                && labels.is_none()
                && tokens.iter().all(|t| t.parse::<f64>().is_err())
            {
                labels = Some(tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>());
                continue;
            }
            let row = tokens
                .iter()
                .map(|t| {
                    t.parse::<f64>().map_err(|_| {
                        NetInfError::Parse(format!("line {}: invalid value '{}'", lineno + 1, t))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(NetInfError::Parse(format!(
                        "line {}: expected {} values, found {}",
                        lineno + 1,
                        first.len(),
                        row.len()
                    )));
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(NetInfError::Parse("no time points found".into()));
        }
        let vars = rows[0].len();
        let tpoints = rows.len();
        let data = Array2::from_shape_vec((tpoints, vars), rows.into_iter().flatten().collect())
            .map_err(|e| NetInfError::Parse(e.to_string()))?;

        let mut dynamics = Self::from_array(data);
        if let Some(labels) = labels {
            dynamics.set_labels(labels)?;
        }
        Ok(dynamics)
    }

    pub fn vars(&self) -> usize {
        self.data.ncols()
    }

    pub fn tpoints(&self) -> usize {
        self.data.nrows()
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn set_labels(&mut self, labels: Vec<String>) -> Result<()> {
        if labels.len() != self.vars() {
            return Err(NetInfError::DimensionMismatch {
                expected: self.vars(),
                found: labels.len(),
            });
        }
        self.labels = Some(labels);
        Ok(())
    }

    #[inline]
    pub fn value(&self, var: usize, tpoint: usize) -> f64 {
        self.data[[tpoint, var]]
    }

    #[inline]
    pub fn set_value(&mut self, var: usize, tpoint: usize, val: f64) {
        self.data[[tpoint, var]] = val;
    }

    /// State of every variable at one time point
    pub fn row(&self, tpoint: usize) -> ArrayView1<'_, f64> {
        self.data.row(tpoint)
    }

    /// Series of one variable over time
    pub fn column(&self, var: usize) -> ArrayView1<'_, f64> {
        self.data.column(var)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Mean squared error over all variables and time points
    pub fn mse(&self, other: &Dynamics) -> Result<f64> {
        self.check_shape(other)?;
        let n = self.data.len();
        if n == 0 {
            return Ok(0.0);
        }
        let sum: f64 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        Ok(sum / n as f64)
    }

    /// Mean squared error of a single variable
    pub fn mse_of_var(&self, other: &Dynamics, var: usize) -> Result<f64> {
        self.check_shape(other)?;
        if var >= self.vars() {
            return Err(NetInfError::UnknownNode(var));
        }
        Ok(series_mse(self.column(var), other.column(var)))
    }

    /// Per-variable mean squared errors
    pub fn mse_vector(&self, other: &Dynamics) -> Result<Array1<f64>> {
        self.check_shape(other)?;
        Ok((0..self.vars())
            .map(|var| series_mse(self.column(var), other.column(var)))
            .collect())
    }

    fn check_shape(&self, other: &Dynamics) -> Result<()> {
        if self.vars() != other.vars() {
            return Err(NetInfError::DimensionMismatch {
                expected: self.vars(),
                found: other.vars(),
            });
        }
        if self.tpoints() != other.tpoints() {
            return Err(NetInfError::DimensionMismatch {
                expected: self.tpoints(),
                found: other.tpoints(),
            });
        }
        Ok(())
    }
}

/// Mean squared error between two equally long series
pub(crate) fn series_mse(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    sum / a.len() as f64
}

impl fmt::Display for Dynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(labels) = &self.labels {
            writeln!(f, "{}", labels.join("\t"))?;
        }
        for row in self.data.outer_iter() {
            let line: Vec<String> = row.iter().map(|v| format!("{:.5e}", v)).collect();
            writeln!(f, "{}", line.join("\t"))?;
        }
        Ok(())
    }
}
