use serde::{Deserialize, Serialize};

use crate::error::SamplerError;

/// A binary quadratic problem in the shape samplers consume.
///
/// Variables are labelled densely `0..num_variables`. Quadratic terms are
/// stored once per unordered pair with `u < v`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SampleRequest {
    pub num_variables: usize,
    pub linear: Vec<(usize, f64)>,
    pub quadratic: Vec<(usize, usize, f64)>,
    pub offset: f64,
    pub num_reads: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SampleRequest {
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.num_reads == 0 {
            return Err(SamplerError::InvalidRequest(String::from(
                "num_reads must be greater than zero",
            )));
        }

        if let Some(&(variable, _)) = self
            .linear
            .iter()
            .find(|(variable, _)| *variable >= self.num_variables)
        {
            return Err(SamplerError::InvalidRequest(format!(
                "linear term references unknown variable {variable}"
            )));
        }

        for &(u, v, _) in &self.quadratic {
            if u >= v || v >= self.num_variables {
                return Err(SamplerError::InvalidRequest(format!(
                    "invalid quadratic term ({u}, {v})"
                )));
            }
        }

        Ok(())
    }

    /// Energy of a full assignment, offset included.
    pub fn energy(&self, assignment: &[u8]) -> f64 {
        let linear: f64 = self
            .linear
            .iter()
            .filter(|(variable, _)| assignment[*variable] != 0)
            .map(|(_, bias)| bias)
            .sum();

        let quadratic: f64 = self
            .quadratic
            .iter()
            .filter(|(u, v, _)| assignment[*u] != 0 && assignment[*v] != 0)
            .map(|(_, _, bias)| bias)
            .sum();

        self.offset + linear + quadratic
    }

    /// Dense linear biases and the neighbourhood of every variable.
    pub(crate) fn adjacency(&self) -> (Vec<f64>, Vec<Vec<(usize, f64)>>) {
        let mut linear = vec![0.0; self.num_variables];
        let mut neighbours = vec![Vec::new(); self.num_variables];

        for &(variable, bias) in &self.linear {
            linear[variable] += bias;
        }

        for &(u, v, bias) in &self.quadratic {
            neighbours[u].push((v, bias));
            neighbours[v].push((u, bias));
        }

        (linear, neighbours)
    }
}
