use std::collections::{BTreeMap, BTreeSet};

use fxhash::FxHashMap;
use velo_samplers::sample_request::SampleRequest;

use crate::qubo::{
    qubo_variable::{QuboVariable, VariablePair},
    sample::Sample,
};

/// Quadratic unconstrained binary objective keyed by variable pairs.
///
/// Keys are kept ordered so that building the same problem twice yields the
/// same coefficients in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qubo {
    coefficients: BTreeMap<VariablePair, f64>,
}

impl Qubo {
    pub fn add(&mut self, a: QuboVariable, b: QuboVariable, bias: f64) {
        *self
            .coefficients
            .entry(VariablePair::new(a, b))
            .or_insert(0.0) += bias;
    }

    pub fn add_linear(&mut self, variable: QuboVariable, bias: f64) {
        self.add(variable, variable, bias);
    }

    pub fn coefficient(&self, a: QuboVariable, b: QuboVariable) -> f64 {
        self.coefficients
            .get(&VariablePair::new(a, b))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VariablePair, f64)> {
        self.coefficients.iter().map(|(pair, &bias)| (pair, bias))
    }

    pub fn linear(&self) -> impl Iterator<Item = (QuboVariable, f64)> + '_ {
        self.iter()
            .filter(|(pair, _)| pair.is_linear())
            .map(|(pair, bias)| (pair.first(), bias))
    }

    pub fn quadratic(&self) -> impl Iterator<Item = (QuboVariable, QuboVariable, f64)> + '_ {
        self.iter()
            .filter(|(pair, _)| !pair.is_linear())
            .map(|(pair, bias)| (pair.first(), pair.second(), bias))
    }

    pub fn variables(&self) -> BTreeSet<QuboVariable> {
        self.coefficients
            .keys()
            .flat_map(|pair| [pair.first(), pair.second()])
            .collect()
    }

    pub fn num_variables(&self) -> usize {
        self.variables().len()
    }

    /// Objective value of a sample, without offset.
    pub fn energy(&self, sample: &Sample) -> f64 {
        self.iter()
            .filter(|(pair, _)| sample.get(&pair.first()) && sample.get(&pair.second()))
            .map(|(_, bias)| bias)
            .sum()
    }

    /// Relabels variables densely for a sampler. The returned variables are
    /// the labels in order: label `i` is `variables[i]`.
    pub fn to_sample_request(
        &self,
        offset: f64,
        num_reads: usize,
        label: Option<String>,
        seed: Option<u64>,
    ) -> (SampleRequest, Vec<QuboVariable>) {
        let variables = self.variables().into_iter().collect::<Vec<_>>();
        // Built from the coefficients' own variables, every lookup hits.
        let labels = variables
            .iter()
            .enumerate()
            .map(|(label, &variable)| (variable, label))
            .collect::<FxHashMap<_, _>>();

        let linear = self
            .linear()
            .map(|(variable, bias)| (labels[&variable], bias))
            .collect();
        let quadratic = self
            .quadratic()
            .map(|(a, b, bias)| {
                let (a, b) = (labels[&a], labels[&b]);
                (a.min(b), a.max(b), bias)
            })
            .collect();

        let request = SampleRequest {
            num_variables: variables.len(),
            linear,
            quadratic,
            offset,
            num_reads,
            label,
            seed,
        };

        (request, variables)
    }
}
