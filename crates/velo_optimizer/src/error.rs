use serde::Serialize;
use thiserror::Error;

use crate::{
    problem::station_graph::GraphError,
    qubo::qubo_builder::QuboError,
    route::route_decoder::DecodeError,
    solver::qubo_solver::SolverError,
    threshold::threshold_analyzer::ThresholdError,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller supplied data breaks a precondition. Retrying won't help.
    Input,
    /// A travel cost or the sampler is missing.
    Dependency,
    /// The sampler's answer is not a valid tour.
    Consistency,
}

#[derive(Debug, Error)]
pub enum RebalanceError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error(transparent)]
    Qubo(#[from] QuboError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

fn graph_error_kind(error: &GraphError) -> ErrorKind {
    match error {
        GraphError::MissingEdge { .. } => ErrorKind::Dependency,
        _ => ErrorKind::Input,
    }
}

impl RebalanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RebalanceError::Graph(error) | RebalanceError::Qubo(QuboError::Graph(error)) => {
                graph_error_kind(error)
            }
            RebalanceError::Threshold(_) | RebalanceError::Qubo(_) => ErrorKind::Input,
            RebalanceError::Solver(SolverError::MalformedSample { .. }) => ErrorKind::Consistency,
            RebalanceError::Solver(_) => ErrorKind::Dependency,
            RebalanceError::Decode(_) => ErrorKind::Consistency,
        }
    }
}
