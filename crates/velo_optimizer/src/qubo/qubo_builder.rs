use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    problem::{
        station::StationIdx,
        station_graph::{GraphError, StationGraph},
    },
    qubo::{
        qubo::Qubo,
        qubo_variable::{QuboVariable, SlotIdx},
    },
};

#[derive(Debug, Error)]
pub enum QuboError {
    #[error("A tour needs at least 2 stations, got {0}")]
    EmptyGraph(usize),

    #[error("Lagrange multiplier must be positive and finite, got {0}")]
    InvalidLagrange(f64),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Builds the tour QUBO for a station graph.
///
/// Variable `(s, t)` is 1 when station `s` is visited at slot `t`. The
/// objective is the closed tour cost, the one-hot constraints cost
/// `lagrange` per violation and rebalancing tags add a graded linear penalty
/// of `lagrange / n` per slot a supply station sits away from the front or
/// the demand station sits away from the back.
///
/// Returns the QUBO and the offset `2 * n * lagrange`, which brings the
/// energy of any valid tour back to its cost plus rebalancing penalty.
#[instrument(skip(graph), fields(stations = graph.len()))]
pub fn build(graph: &StationGraph, lagrange: f64) -> Result<(Qubo, f64), QuboError> {
    let n = graph.len();
    if n < 2 {
        return Err(QuboError::EmptyGraph(n));
    }
    if !lagrange.is_finite() || lagrange <= 0.0 {
        return Err(QuboError::InvalidLagrange(lagrange));
    }

    let mut qubo = Qubo::default();

    add_one_slot_per_station(&mut qubo, n, lagrange);
    add_one_station_per_slot(&mut qubo, n, lagrange);
    add_tour_cost(&mut qubo, graph)?;
    add_rebalancing_penalties(&mut qubo, graph, lagrange);

    let offset = 2.0 * n as f64 * lagrange;

    debug!(coefficients = qubo.len(), offset, "Built tour QUBO");

    Ok((qubo, offset))
}

// lagrange * ((sum_t x[s, t]) - 1)^2 without the constant term.
fn add_one_slot_per_station(qubo: &mut Qubo, n: usize, lagrange: f64) {
    for station in StationIdx::range(n) {
        for slot in SlotIdx::range(n) {
            qubo.add_linear(QuboVariable::new(station, slot), -lagrange);

            for other_slot in SlotIdx::range(n).skip(slot.get() + 1) {
                qubo.add(
                    QuboVariable::new(station, slot),
                    QuboVariable::new(station, other_slot),
                    2.0 * lagrange,
                );
            }
        }
    }
}

// lagrange * ((sum_s x[s, t]) - 1)^2 without the constant term.
fn add_one_station_per_slot(qubo: &mut Qubo, n: usize, lagrange: f64) {
    for slot in SlotIdx::range(n) {
        for station in StationIdx::range(n) {
            qubo.add_linear(QuboVariable::new(station, slot), -lagrange);

            for other_station in StationIdx::range(n).skip(station.get() + 1) {
                qubo.add(
                    QuboVariable::new(station, slot),
                    QuboVariable::new(other_station, slot),
                    2.0 * lagrange,
                );
            }
        }
    }
}

fn add_tour_cost(qubo: &mut Qubo, graph: &StationGraph) -> Result<(), GraphError> {
    let n = graph.len();

    for u in StationIdx::range(n) {
        for v in StationIdx::range(n).skip(u.get() + 1) {
            let forward = graph.cost(u, v)?;
            let backward = graph.cost(v, u)?;

            for slot in SlotIdx::range(n) {
                let next = SlotIdx::new((slot.get() + 1) % n);

                qubo.add(
                    QuboVariable::new(u, slot),
                    QuboVariable::new(v, next),
                    forward,
                );
                qubo.add(
                    QuboVariable::new(v, slot),
                    QuboVariable::new(u, next),
                    backward,
                );
            }
        }
    }

    Ok(())
}

fn add_rebalancing_penalties(qubo: &mut Qubo, graph: &StationGraph, lagrange: f64) {
    let n = graph.len();
    let step = lagrange / n as f64;

    for station in graph.supply_stations() {
        for slot in SlotIdx::range(n).skip(1) {
            qubo.add_linear(
                QuboVariable::new(station, slot),
                step * slot.get() as f64,
            );
        }
    }

    for station in graph.demand_stations() {
        for slot in SlotIdx::range(n - 1) {
            qubo.add_linear(
                QuboVariable::new(station, slot),
                step * (n - 1 - slot.get()) as f64,
            );
        }
    }
}
