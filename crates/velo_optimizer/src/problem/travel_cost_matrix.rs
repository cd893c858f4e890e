use std::sync::Arc;

use crate::problem::{location::Location, station::StationIdx};

pub type Cost = f64;

/// Travel costs between every pair of stations, stored flat:
/// `index = from * num_stations + to`. Unreachable pairs hold `INFINITY`.
#[derive(Debug, Clone)]
pub struct TravelCosts {
    costs: Arc<Vec<Cost>>,
    num_stations: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[Cost], num_stations: usize) -> bool {
    (0..num_stations).all(|i| {
        (0..num_stations).all(|j| matrix[i * num_stations + j] == matrix[j * num_stations + i])
    })
}

impl TravelCosts {
    /// Direct edge weights win. Pairs without an edge fall back to the
    /// shortest path through intermediate stations.
    pub fn from_edges(num_stations: usize, edges: &[(StationIdx, StationIdx, Cost)]) -> Self {
        let mut direct = vec![Cost::INFINITY; num_stations * num_stations];
        for i in 0..num_stations {
            direct[i * num_stations + i] = 0.0;
        }
        for &(from, to, weight) in edges {
            for (a, b) in [(from.get(), to.get()), (to.get(), from.get())] {
                let index = a * num_stations + b;
                direct[index] = direct[index].min(weight);
            }
        }

        // Floyd-Warshall over the flat matrix.
        let mut shortest = direct.clone();
        for k in 0..num_stations {
            for i in 0..num_stations {
                let through_k = shortest[i * num_stations + k];
                if through_k.is_infinite() {
                    continue;
                }
                for j in 0..num_stations {
                    let candidate = through_k + shortest[k * num_stations + j];
                    if candidate < shortest[i * num_stations + j] {
                        shortest[i * num_stations + j] = candidate;
                    }
                }
            }
        }

        let costs = direct
            .iter()
            .zip(shortest)
            .map(|(&direct, shortest)| if direct.is_finite() { direct } else { shortest })
            .collect::<Vec<_>>();

        let is_symmetric = is_flat_matrix_symmetric(&costs, num_stations);

        TravelCosts {
            costs: Arc::new(costs),
            num_stations,
            is_symmetric,
        }
    }

    pub fn from_haversine(locations: &[Location]) -> Self {
        let num_stations = locations.len();
        let mut costs: Vec<Cost> = vec![0.0; num_stations * num_stations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                costs[i * num_stations + j] = from.haversine_distance(to);
            }
        }

        TravelCosts {
            costs: Arc::new(costs),
            num_stations,
            is_symmetric: true,
        }
    }

    #[inline(always)]
    fn index(&self, from: StationIdx, to: StationIdx) -> usize {
        from.get() * self.num_stations + to.get()
    }

    /// `None` when no path connects the two stations.
    #[inline(always)]
    pub fn travel_cost(&self, from: StationIdx, to: StationIdx) -> Option<Cost> {
        if from == to {
            return Some(0.0);
        }

        let cost = self.costs[self.index(from, to)];
        cost.is_finite().then_some(cost)
    }

    /// Largest finite cost in the matrix.
    pub fn max_cost(&self) -> Cost {
        self.costs
            .iter()
            .copied()
            .filter(|cost| cost.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn num_stations(&self) -> usize {
        self.num_stations
    }
}
