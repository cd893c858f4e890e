use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    problem::station::StationIdx,
    qubo::{qubo_variable::SlotIdx, sample::Sample},
    route::route::Route,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Sample leaves slots {missing_slots:?} without a station")]
    IncompleteRoute { missing_slots: Vec<SlotIdx> },

    #[error("Stations {first} and {second} are both assigned to slot {slot}")]
    SlotConflict {
        slot: SlotIdx,
        first: StationIdx,
        second: StationIdx,
    },

    #[error("Station {0} is assigned to more than one slot")]
    DuplicateStation(StationIdx),

    #[error("Station {0} does not exist in a depot of this size")]
    UnknownStation(StationIdx),
}

/// What to do when a sample puts several stations in the same slot.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotConflictPolicy {
    /// Refuse the sample.
    #[default]
    Reject,
    /// Keep the station that comes last in variable order.
    LastWriterWins,
}

/// Turns a sampler's assignment back into a visiting order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteDecoder {
    policy: SlotConflictPolicy,
}

impl RouteDecoder {
    pub fn new(policy: SlotConflictPolicy) -> Self {
        RouteDecoder { policy }
    }

    pub fn policy(&self) -> SlotConflictPolicy {
        self.policy
    }

    /// Reads the active `(station, slot)` variables of `sample` into a route
    /// over `num_stations` stations.
    ///
    /// Variables for slots past `num_stations` are ignored. Every slot must
    /// end up with exactly one station and no station may appear twice.
    /// When `start` is given the cycle is rotated so it begins there; a
    /// start outside the depot is an [`DecodeError::UnknownStation`].
    pub fn decode(
        &self,
        sample: &Sample,
        num_stations: usize,
        start: Option<StationIdx>,
    ) -> Result<Route, DecodeError> {
        if let Some(start) = start.filter(|start| start.get() >= num_stations) {
            return Err(DecodeError::UnknownStation(start));
        }

        let mut slots: Vec<Option<StationIdx>> = vec![None; num_stations];

        for variable in sample.active() {
            if variable.slot.get() >= num_stations {
                continue;
            }
            if variable.station.get() >= num_stations {
                return Err(DecodeError::UnknownStation(variable.station));
            }

            match slots[variable.slot] {
                Some(first) if self.policy == SlotConflictPolicy::Reject => {
                    return Err(DecodeError::SlotConflict {
                        slot: variable.slot,
                        first,
                        second: variable.station,
                    });
                }
                Some(first) => {
                    warn!(
                        slot = %variable.slot,
                        dropped = %first,
                        kept = %variable.station,
                        "Slot assigned twice"
                    );
                    slots[variable.slot] = Some(variable.station);
                }
                None => slots[variable.slot] = Some(variable.station),
            }
        }

        let missing_slots: Vec<SlotIdx> = SlotIdx::range(num_stations)
            .filter(|&slot| slots[slot].is_none())
            .collect();
        if !missing_slots.is_empty() {
            return Err(DecodeError::IncompleteRoute { missing_slots });
        }

        let mut seen = vec![false; num_stations];
        let mut stations = Vec::with_capacity(num_stations);
        for station in slots.into_iter().flatten() {
            if std::mem::replace(&mut seen[station.get()], true) {
                return Err(DecodeError::DuplicateStation(station));
            }
            stations.push(station);
        }

        let mut route = Route::new(stations);
        if let Some(start) = start {
            route.rotate_to_start(start);
        }

        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use crate::qubo::qubo_variable::QuboVariable;

    use super::*;

    fn tour(stations: &[usize]) -> Vec<StationIdx> {
        stations.iter().copied().map(StationIdx::new).collect()
    }

    fn sample(active: &[(usize, usize)]) -> Sample {
        active
            .iter()
            .map(|&(station, slot)| (QuboVariable::from_indices(station, slot), true))
            .collect()
    }

    #[test]
    fn test_decode_permutation() {
        let sample = Sample::from_tour(&tour(&[2, 1, 0, 3]));
        let route = RouteDecoder::default().decode(&sample, 4, None).unwrap();

        assert_eq!(route.stations(), tour(&[2, 1, 0, 3]).as_slice());
    }

    #[test]
    fn test_zero_values_are_ignored() {
        let mut sample = Sample::from_tour(&tour(&[1, 0]));
        sample.set(QuboVariable::from_indices(0, 0), false);
        sample.set(QuboVariable::from_indices(0, 1), true);

        let route = RouteDecoder::default().decode(&sample, 2, None).unwrap();
        assert_eq!(route.stations(), tour(&[1, 0]).as_slice());
    }

    #[test]
    fn test_incomplete_route() {
        let sample = sample(&[(0, 0), (1, 2)]);

        assert_eq!(
            RouteDecoder::default().decode(&sample, 3, None),
            Err(DecodeError::IncompleteRoute {
                missing_slots: vec![SlotIdx::new(1)]
            })
        );
    }

    #[test]
    fn test_slot_conflict_rejected() {
        let sample = sample(&[(0, 0), (1, 0), (2, 1)]);

        assert_eq!(
            RouteDecoder::default().decode(&sample, 2, None),
            Err(DecodeError::SlotConflict {
                slot: SlotIdx::new(0),
                first: StationIdx::new(0),
                second: StationIdx::new(1),
            })
        );
    }

    #[test]
    fn test_slot_conflict_last_writer_wins() {
        let sample = sample(&[(0, 1), (1, 0), (2, 0), (0, 2)]);
        let decoder = RouteDecoder::new(SlotConflictPolicy::LastWriterWins);

        // Station 2 overwrites station 1 in slot 0, but station 0 is then in
        // two slots.
        assert_eq!(
            decoder.decode(&sample, 3, None),
            Err(DecodeError::DuplicateStation(StationIdx::new(0)))
        );

        let sample = self::sample(&[(0, 1), (1, 0), (2, 0), (1, 2)]);
        let route = decoder.decode(&sample, 3, None).unwrap();
        assert_eq!(route.stations(), tour(&[2, 0, 1]).as_slice());
    }

    #[test]
    fn test_duplicate_station() {
        let sample = sample(&[(0, 0), (0, 1)]);

        assert_eq!(
            RouteDecoder::default().decode(&sample, 2, None),
            Err(DecodeError::DuplicateStation(StationIdx::new(0)))
        );
    }

    #[test]
    fn test_unknown_station() {
        let sample = sample(&[(0, 0), (5, 1)]);

        assert_eq!(
            RouteDecoder::default().decode(&sample, 2, None),
            Err(DecodeError::UnknownStation(StationIdx::new(5)))
        );
    }

    #[test]
    fn test_slots_past_the_end_are_ignored() {
        let sample = sample(&[(1, 0), (0, 1), (0, 4)]);
        let route = RouteDecoder::default().decode(&sample, 2, None).unwrap();

        assert_eq!(route.stations(), tour(&[1, 0]).as_slice());
    }

    #[test]
    fn test_rotation_to_start() {
        let sample = Sample::from_tour(&tour(&[2, 1, 0, 3]));
        let decoder = RouteDecoder::default();

        let route = decoder
            .decode(&sample, 4, Some(StationIdx::new(0)))
            .unwrap();
        assert_eq!(route.stations(), tour(&[0, 3, 2, 1]).as_slice());

        let rotated = Sample::from_tour(route.stations());
        let again = decoder
            .decode(&rotated, 4, Some(StationIdx::new(0)))
            .unwrap();
        assert_eq!(again, route);
    }

    #[test]
    fn test_unknown_start() {
        let sample = Sample::from_tour(&tour(&[1, 0]));

        assert_eq!(
            RouteDecoder::default().decode(&sample, 2, Some(StationIdx::new(2))),
            Err(DecodeError::UnknownStation(StationIdx::new(2)))
        );
    }
}
