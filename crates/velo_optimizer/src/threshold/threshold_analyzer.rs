use thiserror::Error;
use tracing::{debug, info};

use crate::{
    problem::station::StationId,
    threshold::{bike_count_snapshot::BikeCountSnapshot, station_needs::StationNeeds},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("Cannot analyze a fleet without stations")]
    EmptyFleet,

    #[error("Floor {floor} is above ceiling {ceiling}")]
    InvalidThresholds { floor: u32, ceiling: u32 },
}

/// Operating bounds for a station's bike count, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    floor: u32,
    ceiling: u32,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy {
            floor: 3,
            ceiling: 17,
        }
    }
}

impl ThresholdPolicy {
    pub fn new(floor: u32, ceiling: u32) -> Result<Self, ThresholdError> {
        if floor > ceiling {
            return Err(ThresholdError::InvalidThresholds { floor, ceiling });
        }

        Ok(ThresholdPolicy { floor, ceiling })
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn is_violated(&self, count: u32) -> bool {
        count < self.floor || count > self.ceiling
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdReport {
    pub violated: bool,
    pub needs: StationNeeds,
    pub violations: Vec<StationId>,
    /// Fleet-wide target count, only computed when a threshold is broken.
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdAnalyzer {
    policy: ThresholdPolicy,
}

impl ThresholdAnalyzer {
    pub fn new(policy: ThresholdPolicy) -> Self {
        ThresholdAnalyzer { policy }
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// When any station is out of bounds every station, including the ones
    /// within bounds, gets `target - count` where the target is the fleet
    /// average rounded down. Otherwise the needs are empty and no dispatch
    /// should be planned.
    pub fn analyze(&self, snapshot: &BikeCountSnapshot) -> Result<ThresholdReport, ThresholdError> {
        if snapshot.is_empty() {
            return Err(ThresholdError::EmptyFleet);
        }

        let violations = snapshot
            .iter()
            .filter(|(_, count)| self.policy.is_violated(*count))
            .map(|(station, _)| station.clone())
            .collect::<Vec<_>>();

        if violations.is_empty() {
            debug!(
                stations = snapshot.len(),
                "All stations within thresholds"
            );
            return Ok(ThresholdReport {
                violated: false,
                needs: StationNeeds::default(),
                violations,
                target: None,
            });
        }

        // The average can't exceed the largest u32 count.
        let target = (snapshot.total_bikes() / snapshot.len() as u64) as u32;

        let needs = snapshot
            .iter()
            .map(|(station, count)| (station.clone(), i64::from(target) - i64::from(count)))
            .collect::<StationNeeds>();

        info!(
            violations = violations.len(),
            target_count = target,
            surplus = needs.total_surplus(),
            deficit = needs.total_deficit(),
            "Station thresholds broken"
        );

        Ok(ThresholdReport {
            violated: true,
            needs,
            violations,
            target: Some(target),
        })
    }
}
