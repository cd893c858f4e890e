use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    problem::{location::Location, station_graph::GraphError},
};

define_index_newtype!(StationIdx, Station);

/// External station identifier, either numeric or a name.
#[derive(
    Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(untagged)]
pub enum StationId {
    Number(i64),
    Name(String),
}

impl Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationId::Number(number) => write!(f, "{number}"),
            StationId::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<i64> for StationId {
    fn from(value: i64) -> Self {
        StationId::Number(value)
    }
}

impl From<&str> for StationId {
    fn from(value: &str) -> Self {
        StationId::Name(value.to_owned())
    }
}

impl From<String> for StationId {
    fn from(value: String) -> Self {
        StationId::Name(value)
    }
}

/// Rebalancing role of a station. Supply stations hand bikes to the vehicle,
/// demand stations receive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationTag {
    #[default]
    Neutral,
    Supply(u32),
    Demand(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: StationId,
    tag: StationTag,
    location: Option<Location>,
}

impl Station {
    pub fn id(&self) -> &StationId {
        &self.id
    }

    pub fn tag(&self) -> StationTag {
        self.tag
    }

    pub fn supply(&self) -> Option<u32> {
        match self.tag {
            StationTag::Supply(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn demand(&self) -> Option<u32> {
        match self.tag {
            StationTag::Demand(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn is_supply(&self) -> bool {
        matches!(self.tag, StationTag::Supply(_))
    }

    pub fn is_demand(&self) -> bool {
        matches!(self.tag, StationTag::Demand(_))
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub(crate) fn with_tag(&self, tag: StationTag) -> Self {
        Station {
            tag,
            ..self.clone()
        }
    }
}

#[derive(Default)]
pub struct StationBuilder {
    id: Option<StationId>,
    supply: Option<u32>,
    demand: Option<u32>,
    location: Option<Location>,
}

impl StationBuilder {
    pub fn set_id(&mut self, id: impl Into<StationId>) -> &mut StationBuilder {
        self.id = Some(id.into());
        self
    }

    pub fn set_supply(&mut self, supply: u32) -> &mut StationBuilder {
        self.supply = Some(supply);
        self
    }

    pub fn set_demand(&mut self, demand: u32) -> &mut StationBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_location(&mut self, location: Location) -> &mut StationBuilder {
        self.location = Some(location);
        self
    }

    pub fn build(self) -> Result<Station, GraphError> {
        let id = self.id.ok_or(GraphError::MissingStationId)?;

        let tag = match (self.supply, self.demand) {
            (Some(_), Some(_)) => return Err(GraphError::InvalidStationTag(id)),
            (Some(supply), None) => StationTag::Supply(supply),
            (None, Some(demand)) => StationTag::Demand(demand),
            (None, None) => StationTag::Neutral,
        };

        Ok(Station {
            id,
            tag,
            location: self.location,
        })
    }
}
