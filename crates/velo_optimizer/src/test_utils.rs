use crate::problem::{
    station::{Station, StationBuilder, StationId, StationTag},
    station_graph::{Edge, StationGraph},
};

pub fn create_stations(ids: &[i64]) -> Vec<Station> {
    ids.iter()
        .map(|&id| create_station(id, StationTag::Neutral))
        .collect()
}

fn create_station(id: i64, tag: StationTag) -> Station {
    let mut builder = StationBuilder::default();
    builder.set_id(StationId::Number(id));

    match tag {
        StationTag::Supply(supply) => {
            builder.set_supply(supply);
        }
        StationTag::Demand(demand) => {
            builder.set_demand(demand);
        }
        StationTag::Neutral => {}
    }

    builder.build().unwrap()
}

/// Four stations where 1 and 2 hold surplus bikes and 3 is short. There is
/// no direct edge between 0 and 3, the cheapest path goes through 2.
pub fn create_reference_graph() -> StationGraph {
    create_tagged_graph([
        StationTag::Neutral,
        StationTag::Supply(10),
        StationTag::Supply(5),
        StationTag::Demand(15),
    ])
}

/// The reference edges with station `i` tagged `tags[i]`.
pub fn create_tagged_graph(tags: [StationTag; 4]) -> StationGraph {
    let stations = tags
        .into_iter()
        .zip(0..)
        .map(|(tag, id)| create_station(id, tag))
        .collect();

    let edges = [(0, 1, 5.0), (0, 2, 4.0), (1, 2, 3.0), (1, 3, 12.0), (2, 3, 4.0)]
        .into_iter()
        .map(|(from, to, weight)| Edge::new(StationId::Number(from), StationId::Number(to), weight))
        .collect();

    StationGraph::new(stations, edges).unwrap()
}
