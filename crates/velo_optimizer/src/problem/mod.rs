pub mod location;
pub mod station;
pub mod station_graph;
pub mod travel_cost_matrix;
