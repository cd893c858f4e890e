pub mod bike_count_snapshot;
pub mod station_needs;
pub mod threshold_analyzer;
