pub mod depot;
pub mod planner_params;
pub mod rebalance_plan;
pub mod rebalance_planner;
