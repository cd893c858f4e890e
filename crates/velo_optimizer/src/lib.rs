pub mod error;
pub mod json;
pub mod planner;
pub mod problem;
pub mod qubo;
pub mod route;
pub mod solver;
pub mod threshold;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
