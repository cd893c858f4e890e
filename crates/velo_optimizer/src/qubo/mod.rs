pub mod qubo;
pub mod qubo_builder;
pub mod qubo_variable;
pub mod sample;
