pub mod qubo_solver;
pub mod solver_params;
