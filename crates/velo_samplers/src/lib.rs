pub mod cancellation;
pub mod error;
pub mod exhaustive;
pub mod remote_api;
pub mod sample_request;
pub mod sample_set;
pub mod sampler;
pub mod sampler_client;
pub mod sampler_provider;
pub mod simulated_annealing;
