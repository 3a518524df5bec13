pub mod event;
pub mod simulation_config;
pub mod simulator;
