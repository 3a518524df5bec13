pub mod fog_system_model;
pub mod simulator;
