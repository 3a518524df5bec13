pub mod component_dto;
pub mod simulation_dto;
