pub mod simulation_dto;
