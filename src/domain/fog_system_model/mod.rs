pub mod allocation;
pub mod client;
pub mod fog_network;
pub mod mobility;
pub mod orchestration;
pub mod resource;
pub mod topology;
pub mod utils;
