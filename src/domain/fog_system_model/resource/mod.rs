pub mod channel;
pub mod fog_node;
pub mod resource_container;
pub mod session_process;
