pub mod mobility_model;
pub mod random_walk;
pub mod trace_mobility;
