pub mod allocation_policy;
pub mod allocation_policy_type;
