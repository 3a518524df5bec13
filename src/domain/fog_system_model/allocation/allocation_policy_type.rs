use std::str::FromStr;

use crate::domain::fog_system_model::allocation::allocation_policy::{AllocationPolicy, CapacityAware, ContentAware, SignalAware};
use crate::error::ConversionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationPolicyType {
    SignalAware,
    CapacityAware,
    ContentAware,
}

impl FromStr for AllocationPolicyType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signal_aware" => Ok(AllocationPolicyType::SignalAware),
            "capacity_aware" => Ok(AllocationPolicyType::CapacityAware),
            "content_aware" => Ok(AllocationPolicyType::ContentAware),
            _ => Err(ConversionError::UnknownAllocationPolicy(s.to_string())),
        }
    }
}

impl AllocationPolicyType {
    pub fn get_instance(&self) -> Box<dyn AllocationPolicy> {
        match self {
            AllocationPolicyType::SignalAware => Box::new(SignalAware),
            AllocationPolicyType::CapacityAware => Box::new(CapacityAware),
            AllocationPolicyType::ContentAware => Box::new(ContentAware),
        }
    }
}
