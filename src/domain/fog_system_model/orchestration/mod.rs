pub mod decision_strategy;
pub mod knapsack;
pub mod learned_policy;
pub mod orchestration_module;
pub mod orchestration_scheme;
pub mod pair_matching;
pub mod subgradient_heuristic;
pub mod working_set;
