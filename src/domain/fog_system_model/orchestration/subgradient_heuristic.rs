use serde::{Deserialize, Serialize};

use crate::domain::fog_system_model::orchestration::decision_strategy::{Assignment, DecisionStrategy, PairProblem, Side};
use crate::domain::fog_system_model::orchestration::knapsack;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicParams {
    pub step_size: f64,
    pub eps: f64,
    /// Hard ceiling on subgradient iterations per pair.
    pub max_iterations: usize,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self { step_size: 0.1, eps: 0.1, max_iterations: 10_000 }
    }
}

/// Lagrangian relaxation of the pair problem solved by subgradient ascent on one dual price
/// per candidate. Each iteration solves a knapsack at `i`, then one at `j` seeded with the
/// savings of the clients the first one took. The best feasible assignment seen is returned,
/// starting from the identity.
#[derive(Debug, Clone, Default)]
pub struct SubgradientHeuristic {
    params: HeuristicParams,
    last_iterations: usize,
}

impl SubgradientHeuristic {
    pub fn new(params: HeuristicParams) -> Self {
        Self { params, last_iterations: 0 }
    }

    pub fn params(&self) -> &HeuristicParams {
        &self.params
    }

    /// Subgradient iterations spent on the most recent pair.
    pub fn iterations(&self) -> usize {
        self.last_iterations
    }

    /// Iterations a gradient norm may repeat unchanged before giving up. Prices start at
    /// zero, so they need about `max_blocks / step_size` steps to reach the largest block cost.
    fn patience(&self, problem: &PairProblem) -> usize {
        let max_blocks = problem.blocks_i.iter().chain(&problem.blocks_j).copied().max().unwrap_or(0).max(1);
        let step = if self.params.step_size > 0.0 { self.params.step_size } else { HeuristicParams::default().step_size };
        (max_blocks as f64 / step).ceil() as usize + 1
    }
}

impl DecisionStrategy for SubgradientHeuristic {
    fn decide(&mut self, problem: &PairProblem) -> Assignment {
        let n = problem.len();
        let mut best = problem.identity();
        self.last_iterations = 0;
        if n == 0 {
            return best;
        }
        let mut best_weight = 0;

        let patience = self.patience(problem);
        let threshold = self.params.eps * (n as f64).sqrt();
        let mut prices = vec![0.0_f64; n];
        let mut last_norm_sq: Option<i64> = None;
        let mut repeats = 0;

        for iteration in 0..self.params.max_iterations {
            self.last_iterations = iteration + 1;
            let values_i: Vec<f64> = (0..n).map(|k| prices[k] - problem.blocks_i[k] as f64).collect();
            let at_i = knapsack::solve(&problem.blocks_i, &values_i, problem.capacity_i);

            let values_j: Vec<f64> = (0..n)
                .map(|k| {
                    if at_i[k] {
                        (problem.blocks_i[k] - problem.blocks_j[k]) as f64
                    } else {
                        prices[k] - problem.blocks_j[k] as f64
                    }
                })
                .collect();
            let at_j = knapsack::solve(&problem.blocks_j, &values_j, problem.capacity_j);

            let assignment: Assignment = (0..n)
                .map(|k| match (at_i[k], at_j[k]) {
                    (_, true) => Some(Side::J),
                    (true, false) => Some(Side::I),
                    (false, false) => None,
                })
                .collect();

            if let Some(outcome) = problem.evaluate(&assignment) {
                if outcome.weight > best_weight {
                    best_weight = outcome.weight;
                    best = assignment;
                }
            }

            let gradient: Vec<i64> = (0..n).map(|k| 1 + at_i[k] as i64 + at_j[k] as i64).collect();
            for (price, g) in prices.iter_mut().zip(&gradient) {
                *price += self.params.step_size * *g as f64;
            }

            let norm_sq: i64 = gradient.iter().map(|g| g * g).sum();
            if (norm_sq as f64).sqrt() < threshold {
                log::trace!("Pair {:?}/{:?} converged after {} iterations", problem.i, problem.j, iteration + 1);
                break;
            }
            if last_norm_sq == Some(norm_sq) {
                repeats += 1;
                if repeats >= patience {
                    log::trace!("Pair {:?}/{:?} stalled after {} iterations", problem.i, problem.j, iteration + 1);
                    break;
                }
            } else {
                last_norm_sq = Some(norm_sq);
                repeats = 0;
            }
        }

        best
    }
}
