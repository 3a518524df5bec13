use std::time::Instant;

use serde::Serialize;

use crate::domain::fog_system_model::fog_network::{FogNetwork, MigrationOutcome};
use crate::domain::fog_system_model::orchestration::decision_strategy::{DecisionStrategy, PairOutcome, PairProblem};
use crate::domain::fog_system_model::orchestration::pair_matching::{WeightedPair, greedy_matching};
use crate::domain::fog_system_model::orchestration::working_set::WorkingSet;
use crate::domain::fog_system_model::utils::id::{NodeId, SessionId};
use crate::domain::fog_system_model::utils::statistics::ANALYTICS_TARGET;
use crate::error::Result;

/// Summary of one orchestration step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    pub pairs_evaluated: usize,
    pub pairs_selected: usize,
    pub migrations: usize,
    pub migrations_skipped: usize,
    /// Blocks the selected pairs were expected to save.
    pub expected_savings: i64,
    pub execution_time_ms: f64,
}

/// Periodic global rebalancing of sessions across node pairs.
#[derive(Debug)]
pub struct OrchestrationModule {
    strategy: Box<dyn DecisionStrategy>,
    cycles: u64,
}

impl OrchestrationModule {
    pub fn new(strategy: Box<dyn DecisionStrategy>) -> Self {
        Self { strategy, cycles: 0 }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Evaluates every node pair, matches the profitable ones and migrates their sessions.
    /// Runs to completion without yielding to the engine.
    pub fn run_cycle(&mut self, network: &mut FogNetwork, now: i64) -> Result<CycleReport> {
        let started = Instant::now();
        self.cycles += 1;

        let working_set = WorkingSet::build(network)?;
        let problems = working_set.pair_problems();

        let mut evaluated: Vec<(PairProblem, PairOutcome)> = Vec::with_capacity(problems.len());
        for problem in problems {
            let assignment = self.strategy.decide(&problem);
            match problem.evaluate(&assignment) {
                Some(outcome) => evaluated.push((problem, outcome)),
                None => log::debug!("Strategy returned an infeasible assignment for {:?}/{:?}, pair ignored", problem.i, problem.j),
            }
        }

        let weighted: Vec<WeightedPair> = evaluated.iter().map(|(p, o)| WeightedPair { i: p.i, j: p.j, weight: o.weight }).collect();
        let selected = greedy_matching(&weighted);

        let mut report = CycleReport { pairs_evaluated: evaluated.len(), pairs_selected: selected.len(), ..CycleReport::default() };

        for idx in selected {
            let (problem, outcome) = &evaluated[idx];
            report.expected_savings += outcome.weight;

            for (session, target) in ordered_moves(network, problem, outcome)? {
                match network.migrate_if_saving(session, target)? {
                    MigrationOutcome::Migrated { .. } => report.migrations += 1,
                    _ => report.migrations_skipped += 1,
                }
            }
        }

        report.execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            target: ANALYTICS_TARGET,
            Time = now,
            LogDescription = "Orchestration cycle finished",
            Cycle = self.cycles,
            PairsEvaluated = report.pairs_evaluated,
            PairsSelected = report.pairs_selected,
            Migrations = report.migrations,
            MigrationsSkipped = report.migrations_skipped,
            ExpectedSavings = report.expected_savings,
            ProcessingTime = report.execution_time_ms,
        );

        Ok(report)
    }
}

/// Moves of one pair, with the sessions leaving the fuller node first so that a swap frees the
/// blocks its reverse direction needs.
fn ordered_moves(network: &FogNetwork, problem: &PairProblem, outcome: &PairOutcome) -> Result<Vec<(SessionId, NodeId)>> {
    let to_j = outcome.moves_i_to_j.iter().map(|&k| (problem.sessions[k], problem.j));
    let to_i = outcome.moves_j_to_i.iter().map(|&k| (problem.sessions[k], problem.i));

    let moves = if network.node(problem.j)?.level() < network.node(problem.i)?.level() {
        to_i.chain(to_j).collect()
    } else {
        to_j.chain(to_i).collect()
    };
    Ok(moves)
}
