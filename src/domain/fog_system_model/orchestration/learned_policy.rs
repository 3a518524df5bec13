use crate::domain::fog_system_model::orchestration::decision_strategy::{Assignment, DecisionStrategy, PairProblem, Side};

/// What a learned policy sees about one candidate of a node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationObservation {
    pub current: Side,
    pub blocks_i: i64,
    pub blocks_j: i64,
    pub remaining_i: i64,
    pub remaining_j: i64,
}

/// Per-candidate action of an externally trained policy.
pub trait MigrationPolicy: std::fmt::Debug {
    fn act(&mut self, observation: &MigrationObservation) -> Side;
}

/// Runs a [`MigrationPolicy`] over the candidates of a pair in order. An action that does not
/// fit the chosen node's remaining capacity keeps the candidate where it is.
#[derive(Debug)]
pub struct PolicyDecision<P: MigrationPolicy> {
    policy: P,
}

impl<P: MigrationPolicy> PolicyDecision<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P: MigrationPolicy> DecisionStrategy for PolicyDecision<P> {
    fn decide(&mut self, problem: &PairProblem) -> Assignment {
        let mut remaining_i = problem.capacity_i;
        let mut remaining_j = problem.capacity_j;
        let mut assignment = Vec::with_capacity(problem.len());

        for k in 0..problem.len() {
            let observation = MigrationObservation {
                current: problem.current[k],
                blocks_i: problem.blocks_i[k],
                blocks_j: problem.blocks_j[k],
                remaining_i,
                remaining_j,
            };

            let wanted = self.policy.act(&observation);
            let remaining = match wanted {
                Side::I => remaining_i,
                Side::J => remaining_j,
            };
            let side = if problem.blocks_at(k, wanted) <= remaining { wanted } else { problem.current[k] };

            match side {
                Side::I => remaining_i -= problem.blocks_i[k],
                Side::J => remaining_j -= problem.blocks_j[k],
            }
            assignment.push(Some(side));
        }

        assignment
    }
}

/// Picks whichever node needs fewer blocks, staying put on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestSide;

impl MigrationPolicy for CheapestSide {
    fn act(&mut self, observation: &MigrationObservation) -> Side {
        if observation.blocks_i < observation.blocks_j {
            Side::I
        } else if observation.blocks_j < observation.blocks_i {
            Side::J
        } else {
            observation.current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fog_system_model::orchestration::decision_strategy::tests::sample_problem;

    #[derive(Debug, Default)]
    struct AlwaysJ {
        seen: Vec<MigrationObservation>,
    }

    impl MigrationPolicy for AlwaysJ {
        fn act(&mut self, observation: &MigrationObservation) -> Side {
            self.seen.push(*observation);
            Side::J
        }
    }

    #[test]
    fn test_capacity_check_overrides_policy() {
        let mut problem = sample_problem();
        problem.capacity_j = 10;
        let mut decision = PolicyDecision::new(AlwaysJ::default());

        let assignment = decision.decide(&problem);

        // 5 fits, 6 would exceed the remaining 5 so the second candidate stays at i
        assert_eq!(assignment, vec![Some(Side::J), Some(Side::I), Some(Side::J)]);
        assert_eq!(decision.policy().seen[1].remaining_j, 5);
        assert_eq!(decision.policy().seen[2].remaining_j, 5);
    }

    #[test]
    fn test_cheapest_side_matches_best_saving() {
        let problem = sample_problem();
        let assignment = PolicyDecision::new(CheapestSide).decide(&problem);

        let outcome = problem.evaluate(&assignment).unwrap();
        assert_eq!(outcome.weight, 29);
    }
}
