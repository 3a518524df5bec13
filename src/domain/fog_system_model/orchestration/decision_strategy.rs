use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};

/// One side of a node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    I,
    J,
}

/// Tentative side per candidate. `None` leaves the candidate where it is.
pub type Assignment = Vec<Option<Side>>;

/// Rebalancing sub-problem for the unordered node pair `(i, j)`.
///
/// All vectors are indexed by candidate position.
#[derive(Debug, Clone, PartialEq)]
pub struct PairProblem {
    pub i: NodeId,
    pub j: NodeId,
    pub candidates: Vec<ClientId>,
    pub sessions: Vec<SessionId>,
    pub blocks_i: Vec<i64>,
    pub blocks_j: Vec<i64>,
    pub current: Vec<Side>,
    /// Spare level plus the block cost of the candidates currently at the node, so that
    /// keeping every candidate in place always fits.
    pub capacity_i: i64,
    pub capacity_j: i64,
}

/// What executing an assignment would do to a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    /// Candidate indices leaving `i` for `j`.
    pub moves_i_to_j: Vec<usize>,
    pub moves_j_to_i: Vec<usize>,
    /// Blocks saved over the candidate set.
    pub weight: i64,
}

impl PairProblem {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn blocks_at(&self, k: usize, side: Side) -> i64 {
        match side {
            Side::I => self.blocks_i[k],
            Side::J => self.blocks_j[k],
        }
    }

    pub fn capacity_of(&self, side: Side) -> i64 {
        match side {
            Side::I => self.capacity_i,
            Side::J => self.capacity_j,
        }
    }

    /// Keeps every candidate on its current node.
    pub fn identity(&self) -> Assignment {
        self.current.iter().map(|side| Some(*side)).collect()
    }

    /// Resolves an assignment against the current placement.
    ///
    /// `None` if the assignment has the wrong length or overloads either node.
    pub fn evaluate(&self, assignment: &Assignment) -> Option<PairOutcome> {
        if assignment.len() != self.len() {
            return None;
        }

        let mut load_i = 0;
        let mut load_j = 0;
        let mut weight = 0;
        let mut moves_i_to_j = Vec::new();
        let mut moves_j_to_i = Vec::new();

        for (k, tentative) in assignment.iter().enumerate() {
            let current = self.current[k];
            let resolved = tentative.unwrap_or(current);

            match resolved {
                Side::I => load_i += self.blocks_i[k],
                Side::J => load_j += self.blocks_j[k],
            }
            weight += self.blocks_at(k, current) - self.blocks_at(k, resolved);

            match (current, resolved) {
                (Side::I, Side::J) => moves_i_to_j.push(k),
                (Side::J, Side::I) => moves_j_to_i.push(k),
                _ => {}
            }
        }

        if load_i > self.capacity_i || load_j > self.capacity_j {
            return None;
        }

        Some(PairOutcome { moves_i_to_j, moves_j_to_i, weight })
    }
}

/// Decides, for one node pair, which side every candidate should end up on.
pub trait DecisionStrategy: std::fmt::Debug {
    fn decide(&mut self, problem: &PairProblem) -> Assignment;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Three candidates: two at `i` (cheap at `j`), one at `j`.
    pub(crate) fn sample_problem() -> PairProblem {
        PairProblem {
            i: NodeId::new(0),
            j: NodeId::new(1),
            candidates: vec![ClientId::new(0), ClientId::new(1), ClientId::new(2)],
            sessions: vec![SessionId::new(0), SessionId::new(1), SessionId::new(2)],
            blocks_i: vec![20, 20, 8],
            blocks_j: vec![5, 6, 4],
            current: vec![Side::I, Side::I, Side::J],
            capacity_i: 50,
            capacity_j: 15,
        }
    }

    #[test]
    fn test_identity_is_feasible_with_zero_weight() {
        let problem = sample_problem();
        let outcome = problem.evaluate(&problem.identity()).unwrap();

        assert_eq!(outcome.weight, 0);
        assert!(outcome.moves_i_to_j.is_empty());
        assert!(outcome.moves_j_to_i.is_empty());
    }

    #[test]
    fn test_unassigned_candidates_stay() {
        let problem = sample_problem();
        let outcome = problem.evaluate(&vec![Some(Side::J), None, None]).unwrap();

        assert_eq!(outcome.moves_i_to_j, vec![0]);
        assert_eq!(outcome.weight, 15);
    }

    #[test]
    fn test_overload_is_infeasible() {
        let problem = sample_problem();
        // all three at j: 5 + 6 + 4 = 15, exactly its capacity
        assert!(problem.evaluate(&vec![Some(Side::J), Some(Side::J), Some(Side::J)]).is_some());

        let mut tight = problem.clone();
        tight.capacity_j = 14;
        assert!(tight.evaluate(&vec![Some(Side::J), Some(Side::J), Some(Side::J)]).is_none());
        assert!(tight.evaluate(&vec![None]).is_none(), "Wrong length must be rejected");
    }
}
