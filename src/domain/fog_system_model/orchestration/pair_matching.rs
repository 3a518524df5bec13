use std::collections::BTreeSet;

use crate::domain::fog_system_model::utils::id::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedPair {
    pub i: NodeId,
    pub j: NodeId,
    pub weight: i64,
}

/// Greedy maximum-weight matching over node pairs.
///
/// Repeatedly takes the heaviest remaining pair and drops every pair sharing one of its nodes.
/// Pairs with non-positive weight are ignored; equal weights prefer the lower `(i, j)`.
/// Returns indices into `pairs` in selection order.
pub fn greedy_matching(pairs: &[WeightedPair]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pairs.len()).filter(|&idx| pairs[idx].weight > 0).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&pairs[a], &pairs[b]);
        pb.weight.cmp(&pa.weight).then_with(|| (pa.i, pa.j).cmp(&(pb.i, pb.j)))
    });

    let mut used: BTreeSet<NodeId> = BTreeSet::new();
    let mut selected = Vec::new();
    for idx in order {
        let pair = &pairs[idx];
        if used.contains(&pair.i) || used.contains(&pair.j) {
            continue;
        }
        used.insert(pair.i);
        used.insert(pair.j);
        selected.push(idx);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(i: u64, j: u64, weight: i64) -> WeightedPair {
        WeightedPair { i: NodeId::new(i), j: NodeId::new(j), weight }
    }

    #[test]
    fn test_selected_pairs_never_share_a_node() {
        let pairs = vec![pair(0, 1, 10), pair(1, 2, 12), pair(2, 3, 9), pair(0, 3, 4), pair(3, 4, 1)];

        let selected = greedy_matching(&pairs);
        assert_eq!(selected, vec![1, 3], "Heaviest (1,2) first, then (0,3)");

        let mut nodes = BTreeSet::new();
        for idx in &selected {
            assert!(nodes.insert(pairs[*idx].i), "Node {:?} matched twice", pairs[*idx].i);
            assert!(nodes.insert(pairs[*idx].j), "Node {:?} matched twice", pairs[*idx].j);
        }
    }

    #[test]
    fn test_non_positive_weights_are_ignored() {
        let pairs = vec![pair(0, 1, 0), pair(2, 3, -5)];
        assert!(greedy_matching(&pairs).is_empty());
    }

    #[test]
    fn test_ties_prefer_lower_pair() {
        let pairs = vec![pair(1, 2, 7), pair(0, 1, 7)];
        assert_eq!(greedy_matching(&pairs), vec![1]);
    }
}
