/// Exact 0/1 knapsack by dynamic programming over integer weights.
///
/// Returns the selection mask maximising the summed value with summed weight at most
/// `capacity`. Items with non-positive value or negative weight are never selected, and a
/// negative capacity selects nothing.
pub fn solve(weights: &[i64], values: &[f64], capacity: i64) -> Vec<bool> {
    let n = weights.len().min(values.len());
    let mut selected = vec![false; weights.len()];
    if capacity < 0 || n == 0 {
        return selected;
    }

    let usable = |k: usize| weights[k] >= 0 && values[k] > 0.0;
    let total: i64 = (0..n).filter(|&k| usable(k)).map(|k| weights[k]).sum();
    let cap = capacity.min(total) as usize;

    let mut best = vec![0.0_f64; cap + 1];
    let mut take = vec![vec![false; cap + 1]; n];

    for k in (0..n).filter(|&k| usable(k)) {
        let w = weights[k] as usize;
        if w > cap {
            continue;
        }
        for c in (w..=cap).rev() {
            let with_item = best[c - w] + values[k];
            if with_item > best[c] {
                best[c] = with_item;
                take[k][c] = true;
            }
        }
    }

    let mut c = cap;
    for k in (0..n).rev() {
        if take[k][c] {
            selected[k] = true;
            c -= weights[k] as usize;
        }
    }

    selected
}
