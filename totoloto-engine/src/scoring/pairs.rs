use super::{Heuristic, HeuristicInput, ScoreMap};
use crate::config::ComboPolicy;
use crate::cooccurrence::{CountTable, Pair};

/// Les `limit` paires les plus fréquentes ; chaque membre de la paire de rang `k`
/// reçoit `base - k * step`, ce qui peut être négatif.
pub fn score_pairs(pairs: &CountTable<Pair>, policy: ComboPolicy, clamp_negative: bool) -> ScoreMap {
    let mut map = ScoreMap::new();
    for (rank, ((a, b), _count)) in pairs.top(policy.limit).into_iter().enumerate() {
        let points = combo_points(policy, rank, clamp_negative);
        map.add(a, points);
        map.add(b, points);
    }
    map
}

pub(crate) fn combo_points(policy: ComboPolicy, rank: usize, clamp_negative: bool) -> f64 {
    let points = policy.base - rank as f64 * policy.step;
    if clamp_negative { points.max(0.0) } else { points }
}

pub struct PairHeuristic {
    policy: ComboPolicy,
    clamp_negative: bool,
}

impl PairHeuristic {
    pub fn new(policy: ComboPolicy, clamp_negative: bool) -> Self {
        Self {
            policy,
            clamp_negative,
        }
    }
}

impl Heuristic for PairHeuristic {
    fn name(&self) -> &str {
        "pares_frequentes"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_pairs(input.cooccurrence.pairs(), self.policy, self.clamp_negative)
    }
}
