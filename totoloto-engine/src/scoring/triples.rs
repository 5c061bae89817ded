use super::pairs::combo_points;
use super::{Heuristic, HeuristicInput, ScoreMap};
use crate::config::ComboPolicy;
use crate::cooccurrence::{CountTable, Triple};

/// Même principe que les paires : les trois membres du trio de rang `k`
/// reçoivent `base - k * step`.
pub fn score_triples(triples: &CountTable<Triple>, policy: ComboPolicy, clamp_negative: bool) -> ScoreMap {
    let mut map = ScoreMap::new();
    for (rank, ((a, b, c), _count)) in triples.top(policy.limit).into_iter().enumerate() {
        let points = combo_points(policy, rank, clamp_negative);
        map.add(a, points);
        map.add(b, points);
        map.add(c, points);
    }
    map
}

pub struct TripleHeuristic {
    policy: ComboPolicy,
    clamp_negative: bool,
}

impl TripleHeuristic {
    pub fn new(policy: ComboPolicy, clamp_negative: bool) -> Self {
        Self {
            policy,
            clamp_negative,
        }
    }
}

impl Heuristic for TripleHeuristic {
    fn name(&self) -> &str {
        "trios_frequentes"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_triples(input.cooccurrence.triples(), self.policy, self.clamp_negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::cooccurrence::CoOccurrence;
    use crate::test_support::sequence;

    #[test]
    fn test_triple_ranks() {
        let co = CoOccurrence::from_draws(&sequence(&[&[4, 5, 6], &[1, 2, 3], &[4, 5, 6]]));
        let map = score_triples(co.triples(), EngineConfig::default().triples, false);
        assert_eq!(map.get(4), Some(20.0));
        assert_eq!(map.get(6), Some(20.0));
        assert_eq!(map.get(1), Some(18.0));
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_top_ten_only() {
        // 6 numéros : 20 trios, seuls les 10 premiers comptent.
        let co = CoOccurrence::from_draws(&sequence(&[&[1, 2, 3, 4, 5, 6]]));
        let map = score_triples(co.triples(), EngineConfig::default().triples, false);
        // Les 10 premiers trios contiennent tous 1 : 20 + 18 + ... + 2.
        assert_eq!(map.get(1), Some(110.0));
        // Rangs 3, 6, 8 et 9 : (1,2,6), (1,3,6), (1,4,6), (1,5,6).
        assert_eq!(map.get(6), Some(14.0 + 8.0 + 4.0 + 2.0));
    }

    #[test]
    fn test_empty_table() {
        let co = CoOccurrence::new();
        assert!(score_triples(co.triples(), EngineConfig::default().triples, false).is_empty());
    }
}
