use super::{award_ranked, Heuristic, HeuristicInput, ScoreMap};
use crate::config::GapPolicy;
use crate::stats::StatsTable;

/// Numéros dont l'écart moyen est le plus proche de la cible.
/// Les numéros sans écart moyen défini sont ignorés.
pub fn score_average_gap(stats: &StatsTable, policy: GapPolicy) -> ScoreMap {
    let mut candidates: Vec<(u8, f64)> = stats
        .iter()
        .filter_map(|s| s.average_gap.map(|g| (s.number, (g - policy.target).abs())))
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
    award_ranked(candidates.into_iter().map(|(n, _)| n), policy.limit, policy.weight)
}

pub struct AverageGapHeuristic {
    policy: GapPolicy,
}

impl AverageGapHeuristic {
    pub fn new(policy: GapPolicy) -> Self {
        Self { policy }
    }
}

impl Heuristic for AverageGapHeuristic {
    fn name(&self) -> &str {
        "gap_medio"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_average_gap(input.stats, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::test_support::sequence;

    #[test]
    fn test_closest_to_target_wins() {
        // 3 : écart 1 ; 4 : écart 2 ; 5 : écart 3 ; 9 : une seule sortie.
        let stats = StatsTable::compute(&sequence(&[
            &[3, 4, 5, 9],
            &[3],
            &[4],
            &[5],
        ]));
        let policy = GapPolicy {
            limit: 10,
            weight: 1.0,
            target: 2.0,
        };
        let map = score_average_gap(&stats, policy);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(4), Some(10.0));
        // 3 et 5 sont à égale distance : l'ordre des numéros départage.
        assert_eq!(map.get(3), Some(9.0));
        assert_eq!(map.get(5), Some(8.0));
        assert_eq!(map.get(9), None);
    }

    #[test]
    fn test_default_target_prefers_large_gaps() {
        let mut rows: Vec<&[u8]> = vec![&[][..]; 41];
        rows[0] = &[1, 2][..];
        rows[1] = &[1][..];
        rows[40] = &[2][..];
        let stats = StatsTable::compute(&sequence(&rows));
        let map = score_average_gap(&stats, EngineConfig::default().average_gap);
        assert_eq!(map.get(2), Some(10.0));
        assert_eq!(map.get(1), Some(9.0));
    }
}
