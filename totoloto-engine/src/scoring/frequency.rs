use super::{award_ranked, Heuristic, HeuristicInput, ScoreMap};
use crate::config::RankPolicy;
use crate::stats::StatsTable;

/// Numéros les plus sortis : tri stable par nombre d'apparitions décroissant.
pub fn score_frequency(stats: &StatsTable, policy: RankPolicy) -> ScoreMap {
    let mut ranked: Vec<_> = stats.iter().collect();
    ranked.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    award_ranked(ranked.iter().map(|s| s.number), policy.limit, policy.weight)
}

pub struct FrequencyHeuristic {
    policy: RankPolicy,
}

impl FrequencyHeuristic {
    pub fn new(policy: RankPolicy) -> Self {
        Self { policy }
    }
}

impl Heuristic for FrequencyHeuristic {
    fn name(&self) -> &str {
        "frequencia"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_frequency(input.stats, self.policy)
    }
}
