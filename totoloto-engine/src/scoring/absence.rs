use super::{award_ranked, Heuristic, HeuristicInput, ScoreMap};
use crate::config::RankPolicy;
use crate::stats::StatsTable;

/// Numéros absents depuis le plus longtemps.
pub fn score_absence(stats: &StatsTable, policy: RankPolicy) -> ScoreMap {
    let mut ranked: Vec<_> = stats.iter().collect();
    ranked.sort_by(|a, b| b.absence_streak.cmp(&a.absence_streak));
    award_ranked(ranked.iter().map(|s| s.number), policy.limit, policy.weight)
}

pub struct AbsenceHeuristic {
    policy: RankPolicy,
}

impl AbsenceHeuristic {
    pub fn new(policy: RankPolicy) -> Self {
        Self { policy }
    }
}

impl Heuristic for AbsenceHeuristic {
    fn name(&self) -> &str {
        "ausencia"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_absence(input.stats, self.policy)
    }
}
