use super::{award_ranked, Heuristic, HeuristicInput, ScoreMap};
use crate::config::{TrendOrder, TrendPolicy};
use crate::stats::StatsTable;

/// Numéros ressortis récemment (tendance définie et <= `max_trend`).
///
/// Avec `TrendOrder::Source` les candidats gardent l'ordre de la table
/// (numéros croissants) : la valeur de tendance ne sert que de filtre.
/// `TrendOrder::Ascending` trie d'abord par tendance croissante.
pub fn score_trend(stats: &StatsTable, policy: TrendPolicy) -> ScoreMap {
    let mut candidates: Vec<(u8, u32)> = stats
        .iter()
        .filter_map(|s| s.trend.map(|t| (s.number, t)))
        .filter(|&(_, t)| t <= policy.max_trend)
        .collect();

    if policy.order == TrendOrder::Ascending {
        candidates.sort_by_key(|&(_, t)| t);
    }

    award_ranked(candidates.into_iter().map(|(n, _)| n), policy.limit, policy.weight)
}

pub struct TrendHeuristic {
    policy: TrendPolicy,
}

impl TrendHeuristic {
    pub fn new(policy: TrendPolicy) -> Self {
        Self { policy }
    }
}

impl Heuristic for TrendHeuristic {
    fn name(&self) -> &str {
        "tendencia"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_trend(input.stats, self.policy)
    }
}
