use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use totoloto_db::error::{DataError, DataResult, DataWarning};
use totoloto_db::provider::DrawHistory;

use crate::combiner::combine;
use crate::config::EngineConfig;
use crate::cooccurrence::CoOccurrence;
use crate::scoring::{all_heuristics, recent_heuristics, HeuristicInput, ScoreMap};
use crate::selector::select_top;
use crate::stats::StatsTable;

/// Document `previsao` : prédiction du prochain tirage à partir de tout l'historique.
#[derive(Debug, Clone, Serialize)]
pub struct LivePrediction {
    #[serde(rename = "gerado_em")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "total_sorteios")]
    pub total_draws: usize,
    #[serde(rename = "data_inicio")]
    pub first_date: String,
    #[serde(rename = "data_fim")]
    pub last_date: String,
    #[serde(rename = "estatisticas")]
    pub stats: StatsTable,
    /// Points bruts de chaque heuristique ; suffixe `_recente` pour la fenêtre récente.
    #[serde(rename = "por_heuristica")]
    pub by_heuristic: BTreeMap<String, ScoreMap>,
    #[serde(rename = "combinadas")]
    pub combined: ScoreMap,
    #[serde(rename = "sugestao_final")]
    pub suggestion: Vec<u8>,
    #[serde(rename = "avisos")]
    pub warnings: Vec<DataWarning>,
}

/// Prédiction à partir d'un historique chronologique.
///
/// Les scores ne sont pas normalisés ici : les heuristiques sur l'historique complet
/// et celles rejouées sur les `recent_window` derniers tirages sont additionnées telles quelles.
pub fn predict_next(history: &DrawHistory, config: &EngineConfig) -> DataResult<LivePrediction> {
    let draws = history.draws.as_slice();
    let (Some(first), Some(last)) = (draws.first(), draws.last()) else {
        return Err(DataError::EmptyHistory("la prédiction".to_string()));
    };

    let stats = StatsTable::compute(draws);
    let cooccurrence = CoOccurrence::from_draws(draws);
    let full = HeuristicInput {
        draws,
        stats: &stats,
        cooccurrence: &cooccurrence,
    };

    let recent_draws = &draws[draws.len().saturating_sub(config.recent_window)..];
    let recent_stats = StatsTable::compute(recent_draws);
    let recent = HeuristicInput {
        draws: recent_draws,
        stats: &recent_stats,
        cooccurrence: &cooccurrence,
    };

    let mut by_heuristic = BTreeMap::new();
    for heuristic in all_heuristics(config) {
        if heuristic.applies_to(&full) {
            by_heuristic.insert(heuristic.name().to_string(), heuristic.score(&full));
        } else {
            log::debug!("Heuristique {} ignorée", heuristic.name());
        }
    }
    for heuristic in recent_heuristics(config) {
        by_heuristic.insert(format!("{}_recente", heuristic.name()), heuristic.score(&recent));
    }

    let combined = combine(by_heuristic.values());
    let suggestion = select_top(&combined, config.live_pick);
    log::info!(
        "Prédiction sur {} tirages ({} récents) : {:?}",
        draws.len(),
        recent_draws.len(),
        suggestion
    );

    Ok(LivePrediction {
        generated_at: Utc::now(),
        total_draws: draws.len(),
        first_date: first.date_label.clone(),
        last_date: last.date_label.clone(),
        stats,
        by_heuristic,
        combined,
        suggestion,
        warnings: history.warnings.clone(),
    })
}
