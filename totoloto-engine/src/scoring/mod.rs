pub mod absence;
pub mod frequency;
pub mod gap;
pub mod growth;
pub mod pairs;
pub mod trend;
pub mod triples;

use std::collections::BTreeMap;

use serde::Serialize;
use totoloto_db::models::Draw;

use crate::config::EngineConfig;
use crate::cooccurrence::CoOccurrence;
use crate::stats::StatsTable;

/// Points par numéro. Un numéro absent n'a reçu aucun point (ce qui diffère de 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreMap(BTreeMap<u8, f64>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute `points` au score du numéro (0 si absent).
    pub fn add(&mut self, number: u8, points: f64) {
        *self.0.entry(number).or_insert(0.0) += points;
    }

    pub fn insert(&mut self, number: u8, score: f64) {
        self.0.insert(number, score);
    }

    pub fn get(&self, number: u8) -> Option<f64> {
        self.0.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numéros croissants.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.0.iter().map(|(n, s)| (*n, *s))
    }
}

impl FromIterator<(u8, f64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (u8, f64)>>(iter: I) -> Self {
        let mut map = ScoreMap::new();
        for (number, points) in iter {
            map.add(number, points);
        }
        map
    }
}

/// Les `limit` premiers de `ranked` reçoivent `(limit - rang) * weight`, rang à partir de 0.
pub fn award_ranked(ranked: impl IntoIterator<Item = u8>, limit: usize, weight: f64) -> ScoreMap {
    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(rank, number)| (number, (limit - rank) as f64 * weight))
        .collect()
}

/// Vue en lecture seule sur laquelle travaillent les heuristiques.
#[derive(Clone, Copy)]
pub struct HeuristicInput<'a> {
    pub draws: &'a [Draw],
    pub stats: &'a StatsTable,
    pub cooccurrence: &'a CoOccurrence,
}

pub trait Heuristic: Send + Sync {
    fn name(&self) -> &str;
    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap;
    /// Une heuristique non applicable est omise de la combinaison (et non comptée à zéro).
    fn applies_to(&self, _input: &HeuristicInput<'_>) -> bool {
        true
    }
}

/// Les sept heuristiques, dans l'ordre de combinaison.
pub fn all_heuristics(config: &EngineConfig) -> Vec<Box<dyn Heuristic>> {
    vec![
        Box::new(frequency::FrequencyHeuristic::new(config.frequency)),
        Box::new(absence::AbsenceHeuristic::new(config.absence)),
        Box::new(trend::TrendHeuristic::new(config.trend)),
        Box::new(gap::AverageGapHeuristic::new(config.average_gap)),
        Box::new(pairs::PairHeuristic::new(config.pairs, config.clamp_negative)),
        Box::new(triples::TripleHeuristic::new(config.triples, config.clamp_negative)),
        Box::new(growth::GrowthHeuristic::new(config.growth)),
    ]
}

/// Heuristiques rejouées sur la fenêtre récente par le pipeline de prédiction.
pub fn recent_heuristics(config: &EngineConfig) -> Vec<Box<dyn Heuristic>> {
    vec![
        Box::new(frequency::FrequencyHeuristic::new(config.frequency)),
        Box::new(trend::TrendHeuristic::new(config.trend)),
        Box::new(gap::AverageGapHeuristic::new(config.average_gap)),
    ]
}
