use std::collections::BTreeMap;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use totoloto_db::models::Draw;

use crate::selector::matched;

/// Seuils suivis : au moins 1 à au moins 5 numéros trouvés.
pub const HIT_THRESHOLDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestPrediction {
    #[serde(rename = "concurso")]
    pub contest: String,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "numeros_acertados")]
    pub hits: usize,
    #[serde(rename = "numeros_previstos_pico")]
    pub predicted: Vec<u8>,
    #[serde(rename = "numeros_reais_pico")]
    pub actual: Vec<u8>,
}

/// Bilan d'une heuristique prise seule sur la simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeuristicScorecard {
    total_predictions: usize,
    /// `at_least[i]` = nombre de prédictions avec au moins `i + 1` numéros trouvés.
    at_least: [usize; HIT_THRESHOLDS],
    best: Option<BestPrediction>,
}

impl HeuristicScorecard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre une prédiction et renvoie son nombre de numéros trouvés.
    pub fn record(&mut self, predicted: &[u8], actual: &Draw) -> usize {
        let hits = matched(predicted, &actual.numbers).len();
        self.total_predictions += 1;
        for threshold in 1..=HIT_THRESHOLDS {
            if hits >= threshold {
                self.at_least[threshold - 1] += 1;
            }
        }

        let best_hits = self.best.as_ref().map_or(0, |b| b.hits);
        if hits > best_hits {
            let mut predicted = predicted.to_vec();
            predicted.sort_unstable();
            let mut actual_numbers = actual.numbers.clone();
            actual_numbers.sort_unstable();
            self.best = Some(BestPrediction {
                contest: actual.contest.clone(),
                date: actual.date_label.clone(),
                hits,
                predicted,
                actual: actual_numbers,
            });
        }
        hits
    }

    pub fn total_predictions(&self) -> usize {
        self.total_predictions
    }

    /// Prédictions avec au moins `threshold` numéros trouvés (1..=5).
    pub fn at_least(&self, threshold: usize) -> usize {
        match threshold {
            1..=HIT_THRESHOLDS => self.at_least[threshold - 1],
            _ => 0,
        }
    }

    pub fn success_rate(&self, threshold: usize) -> f64 {
        if self.total_predictions == 0 {
            return 0.0;
        }
        self.at_least(threshold) as f64 / self.total_predictions as f64 * 100.0
    }

    pub fn best(&self) -> Option<&BestPrediction> {
        self.best.as_ref()
    }
}

#[derive(Serialize)]
struct HitMetric {
    total: usize,
    taxa_sucesso: String,
}

impl Serialize for HeuristicScorecard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let metrics: BTreeMap<String, HitMetric> = (1..=HIT_THRESHOLDS)
            .map(|t| {
                (
                    format!("acerto_{t}"),
                    HitMetric {
                        total: self.at_least(t),
                        taxa_sucesso: format!("{:.2}%", self.success_rate(t)),
                    },
                )
            })
            .collect();

        let mut s = serializer.serialize_struct("HeuristicScorecard", 3)?;
        s.serialize_field("total_previsoes", &self.total_predictions)?;
        s.serialize_field("metricas_acerto", &metrics)?;
        s.serialize_field("melhor_previsao", &self.best)?;
        s.end()
    }
}
