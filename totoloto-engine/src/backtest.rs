use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use totoloto_db::error::{DataError, DataResult, DataWarning};
use totoloto_db::models::Draw;
use totoloto_db::provider::DrawHistory;

use crate::combiner::{combine, normalize};
use crate::config::EngineConfig;
use crate::cooccurrence::CoOccurrence;
use crate::evaluation::HeuristicScorecard;
use crate::scoring::{all_heuristics, Heuristic, HeuristicInput};
use crate::selector::{matched, select_top};
use crate::stats::{round_dp, StatsTable};

/// Résultat d'un pas de simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "concurso")]
    pub contest: String,
    #[serde(rename = "previstos")]
    pub predicted: Vec<u8>,
    #[serde(rename = "reais")]
    pub actual: Vec<u8>,
    #[serde(rename = "acertos")]
    pub matched: Vec<u8>,
    #[serde(rename = "num_acertos")]
    pub hits: usize,
}

/// État possédé par la boucle de simulation. L'historique observé ne fait que grandir.
#[derive(Debug, Clone)]
pub struct BacktestState {
    observed: Vec<Draw>,
    cooccurrence: CoOccurrence,
    seed_len: usize,
    cursor: usize,
    results: Vec<StepOutcome>,
    scorecards: BTreeMap<String, HeuristicScorecard>,
}

impl BacktestState {
    pub fn new(seed: Vec<Draw>) -> Self {
        let cooccurrence = CoOccurrence::from_draws(&seed);
        Self {
            seed_len: seed.len(),
            observed: seed,
            cooccurrence,
            cursor: 0,
            results: Vec::new(),
            scorecards: BTreeMap::new(),
        }
    }

    pub fn observed(&self) -> &[Draw] {
        &self.observed
    }

    pub fn seed_len(&self) -> usize {
        self.seed_len
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn results(&self) -> &[StepOutcome] {
        &self.results
    }

    pub fn scorecards(&self) -> &BTreeMap<String, HeuristicScorecard> {
        &self.scorecards
    }
}

/// Rejoue une fenêtre d'évaluation tirage par tirage : chaque prédiction ne voit
/// que les tirages déjà observés, puis le tirage réel rejoint l'historique.
pub struct Backtest<'a> {
    window: &'a [Draw],
    heuristics: Vec<Box<dyn Heuristic>>,
    pick: usize,
}

impl<'a> Backtest<'a> {
    pub fn new(window: &'a [Draw], config: &EngineConfig) -> Self {
        Self::with_heuristics(window, all_heuristics(config), config.backtest_pick)
    }

    pub fn with_heuristics(window: &'a [Draw], heuristics: Vec<Box<dyn Heuristic>>, pick: usize) -> Self {
        Self {
            window,
            heuristics,
            pick,
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn pick(&self) -> usize {
        self.pick
    }

    pub fn start(&self, seed: Vec<Draw>) -> BacktestState {
        BacktestState::new(seed)
    }

    pub fn is_finished(&self, state: &BacktestState) -> bool {
        state.cursor >= self.window.len()
    }

    /// Un pas : statistiques sur l'observé, scores normalisés puis combinés,
    /// comparaison au tirage réel, ajout du tirage à l'observé.
    /// Renvoie `None` une fois la fenêtre épuisée.
    pub fn step<'s>(&self, state: &'s mut BacktestState) -> Option<&'s StepOutcome> {
        let actual = self.window.get(state.cursor)?;

        let stats = StatsTable::compute(&state.observed);
        let input = HeuristicInput {
            draws: &state.observed,
            stats: &stats,
            cooccurrence: &state.cooccurrence,
        };

        let mut normalized = Vec::with_capacity(self.heuristics.len());
        for heuristic in &self.heuristics {
            if !heuristic.applies_to(&input) {
                continue;
            }
            let raw = heuristic.score(&input);
            let own_pick = select_top(&raw, self.pick);
            state
                .scorecards
                .entry(heuristic.name().to_string())
                .or_default()
                .record(&own_pick, actual);
            normalized.push(normalize(&raw));
        }

        let combined = combine(&normalized);
        let predicted = select_top(&combined, self.pick);
        let hits_list = matched(&predicted, &actual.numbers);
        log::debug!(
            "Pas {} ({}) : prévus {:?}, réels {:?}, {} trouvés",
            state.cursor + 1,
            actual.date_label,
            predicted,
            actual.numbers,
            hits_list.len()
        );

        state.results.push(StepOutcome {
            date: actual.date_label.clone(),
            contest: actual.contest.clone(),
            predicted,
            actual: actual.numbers.clone(),
            hits: hits_list.len(),
            matched: hits_list,
        });
        state.cooccurrence.add_draw(actual);
        state.observed.push(actual.clone());
        state.cursor += 1;
        state.results.last()
    }

    pub fn run(&self, seed: Vec<Draw>) -> BacktestState {
        let mut state = self.start(seed);
        while self.step(&mut state).is_some() {}
        state
    }
}

/// Document `analise_desvio`.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    #[serde(rename = "gerado_em")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "total_sorteios_simulados")]
    pub total_steps: usize,
    #[serde(rename = "sorteios_semente")]
    pub seed_draws: usize,
    #[serde(rename = "media_acertos")]
    pub mean_hits: f64,
    /// Clés 0..=pick, toujours toutes présentes.
    #[serde(rename = "distribuicao_acertos")]
    pub histogram: BTreeMap<usize, usize>,
    #[serde(rename = "simulacoes")]
    pub steps: Vec<StepOutcome>,
    #[serde(rename = "avaliacao_heuristicas")]
    pub scorecards: BTreeMap<String, HeuristicScorecard>,
    #[serde(rename = "avisos")]
    pub warnings: Vec<DataWarning>,
}

impl BacktestReport {
    pub fn from_state(state: BacktestState, pick: usize, warnings: Vec<DataWarning>) -> Self {
        let mut histogram: BTreeMap<usize, usize> = (0..=pick).map(|k| (k, 0)).collect();
        for step in &state.results {
            *histogram.entry(step.hits).or_insert(0) += 1;
        }

        let total = state.results.len();
        let mean_hits = if total == 0 {
            0.0
        } else {
            let sum: usize = state.results.iter().map(|s| s.hits).sum();
            round_dp(sum as f64 / total as f64, 2)
        };

        Self {
            generated_at: Utc::now(),
            total_steps: total,
            seed_draws: state.seed_len,
            mean_hits,
            histogram,
            steps: state.results,
            scorecards: state.scorecards,
            warnings,
        }
    }
}

/// Simulation complète : `seed` amorce l'historique observé, `evaluation` est rejouée.
/// `on_step` est appelé après chaque pas (progression).
pub fn run_backtest(
    seed: DrawHistory,
    evaluation: DrawHistory,
    config: &EngineConfig,
    mut on_step: impl FnMut(&StepOutcome),
) -> DataResult<BacktestReport> {
    if evaluation.is_empty() {
        return Err(DataError::EmptyHistory("la fenêtre d'évaluation".to_string()));
    }
    if seed.is_empty() {
        log::warn!("Période d'amorçage vide : les premières prédictions partent de zéro");
    }

    let mut warnings = seed.warnings;
    warnings.extend(evaluation.warnings);

    let backtest = Backtest::new(&evaluation.draws, config);
    let mut state = backtest.start(seed.draws);
    while let Some(outcome) = backtest.step(&mut state) {
        on_step(outcome);
    }

    let report = BacktestReport::from_state(state, backtest.pick(), warnings);
    log::info!(
        "Simulation terminée : {} tirages, moyenne {} numéros trouvés",
        report.total_steps,
        report.mean_hits
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use totoloto_db::models::{parse_record, sort_chronologically, DrawRecord};

    use crate::test_support::{draw_on, make_test_draws, sequence};

    #[test]
    fn test_state_grows_by_window() {
        let seed = make_test_draws(40, 2011);
        let window = make_test_draws(15, 2012);
        let config = EngineConfig::default();
        let backtest = Backtest::new(&window, &config);

        let state = backtest.run(seed);
        assert_eq!(state.results().len(), 15);
        assert_eq!(state.observed().len(), 55);
        assert_eq!(state.cursor(), 15);
        assert!(backtest.is_finished(&state));
    }

    #[test]
    fn test_step_after_finish_is_none() {
        let window = sequence(&[&[1, 2, 3]]);
        let backtest = Backtest::new(&window, &EngineConfig::default());
        let mut state = backtest.start(Vec::new());
        assert!(backtest.step(&mut state).is_some());
        assert!(backtest.step(&mut state).is_none());
        assert_eq!(state.results().len(), 1);
    }

    #[test]
    fn test_prediction_uses_only_prior_draws() {
        // Amorce où 1..=6 dominent ; le tirage évalué ne doit pas influencer sa propre prédiction.
        let seed = vec![
            draw_on("1", 2011, 1, 1, &[1, 2, 3, 4, 5, 6]),
            draw_on("2", 2011, 1, 4, &[1, 2, 3, 4, 5, 6]),
        ];
        let window = vec![draw_on("3", 2011, 1, 8, &[40, 41, 42, 43, 44, 45])];
        let backtest = Backtest::new(&window, &EngineConfig::default());
        let state = backtest.run(seed);
        let outcome = &state.results()[0];
        assert_eq!(outcome.hits, 0);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.actual, vec![40, 41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_incremental_cooccurrence_matches_rebuild() {
        let seed = make_test_draws(10, 2011);
        let window = make_test_draws(8, 2012);
        let backtest = Backtest::new(&window, &EngineConfig::default());
        let state = backtest.run(seed);

        let rebuilt = CoOccurrence::from_draws(state.observed());
        assert_eq!(state.cooccurrence.pairs().len(), rebuilt.pairs().len());
        for (pair, count) in rebuilt.pairs().iter() {
            assert_eq!(state.cooccurrence.pairs().get(&pair), count);
        }
    }

    #[test]
    fn test_growth_skipped_until_two_years() {
        let seed = make_test_draws(5, 2011);
        let window = make_test_draws(3, 2012);
        let backtest = Backtest::new(&window, &EngineConfig::default());
        let state = backtest.run(seed);

        // Premier pas : seule 2011 observée, donc l'heuristique de croissance n'est pas comptée.
        let growth = &state.scorecards()["crescimento_ano"];
        assert_eq!(growth.total_predictions(), 2);
        assert_eq!(state.scorecards()["frequencia"].total_predictions(), 3);
    }

    #[test]
    fn test_bad_date_does_not_unlock_growth() {
        let record = DrawRecord {
            concurso: Some(json!("003/2011")),
            data: Some(json!("31/02/2011")),
            numeros: Some(json!([40])),
        };
        let mut seed = vec![
            draw_on("001/2011", 2011, 1, 5, &[7]),
            draw_on("002/2011", 2011, 1, 8, &[1]),
            parse_record(&record, 2011, 2, &mut Vec::new()),
        ];
        sort_chronologically(&mut seed);
        let window = vec![
            draw_on("004/2011", 2011, 1, 12, &[7, 40]),
            draw_on("005/2011", 2011, 1, 15, &[1, 7]),
        ];

        let backtest = Backtest::new(&window, &EngineConfig::default());
        let state = backtest.run(seed);
        assert_eq!(state.results().len(), 2);
        assert!(!state.scorecards().contains_key("crescimento_ano"));
        assert_eq!(state.scorecards()["frequencia"].total_predictions(), 2);
    }

    #[test]
    fn test_report_histogram_and_mean() {
        let config = EngineConfig::default();
        let seed = DrawHistory {
            draws: make_test_draws(30, 2011),
            ..Default::default()
        };
        let evaluation = DrawHistory {
            draws: make_test_draws(12, 2012),
            ..Default::default()
        };

        let mut seen = 0;
        let report = run_backtest(seed, evaluation, &config, |_| seen += 1).unwrap();
        assert_eq!(seen, 12);
        assert_eq!(report.total_steps, 12);
        assert_eq!(report.seed_draws, 30);
        assert_eq!(report.histogram.len(), config.backtest_pick + 1);
        assert_eq!(report.histogram.values().sum::<usize>(), 12);

        let sum: usize = report.steps.iter().map(|s| s.hits).sum();
        assert_eq!(report.mean_hits, round_dp(sum as f64 / 12.0, 2));
    }

    #[test]
    fn test_empty_evaluation_is_error() {
        let result = run_backtest(
            DrawHistory::default(),
            DrawHistory::default(),
            &EngineConfig::default(),
            |_| {},
        );
        assert!(matches!(result, Err(DataError::EmptyHistory(_))));
    }

    #[test]
    fn test_empty_seed_still_runs() {
        let evaluation = DrawHistory {
            draws: make_test_draws(4, 2012),
            ..Default::default()
        };
        let report = run_backtest(DrawHistory::default(), evaluation, &EngineConfig::default(), |_| {}).unwrap();
        assert_eq!(report.total_steps, 4);
        // Rien d'observé au premier pas : fréquence et absence à égalité, les plus petits numéros passent.
        assert_eq!(report.steps[0].predicted, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_report_field_names() {
        let state = BacktestState::new(Vec::new());
        let report = BacktestReport::from_state(state, 6, Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["media_acertos"], 0.0);
        assert_eq!(json["distribuicao_acertos"]["6"], 0);
        assert!(json["simulacoes"].as_array().unwrap().is_empty());
    }
}
