use std::collections::BTreeMap;

use totoloto_db::models::{is_valid_number, Draw, POOL_SIZE};

use super::{Heuristic, HeuristicInput, ScoreMap};
use crate::config::GrowthPolicy;

/// Tirages contenant chaque numéro, par année de rattachement du tirage.
pub fn yearly_counts(draws: &[Draw]) -> BTreeMap<i32, [u32; POOL_SIZE]> {
    let mut by_year: BTreeMap<i32, [u32; POOL_SIZE]> = BTreeMap::new();
    for draw in draws {
        let counts = by_year.entry(draw.year()).or_insert([0; POOL_SIZE]);
        let mut seen = [false; POOL_SIZE];
        for &n in &draw.numbers {
            if is_valid_number(n) && !seen[(n - 1) as usize] {
                seen[(n - 1) as usize] = true;
                counts[(n - 1) as usize] += 1;
            }
        }
    }
    by_year
}

pub fn distinct_years(draws: &[Draw]) -> usize {
    yearly_counts(draws).len()
}

/// Pour chaque numéro, nombre de passages d'une année à la suivante (années
/// présentes, triées) où le compte augmente strictement. Au moins
/// `min_increases` hausses donnent `hausses * factor` ; sinon aucune entrée.
pub fn score_growth(draws: &[Draw], policy: GrowthPolicy) -> ScoreMap {
    let by_year = yearly_counts(draws);
    let years: Vec<&[u32; POOL_SIZE]> = by_year.values().collect();

    let mut map = ScoreMap::new();
    for idx in 0..POOL_SIZE {
        let increases = years
            .windows(2)
            .filter(|w| w[1][idx] > w[0][idx])
            .count() as u32;
        if increases >= policy.min_increases {
            map.insert((idx + 1) as u8, increases as f64 * policy.factor);
        }
    }
    map
}

pub struct GrowthHeuristic {
    policy: GrowthPolicy,
}

impl GrowthHeuristic {
    pub fn new(policy: GrowthPolicy) -> Self {
        Self { policy }
    }
}

impl Heuristic for GrowthHeuristic {
    fn name(&self) -> &str {
        "crescimento_ano"
    }

    fn score(&self, input: &HeuristicInput<'_>) -> ScoreMap {
        score_growth(input.draws, self.policy)
    }

    /// Sans au moins deux années observées, il n'y a aucune évolution à mesurer.
    fn applies_to(&self, input: &HeuristicInput<'_>) -> bool {
        distinct_years(input.draws) >= 2
    }
}
