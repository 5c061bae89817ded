use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use totoloto_db::models::{is_valid_number, Draw, POOL_SIZE, UNKNOWN};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberStats {
    #[serde(rename = "numero")]
    pub number: u8,
    #[serde(rename = "num_saidas")]
    pub occurrences: u32,
    #[serde(rename = "percent_saidas")]
    pub occurrence_percent: f64,
    #[serde(skip)]
    pub last_seen_index: Option<usize>,
    #[serde(rename = "ultimo_sorteio", serialize_with = "unknown_if_none")]
    pub last_contest: Option<String>,
    #[serde(rename = "data_ultimo", serialize_with = "unknown_if_none")]
    pub last_date: Option<String>,
    #[serde(rename = "ausencias")]
    pub absence_streak: u32,
    /// `None` si moins de deux apparitions.
    #[serde(rename = "gap_medio")]
    pub average_gap: Option<f64>,
    /// Écart entre les deux dernières apparitions. `None` si moins de deux apparitions.
    #[serde(rename = "tendencia")]
    pub trend: Option<u32>,
}

fn unknown_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
}

/// Statistiques des 49 numéros pour une séquence donnée. Chaque numéro a une entrée,
/// même sans aucune apparition.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsTable {
    total_draws: usize,
    entries: [NumberStats; POOL_SIZE],
}

impl StatsTable {
    /// Un seul passage sur la séquence (ordre chronologique, index 0 = le plus ancien).
    pub fn compute(draws: &[Draw]) -> Self {
        let total = draws.len();
        let mut positions: [Vec<usize>; POOL_SIZE] = std::array::from_fn(|_| Vec::new());

        for (idx, draw) in draws.iter().enumerate() {
            for &n in &draw.numbers {
                if !is_valid_number(n) {
                    continue;
                }
                let seen = &mut positions[(n - 1) as usize];
                if seen.last() != Some(&idx) {
                    seen.push(idx);
                }
            }
        }

        let entries = std::array::from_fn(|i| {
            let indices = &positions[i];
            let occurrences = indices.len() as u32;
            let last_seen_index = indices.last().copied();

            let occurrence_percent = if total == 0 {
                0.0
            } else {
                round_dp(occurrences as f64 / total as f64 * 100.0, 2)
            };

            let absence_streak = match last_seen_index {
                Some(last) => (total - last - 1) as u32,
                None => total as u32,
            };

            let (average_gap, trend) = if indices.len() >= 2 {
                let first = indices[0];
                let last = indices[indices.len() - 1];
                let second_last = indices[indices.len() - 2];
                let mean = (last - first) as f64 / (indices.len() - 1) as f64;
                (Some(round_dp(mean, 2)), Some((last - second_last) as u32))
            } else {
                (None, None)
            };

            let last_draw = last_seen_index.map(|idx| &draws[idx]);

            NumberStats {
                number: (i + 1) as u8,
                occurrences,
                occurrence_percent,
                last_seen_index,
                last_contest: last_draw.map(|d| d.contest.clone()),
                last_date: last_draw.map(|d| d.date_label.clone()),
                absence_streak,
                average_gap,
                trend,
            }
        });

        Self {
            total_draws: total,
            entries,
        }
    }

    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    pub fn get(&self, number: u8) -> Option<&NumberStats> {
        if is_valid_number(number) {
            Some(&self.entries[(number - 1) as usize])
        } else {
            None
        }
    }

    /// Ordre croissant des numéros.
    pub fn iter(&self) -> impl Iterator<Item = &NumberStats> {
        self.entries.iter()
    }
}

impl Serialize for StatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(POOL_SIZE))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.number, entry)?;
        }
        map.end()
    }
}

pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
